//! Builds the record filter shared by the analytics queries.
//!
//! A filter combines an optional calendar month window with an optional
//! search clause. Both clauses must match for a record to be selected, while
//! the parts of the search clause (title, description, price) are alternatives.

use time::{Date, Month};

use crate::{Error, record::Record};

/// The month and search text used to select records.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterParams {
    /// A 1-indexed month number, where 1 is January.
    pub month: Option<i64>,
    /// Text to look for in the title or description, or a price to match exactly.
    pub search: Option<String>,
}

/// A calendar month of the reference year as the half-open range `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthWindow {
    /// The first day of the month.
    pub start: Date,
    /// The first day of the following month.
    pub end: Date,
}

impl MonthWindow {
    /// Create the window covering `month` of `year`.
    ///
    /// # Errors
    /// Returns an [Error::InvalidParameter] if the month falls outside the
    /// range of dates that can be represented.
    pub fn new(year: i32, month: Month) -> Result<Self, Error> {
        let end_year_month = match month {
            Month::December => year.checked_add(1).map(|year| (year, Month::January)),
            month => Some((year, month.next())),
        };

        let start = Date::from_calendar_date(year, month, 1).ok();
        let end = end_year_month
            .and_then(|(end_year, end_month)| Date::from_calendar_date(end_year, end_month, 1).ok());

        match (start, end) {
            (Some(start), Some(end)) => Ok(Self { start, end }),
            _ => Err(Error::invalid_parameter(
                "month",
                format!("{month} {year} is not a representable month"),
            )),
        }
    }

    /// Whether every month of `year` has a representable window.
    pub fn supports_year(year: i32) -> bool {
        Self::new(year, Month::January).is_ok() && Self::new(year, Month::December).is_ok()
    }

    /// Whether `date` falls on or after the start and strictly before the end.
    pub fn contains(&self, date: Date) -> bool {
        self.start <= date && date < self.end
    }
}

/// Matches records by a case-insensitive substring of the title or
/// description, or by an exact price when the search text is a number.
///
/// Case folding only applies to ASCII letters, the same as SQLite's `LIKE`.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchClause {
    text: String,
    needle: String,
    price: Option<f64>,
}

impl SearchClause {
    /// Create a search clause, or `None` if `text` is empty or only whitespace.
    pub fn new(text: &str) -> Option<Self> {
        let text = text.trim();

        if text.is_empty() {
            return None;
        }

        Some(Self {
            text: text.to_owned(),
            needle: text.to_ascii_lowercase(),
            price: parse_price(text),
        })
    }

    /// The trimmed search text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The price to match exactly, if the search text is a valid price.
    pub fn price(&self) -> Option<f64> {
        self.price
    }

    /// Whether `record` matches any part of the clause.
    pub fn matches(&self, record: &Record) -> bool {
        record.title.to_ascii_lowercase().contains(&self.needle)
            || record.description.to_ascii_lowercase().contains(&self.needle)
            || self.price == Some(record.price)
    }
}

/// Interpret `text` as a price.
///
/// Only finite, non-negative numbers count, so "inf", "NaN" and "-3" never
/// turn into a price clause.
fn parse_price(text: &str) -> Option<f64> {
    text.parse::<f64>()
        .ok()
        .filter(|price| price.is_finite() && *price >= 0.0)
}

/// The condition a record must satisfy to be included in a query.
///
/// The default filter matches every record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordFilter {
    /// Only include records sold within this window.
    pub window: Option<MonthWindow>,
    /// Only include records matching this clause.
    pub search: Option<SearchClause>,
}

impl RecordFilter {
    /// A filter that matches every record.
    pub fn all() -> Self {
        Self::default()
    }

    /// A copy of this filter without the search clause.
    pub fn month_only(&self) -> Self {
        Self {
            window: self.window,
            search: None,
        }
    }

    /// Whether `record` satisfies every clause of the filter.
    pub fn matches(&self, record: &Record) -> bool {
        let in_window = self
            .window
            .is_none_or(|window| window.contains(record.date_of_sale));
        let matches_search = self
            .search
            .as_ref()
            .is_none_or(|search| search.matches(record));

        in_window && matches_search
    }
}

/// The longest search text accepted, in bytes.
///
/// Escaped `LIKE` patterns must stay far below SQLite's 50,000 byte pattern limit.
pub const MAX_SEARCH_LENGTH: usize = 1000;

/// Translate request parameters into a [RecordFilter].
///
/// Month windows are taken from `reference_year`, since the data set only
/// covers a single year.
///
/// # Errors
/// Returns an [Error::InvalidParameter] for the field "month" if the month is
/// not between 1 and 12 (inclusive), or for the field "search" if the trimmed
/// search text is longer than [MAX_SEARCH_LENGTH] bytes.
pub fn build_filter(params: &FilterParams, reference_year: i32) -> Result<RecordFilter, Error> {
    let window = match params.month {
        Some(month) => Some(MonthWindow::new(reference_year, month_from_index(month)?)?),
        None => None,
    };

    let search = match params.search.as_deref().and_then(SearchClause::new) {
        Some(search) if search.text().len() > MAX_SEARCH_LENGTH => {
            return Err(Error::invalid_parameter(
                "search",
                format!("must be at most {MAX_SEARCH_LENGTH} bytes long"),
            ));
        }
        search => search,
    };

    Ok(RecordFilter { window, search })
}

/// Parse a reference year given on the command line.
///
/// # Errors
/// Returns a message if `text` is not an integer or if some month of the year
/// cannot be represented as a date window.
pub fn parse_reference_year(text: &str) -> Result<i32, String> {
    let year = text
        .trim()
        .parse::<i32>()
        .map_err(|error| format!("\"{text}\" is not a year: {error}"))?;

    if MonthWindow::supports_year(year) {
        Ok(year)
    } else {
        Err(format!("{year} is outside the supported range of years"))
    }
}

fn month_from_index(month: i64) -> Result<Month, Error> {
    u8::try_from(month)
        .ok()
        .and_then(|month| Month::try_from(month).ok())
        .ok_or_else(|| {
            Error::invalid_parameter("month", format!("{month} is not between 1 and 12"))
        })
}

#[cfg(test)]
mod month_window_tests {
    use time::{Month, macros::date};

    use super::{MonthWindow, parse_reference_year};

    #[test]
    fn february_ends_on_first_of_march() {
        let window = MonthWindow::new(2021, Month::February).unwrap();

        assert_eq!(window.start, date!(2021 - 02 - 01));
        assert_eq!(window.end, date!(2021 - 03 - 01));
    }

    #[test]
    fn year_without_following_year_is_rejected() {
        assert!(MonthWindow::new(i32::MAX, Month::December).is_err());
        assert!(MonthWindow::new(9999, Month::December).is_err());
    }

    #[test]
    fn supported_years() {
        assert!(MonthWindow::supports_year(2021));
        assert!(!MonthWindow::supports_year(9999));
        assert!(!MonthWindow::supports_year(i32::MAX));
        assert!(!MonthWindow::supports_year(i32::MIN));
    }

    #[test]
    fn parses_reference_year() {
        assert_eq!(parse_reference_year("2021"), Ok(2021));
        assert!(parse_reference_year("twenty").is_err());
        assert!(parse_reference_year(&i32::MAX.to_string()).is_err());
    }

    #[test]
    fn december_rolls_over_to_next_year() {
        let window = MonthWindow::new(2021, Month::December).unwrap();

        assert_eq!(window.start, date!(2021 - 12 - 01));
        assert_eq!(window.end, date!(2022 - 01 - 01));
    }

    #[test]
    fn contains_first_and_last_day_but_not_next_month() {
        let window = MonthWindow::new(2021, Month::April).unwrap();

        assert!(window.contains(date!(2021 - 04 - 01)));
        assert!(window.contains(date!(2021 - 04 - 30)));
        assert!(!window.contains(date!(2021 - 05 - 01)));
        assert!(!window.contains(date!(2021 - 03 - 31)));
    }
}
