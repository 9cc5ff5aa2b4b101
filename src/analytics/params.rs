//! Parses the raw query string parameters shared by the analytics endpoints.

use serde::Deserialize;

use crate::{Error, analytics::FilterParams};

/// The query string parameters accepted by the analytics endpoints.
///
/// Values are kept as strings so that a bad value is reported as an
/// [Error::InvalidParameter] naming the field, rather than a generic
/// deserialization failure.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsQuery {
    /// A month number (1-12) or an English month name.
    pub month: Option<String>,
    /// Text to search for in titles and descriptions, or a price.
    pub search: Option<String>,
    /// The 1-indexed page of transactions.
    pub page: Option<String>,
    /// The number of transactions per page.
    pub per_page: Option<String>,
}

impl AnalyticsQuery {
    /// The month and search text.
    ///
    /// # Errors
    /// Returns an [Error::InvalidParameter] if the month cannot be parsed.
    pub fn filter_params(&self) -> Result<FilterParams, Error> {
        Ok(FilterParams {
            month: parse_month(self.month.as_deref())?,
            search: self.search.clone(),
        })
    }

    /// The month only, for views that ignore the search text.
    ///
    /// # Errors
    /// Returns an [Error::InvalidParameter] if the month cannot be parsed.
    pub fn month_params(&self) -> Result<FilterParams, Error> {
        Ok(FilterParams {
            month: parse_month(self.month.as_deref())?,
            search: None,
        })
    }

    /// The requested page number.
    ///
    /// # Errors
    /// Returns an [Error::InvalidParameter] if the page is not an integer.
    pub fn page(&self) -> Result<Option<i64>, Error> {
        parse_integer("page", self.page.as_deref())
    }

    /// The requested page size.
    ///
    /// # Errors
    /// Returns an [Error::InvalidParameter] if the page size is not an integer.
    pub fn per_page(&self) -> Result<Option<i64>, Error> {
        parse_integer("perPage", self.per_page.as_deref())
    }
}

const MONTH_NAMES: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

/// Parse a month number or English month name.
///
/// Names and their three letter abbreviations are matched case-insensitively,
/// e.g. "March", "mar" and "3" are all March. Numbers are passed through as is
/// so that the filter builder can reject values outside 1-12. An empty value
/// means no month was given.
///
/// # Errors
/// Returns an [Error::InvalidParameter] if `raw` is neither a number nor a month name.
pub fn parse_month(raw: Option<&str>) -> Result<Option<i64>, Error> {
    let Some(raw) = raw.map(str::trim).filter(|raw| !raw.is_empty()) else {
        return Ok(None);
    };

    if let Ok(month) = raw.parse::<i64>() {
        return Ok(Some(month));
    }

    let lowercase = raw.to_lowercase();

    MONTH_NAMES
        .iter()
        .position(|name| *name == lowercase || (lowercase.len() == 3 && name.starts_with(&lowercase)))
        .map(|index| Some(index as i64 + 1))
        .ok_or_else(|| {
            Error::invalid_parameter(
                "month",
                format!("\"{raw}\" is not a month number (1-12) or month name"),
            )
        })
}

fn parse_integer(field: &'static str, raw: Option<&str>) -> Result<Option<i64>, Error> {
    let Some(raw) = raw.map(str::trim).filter(|raw| !raw.is_empty()) else {
        return Ok(None);
    };

    raw.parse::<i64>()
        .map(Some)
        .map_err(|_| Error::invalid_parameter(field, format!("\"{raw}\" is not an integer")))
}
