//! This modules defines the common functionality for paging data.

use crate::Error;

/// The config for pagination
#[derive(Debug, Clone)]
pub struct PaginationConfig {
    /// The page number to default to when not specified in a request.
    pub default_page: u64,
    /// The number of records per page when not specified in a request.
    pub default_page_size: u64,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page: 1,
            default_page_size: 10,
        }
    }
}

/// A validated request for one page of results.
///
/// Pages are 1-indexed and both fields are always at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    page: u64,
    per_page: u64,
}

impl Pagination {
    /// Create a page request, filling in missing values from `config`.
    ///
    /// # Errors
    /// Returns an [Error::InvalidParameter] for "page" or "perPage" if the
    /// value is zero or negative. Values are never clamped.
    pub fn new(
        page: Option<i64>,
        per_page: Option<i64>,
        config: &PaginationConfig,
    ) -> Result<Self, Error> {
        let page = match page {
            Some(page) => positive("page", page)?,
            None => config.default_page,
        };
        let per_page = match per_page {
            Some(per_page) => positive("perPage", per_page)?,
            None => config.default_page_size,
        };

        Ok(Self { page, per_page })
    }

    /// The 1-indexed page number.
    pub fn page(&self) -> u64 {
        self.page
    }

    /// The maximum number of items on a page.
    pub fn per_page(&self) -> u64 {
        self.per_page
    }

    /// The number of items that come before this page.
    pub fn offset(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.per_page)
    }
}

fn positive(field: &'static str, value: i64) -> Result<u64, Error> {
    u64::try_from(value)
        .ok()
        .filter(|value| *value >= 1)
        .ok_or_else(|| Error::invalid_parameter(field, format!("{value} must be at least 1")))
}
