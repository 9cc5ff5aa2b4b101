//! Runs the analytics views against a record store.
//!
//! Each function validates every parameter before reading from the store and
//! returns a plain value, so the same functions serve the single view
//! endpoints and the combined endpoint.

use crate::{
    Error,
    analytics::{
        AnalyticsQuery, CategoryCounts, CombinedReport, PriceHistogram, SalesStatistics,
        TransactionPage, build_combined_report, build_filter, bucket_prices, count_categories,
        summarize_sales,
    },
    pagination::{Pagination, PaginationConfig},
    record::{Record, RecordStore},
};

/// Settings shared by every analytics query.
#[derive(Debug, Clone)]
pub struct AnalyticsConfig {
    /// The year that month numbers refer to.
    pub reference_year: i32,
    /// Page defaults for the transaction listing.
    pub pagination: PaginationConfig,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            reference_year: 2021,
            pagination: PaginationConfig::default(),
        }
    }
}

/// Get a page of records matching the month and search text.
///
/// # Errors
/// Returns an [Error::InvalidParameter] for a bad month, page or page size, or
/// an [Error::StoreUnavailable] if the store cannot be read.
pub fn get_transaction_page(
    store: &dyn RecordStore,
    query: &AnalyticsQuery,
    config: &AnalyticsConfig,
) -> Result<TransactionPage, Error> {
    let filter = build_filter(&query.filter_params()?, config.reference_year)?;
    let pagination = Pagination::new(query.page()?, query.per_page()?, &config.pagination)?;

    store.find_page(&filter, pagination)
}

/// Get the sales totals for the month.
///
/// # Errors
/// Returns an [Error::InvalidParameter] for a bad month, or an
/// [Error::StoreUnavailable] if the store cannot be read.
pub fn get_sales_statistics(
    store: &dyn RecordStore,
    query: &AnalyticsQuery,
    config: &AnalyticsConfig,
) -> Result<SalesStatistics, Error> {
    let records = find_month_records(store, query, config)?;

    Ok(summarize_sales(&records))
}

/// Get the price range counts for the month.
///
/// # Errors
/// Returns an [Error::InvalidParameter] for a bad month, or an
/// [Error::StoreUnavailable] if the store cannot be read.
pub fn get_price_histogram(
    store: &dyn RecordStore,
    query: &AnalyticsQuery,
    config: &AnalyticsConfig,
) -> Result<PriceHistogram, Error> {
    let records = find_month_records(store, query, config)?;

    Ok(bucket_prices(&records))
}

/// Get the category counts for the month.
///
/// # Errors
/// Returns an [Error::InvalidParameter] for a bad month, or an
/// [Error::StoreUnavailable] if the store cannot be read.
pub fn get_category_counts(
    store: &dyn RecordStore,
    query: &AnalyticsQuery,
    config: &AnalyticsConfig,
) -> Result<CategoryCounts, Error> {
    let records = find_month_records(store, query, config)?;

    Ok(count_categories(&records))
}

/// Get every view at once from a single read of the store.
///
/// The month's records are read once and every view is computed from that
/// snapshot, so the sections always agree with each other even if the store
/// is replaced concurrently.
///
/// # Errors
/// Fails as a whole with an [Error::InvalidParameter] for a bad month, page or
/// page size, or an [Error::StoreUnavailable] if the store cannot be read.
pub fn get_combined_report(
    store: &dyn RecordStore,
    query: &AnalyticsQuery,
    config: &AnalyticsConfig,
) -> Result<CombinedReport, Error> {
    let filter = build_filter(&query.filter_params()?, config.reference_year)?;
    let pagination = Pagination::new(query.page()?, query.per_page()?, &config.pagination)?;

    let month_records = store.find(&filter.month_only())?;

    Ok(build_combined_report(&month_records, &filter, pagination))
}

fn find_month_records(
    store: &dyn RecordStore,
    query: &AnalyticsQuery,
    config: &AnalyticsConfig,
) -> Result<Vec<Record>, Error> {
    let filter = build_filter(&query.month_params()?, config.reference_year)?;

    store.find(&filter)
}
