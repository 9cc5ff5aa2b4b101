//! Analytics views over the sale records.
//!
//! This module contains:
//! - The filter builder that turns a month and search text into a [RecordFilter]
//! - Pure aggregation functions for the listing, statistics, bar chart and pie chart
//! - The combined report built from a single snapshot of records
//! - Query functions that run the views against a record store
//! - Route handlers that serve the views as JSON

mod categories;
mod combined;
mod filter;
mod handlers;
mod histogram;
mod listing;
mod params;
pub mod queries;
mod statistics;

pub use categories::{CategoryCounts, count_categories};
pub use combined::{CombinedReport, build_combined_report};
pub use filter::{
    FilterParams, MAX_SEARCH_LENGTH, MonthWindow, RecordFilter, SearchClause, build_filter,
    parse_reference_year,
};
pub use handlers::{
    AnalyticsState, get_bar_chart, get_combined, get_pie_chart, get_statistics, get_transactions,
};
pub use histogram::{PRICE_BUCKETS, PriceBucket, PriceHistogram, bucket_prices};
pub use listing::{TransactionPage, paginate};
pub use params::{AnalyticsQuery, parse_month};
pub use queries::AnalyticsConfig;
pub use statistics::{SalesStatistics, summarize_sales};
