//! Merges the listing, statistics, bar chart and pie chart into one response.

use serde::Serialize;

use crate::{
    analytics::{
        CategoryCounts, PriceHistogram, RecordFilter, SalesStatistics, TransactionPage,
        bucket_prices, count_categories, paginate, summarize_sales,
    },
    pagination::Pagination,
    record::Record,
};

/// Every analytics view for one request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CombinedReport {
    /// The requested page of records matching the month and search text.
    pub transactions: TransactionPage,
    /// Sales totals for the month.
    pub statistics: SalesStatistics,
    /// Record counts per price range for the month.
    pub bar_chart: PriceHistogram,
    /// Record counts per category for the month.
    pub pie_chart: CategoryCounts,
}

/// Build every view from a single snapshot of records.
///
/// `month_records` must hold exactly the records matching `filter`'s month
/// window, in ID order. The statistics and charts cover all of them, while the
/// listing is further narrowed by `filter`'s search clause and paginated.
pub fn build_combined_report(
    month_records: &[Record],
    filter: &RecordFilter,
    pagination: Pagination,
) -> CombinedReport {
    let listed: Vec<Record> = month_records
        .iter()
        .filter(|record| filter.matches(record))
        .cloned()
        .collect();

    CombinedReport {
        transactions: paginate(&listed, pagination),
        statistics: summarize_sales(month_records),
        bar_chart: bucket_prices(month_records),
        pie_chart: count_categories(month_records),
    }
}
