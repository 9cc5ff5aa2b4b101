//! Sold and unsold totals for a set of records.

use serde::{Deserialize, Serialize};

use crate::record::Record;

/// Sales totals over a set of records.
///
/// Every record counts towards exactly one of `total_sold_items` and
/// `total_not_sold_items`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesStatistics {
    /// The sum of the prices of the sold records.
    pub total_sale_amount: f64,
    /// The number of sold records.
    pub total_sold_items: u64,
    /// The number of records that were not sold.
    pub total_not_sold_items: u64,
}

/// Summarize sales over `records` in a single pass.
///
/// An empty slice gives all zeros.
pub fn summarize_sales(records: &[Record]) -> SalesStatistics {
    records
        .iter()
        .fold(SalesStatistics::default(), |mut stats, record| {
            if record.sold {
                stats.total_sale_amount += record.price;
                stats.total_sold_items += 1;
            } else {
                stats.total_not_sold_items += 1;
            }

            stats
        })
}
