//! Splits a set of matching records into pages.

use serde::{Deserialize, Serialize};

use crate::{pagination::Pagination, record::Record};

/// One page of matching records, with the total needed to render page links.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionPage {
    /// The number of records matching the filter across all pages.
    pub total: u64,
    /// The 1-indexed page number.
    pub page: u64,
    /// The maximum number of records on a page.
    pub per_page: u64,
    /// The records on this page, in ID order.
    pub transactions: Vec<Record>,
}

/// Select the page described by `pagination` from `records`.
///
/// `records` must already be filtered and in ID order. Pages past the end are
/// empty rather than an error.
pub fn paginate(records: &[Record], pagination: Pagination) -> TransactionPage {
    let offset = usize::try_from(pagination.offset()).unwrap_or(usize::MAX);
    let per_page = usize::try_from(pagination.per_page()).unwrap_or(usize::MAX);

    let transactions = records
        .iter()
        .skip(offset)
        .take(per_page)
        .cloned()
        .collect();

    TransactionPage {
        total: records.len() as u64,
        page: pagination.page(),
        per_page: pagination.per_page(),
        transactions,
    }
}
