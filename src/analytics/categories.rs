//! Record counts per category for the pie chart.

use std::collections::BTreeMap;

use crate::record::Record;

/// The number of records in each category that appears in a record set.
///
/// Only observed categories are present; there is no zero-fill.
pub type CategoryCounts = BTreeMap<String, u64>;

/// Count `records` by category.
pub fn count_categories(records: &[Record]) -> CategoryCounts {
    let mut counts = CategoryCounts::new();

    for record in records {
        *counts.entry(record.category.clone()).or_insert(0) += 1;
    }

    counts
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use crate::{analytics::categories::count_categories, record::Record};

    fn record(category: &str) -> Record {
        Record {
            id: 1,
            title: String::new(),
            description: String::new(),
            price: 1.0,
            category: category.to_owned(),
            image: None,
            sold: false,
            date_of_sale: date!(2021 - 01 - 01),
        }
    }

    #[test]
    fn counts_each_observed_category() {
        let records = vec![record("A"), record("B"), record("A")];

        let got = count_categories(&records);

        assert_eq!(got.len(), 2);
        assert_eq!(got["A"], 2);
        assert_eq!(got["B"], 1);
    }

    #[test]
    fn empty_set_has_no_categories() {
        assert!(count_categories(&[]).is_empty());
    }

    #[test]
    fn counts_sum_to_record_count() {
        let records: Vec<_> = ["electronics", "jewelery", "electronics", "men's clothing"]
            .into_iter()
            .map(record)
            .collect();

        let got = count_categories(&records);

        assert_eq!(got.values().sum::<u64>(), records.len() as u64);
    }

    #[test]
    fn categories_are_case_sensitive() {
        let got = count_categories(&[record("Books"), record("books")]);

        assert_eq!(got.len(), 2);
    }
}
