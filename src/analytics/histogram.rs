//! Price range bucketing for the bar chart.
//!
//! The price axis is split into ten fixed buckets with inclusive upper bounds:
//! `0-100`, `101-200`, ..., `801-900`, and a catch-all `901-above`. Every bucket
//! is always reported, even when empty, so charts never have gaps.

use serde::{Serialize, Serializer, ser::SerializeMap};

use crate::record::Record;

/// A named range of the price axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceBucket {
    /// The label used as the key in chart data, e.g. "101-200".
    pub label: &'static str,
    /// The largest price in the bucket, or `None` for the catch-all bucket.
    pub max_price: Option<f64>,
}

const fn bucket(label: &'static str, max_price: f64) -> PriceBucket {
    PriceBucket {
        label,
        max_price: Some(max_price),
    }
}

/// The buckets in ascending price order.
pub const PRICE_BUCKETS: [PriceBucket; 10] = [
    bucket("0-100", 100.0),
    bucket("101-200", 200.0),
    bucket("201-300", 300.0),
    bucket("301-400", 400.0),
    bucket("401-500", 500.0),
    bucket("501-600", 600.0),
    bucket("601-700", 700.0),
    bucket("701-800", 800.0),
    bucket("801-900", 900.0),
    PriceBucket {
        label: "901-above",
        max_price: None,
    },
];

/// The number of records in each of the [PRICE_BUCKETS].
///
/// Serializes as a JSON object keyed by bucket label, in ascending price order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PriceHistogram {
    counts: [u64; PRICE_BUCKETS.len()],
}

impl PriceHistogram {
    /// The count for the bucket named `label`, or `None` if there is no such bucket.
    pub fn get(&self, label: &str) -> Option<u64> {
        PRICE_BUCKETS
            .iter()
            .position(|bucket| bucket.label == label)
            .map(|index| self.counts[index])
    }

    /// The bucket labels and their counts in ascending price order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, u64)> + '_ {
        PRICE_BUCKETS
            .iter()
            .zip(self.counts.iter())
            .map(|(bucket, count)| (bucket.label, *count))
    }

    /// The number of records across all buckets.
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }
}

impl Serialize for PriceHistogram {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(PRICE_BUCKETS.len()))?;

        for (label, count) in self.iter() {
            map.serialize_entry(label, &count)?;
        }

        map.end()
    }
}

/// Count how many of `records` fall in each price bucket.
pub fn bucket_prices(records: &[Record]) -> PriceHistogram {
    let mut histogram = PriceHistogram::default();

    for record in records {
        histogram.counts[bucket_index(record.price)] += 1;
    }

    histogram
}

/// Find the first bucket whose inclusive upper bound is at least `price`,
/// falling through to the catch-all bucket.
fn bucket_index(price: f64) -> usize {
    PRICE_BUCKETS
        .iter()
        .position(|bucket| bucket.max_price.is_some_and(|max_price| price <= max_price))
        .unwrap_or(PRICE_BUCKETS.len() - 1)
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use crate::{
        analytics::histogram::{PRICE_BUCKETS, bucket_prices},
        record::Record,
    };

    fn record(price: f64) -> Record {
        Record {
            id: 1,
            title: String::new(),
            description: String::new(),
            price,
            category: "A".to_owned(),
            image: None,
            sold: true,
            date_of_sale: date!(2021 - 01 - 01),
        }
    }

    #[test]
    fn boundaries_are_inclusive_upper_bounds() {
        let records: Vec<_> = [0.0, 100.0, 100.01, 200.0, 900.0, 900.5]
            .into_iter()
            .map(record)
            .collect();

        let got = bucket_prices(&records);

        assert_eq!(got.get("0-100"), Some(2));
        assert_eq!(got.get("101-200"), Some(2));
        assert_eq!(got.get("801-900"), Some(1));
        assert_eq!(got.get("901-above"), Some(1));
    }

    #[test]
    fn example_records_fill_first_second_and_last_buckets() {
        let records = vec![record(50.0), record(150.0), record(999.0)];

        let got = bucket_prices(&records);

        let want = [
            ("0-100", 1),
            ("101-200", 1),
            ("201-300", 0),
            ("301-400", 0),
            ("401-500", 0),
            ("501-600", 0),
            ("601-700", 0),
            ("701-800", 0),
            ("801-900", 0),
            ("901-above", 1),
        ];
        assert_eq!(got.iter().collect::<Vec<_>>(), want);
    }

    #[test]
    fn empty_set_reports_every_bucket_as_zero() {
        let got = bucket_prices(&[]);

        assert_eq!(got.iter().count(), PRICE_BUCKETS.len());
        assert!(got.iter().all(|(_, count)| count == 0));
    }

    #[test]
    fn every_record_lands_in_exactly_one_bucket() {
        let records: Vec<_> = (0..250).map(|i| record(i as f64 * 4.3)).collect();

        let got = bucket_prices(&records);

        assert_eq!(got.total(), records.len() as u64);
    }

    #[test]
    fn serializes_labels_in_price_order() {
        let got = bucket_prices(&[record(450.0)]);

        let json = serde_json::to_string(&got).unwrap();

        assert_eq!(
            json,
            "{\"0-100\":0,\"101-200\":0,\"201-300\":0,\"301-400\":0,\"401-500\":1,\
            \"501-600\":0,\"601-700\":0,\"701-800\":0,\"801-900\":0,\"901-above\":0}"
        );
    }

    #[test]
    fn unknown_label_is_none() {
        assert_eq!(bucket_prices(&[]).get("1000-2000"), None);
    }
}
