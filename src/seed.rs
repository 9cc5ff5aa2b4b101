//! Fetches the remote sales dataset and loads it into the record store.
//!
//! The dataset is fetched and validated in full before the store is touched.
//! If anything goes wrong the store keeps its previous contents.

use std::{future::Future, time::Duration};

use axum::{
    Json,
    extract::{FromRef, State},
};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{
    AppState, Error,
    record::{NewRecord, RecordStore, SharedRecordStore},
};

/// The public sales dataset used when no other URL is given.
pub const DEFAULT_SEED_URL: &str = "https://s3.amazonaws.com/roxiler.com/product_transaction.json";

/// How long to wait for the remote dataset before giving up.
pub const DEFAULT_SEED_TIMEOUT: Duration = Duration::from_secs(10);

/// A record as it appears in the remote dataset.
///
/// The dataset's own `id` is ignored, the record store assigns IDs.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportedRecord {
    /// The product name.
    pub title: String,
    /// The sale price.
    pub price: f64,
    /// A free text description of the product.
    #[serde(default)]
    pub description: String,
    /// The product category.
    pub category: String,
    /// An optional URL for a picture of the product.
    #[serde(default)]
    pub image: Option<String>,
    /// Whether the product was sold.
    #[serde(default)]
    pub sold: bool,
    /// When the sale happened, e.g. "2021-11-27T20:29:54+05:30".
    #[serde(with = "time::serde::rfc3339")]
    pub date_of_sale: OffsetDateTime,
}

impl From<ImportedRecord> for NewRecord {
    /// Keeps the calendar date of the sale in the timestamp's own offset.
    fn from(record: ImportedRecord) -> Self {
        NewRecord {
            title: record.title,
            description: record.description,
            price: record.price,
            category: record.category,
            image: record.image,
            sold: record.sold,
            date_of_sale: record.date_of_sale.date(),
        }
    }
}

/// Somewhere the full dataset can be fetched from.
pub trait DatasetSource {
    /// Fetch every record in the dataset.
    ///
    /// # Errors
    /// Implementers should return an [Error::RemoteFetchFailure] if the
    /// dataset cannot be retrieved or decoded.
    fn fetch(&self) -> impl Future<Output = Result<Vec<ImportedRecord>, Error>> + Send;
}

/// Fetches the dataset as a JSON array over HTTP.
#[derive(Debug, Clone)]
pub struct HttpDatasetSource {
    /// The URL of the JSON dataset.
    pub url: String,
    /// The maximum time to wait for the whole request.
    pub timeout: Duration,
}

impl HttpDatasetSource {
    /// Create a source for `url` that gives up after `timeout`.
    pub fn new(url: &str, timeout: Duration) -> Self {
        Self {
            url: url.to_owned(),
            timeout,
        }
    }
}

impl Default for HttpDatasetSource {
    fn default() -> Self {
        Self::new(DEFAULT_SEED_URL, DEFAULT_SEED_TIMEOUT)
    }
}

impl DatasetSource for HttpDatasetSource {
    async fn fetch(&self) -> Result<Vec<ImportedRecord>, Error> {
        let client = reqwest::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|error| Error::RemoteFetchFailure(error.to_string()))?;

        tracing::debug!("Fetching dataset from {}", self.url);

        let response = client
            .get(&self.url)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|error| Error::RemoteFetchFailure(error.to_string()))?;

        response
            .json::<Vec<ImportedRecord>>()
            .await
            .map_err(|error| Error::RemoteFetchFailure(error.to_string()))
    }
}

/// Replace the contents of `store` with the dataset from `source`.
///
/// Returns the number of records inserted.
///
/// # Errors
/// Returns an [Error::RemoteFetchFailure] if the dataset cannot be fetched, an
/// [Error::InvalidRecord] if any record is invalid, or an
/// [Error::StoreUnavailable] if the store cannot be written to. In every case
/// the store keeps its previous contents.
pub async fn seed_record_store<S>(
    source: &S,
    store: &(dyn RecordStore + Send + Sync),
) -> Result<usize, Error>
where
    S: DatasetSource + Sync,
{
    let imported = source
        .fetch()
        .await
        .inspect_err(|error| tracing::error!("Could not fetch the dataset: {error}"))?;

    let records = validate_records(imported)
        .inspect_err(|error| tracing::error!("Rejected the dataset: {error}"))?;

    let inserted = store.replace_all(records)?;
    tracing::info!("Seeded the record store with {inserted} records");

    Ok(inserted)
}

fn validate_records(imported: Vec<ImportedRecord>) -> Result<Vec<NewRecord>, Error> {
    imported
        .into_iter()
        .map(NewRecord::from)
        .enumerate()
        .map(|(index, record)| {
            record
                .validate()
                .map(|_| record)
                .map_err(|reason| Error::InvalidRecord { index, reason })
        })
        .collect()
}

/// The state needed to seed the record store.
#[derive(Clone)]
pub struct SeedState<S> {
    /// The store to replace the contents of.
    pub record_store: SharedRecordStore,
    /// Where to fetch the dataset from.
    pub dataset_source: S,
}

impl FromRef<AppState> for SeedState<HttpDatasetSource> {
    fn from_ref(state: &AppState) -> Self {
        Self {
            record_store: state.record_store.clone(),
            dataset_source: state.dataset_source.clone(),
        }
    }
}

/// The response body for a successful seed.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct SeedSummary {
    /// How many records the store now holds.
    pub inserted: usize,
}

/// A route handler that replaces the record store contents with the remote dataset.
pub async fn post_seed<S>(State(state): State<SeedState<S>>) -> Result<Json<SeedSummary>, Error>
where
    S: DatasetSource + Clone + Send + Sync + 'static,
{
    let inserted = seed_record_store(&state.dataset_source, state.record_store.as_ref()).await?;

    Ok(Json(SeedSummary { inserted }))
}
