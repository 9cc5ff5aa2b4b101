//! Implements a struct that holds the state of the REST server.

use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::{
    Error,
    analytics::AnalyticsConfig,
    db::initialize,
    record::{SQLiteRecordStore, SharedRecordStore},
    seed::HttpDatasetSource,
};

/// The state of the REST server.
#[derive(Clone)]
pub struct AppState {
    /// The store holding the sale records.
    pub record_store: SharedRecordStore,

    /// The reference year and pagination defaults for the analytics views.
    pub analytics_config: AnalyticsConfig,

    /// Where to fetch the dataset from when seeding.
    pub dataset_source: HttpDatasetSource,
}

impl AppState {
    /// Create a new [AppState] with a SQLite database connection.
    ///
    /// This function will initialize the database by adding the record table.
    ///
    /// # Errors
    /// Returns an error if the database cannot be initialized.
    pub fn new(
        db_connection: Connection,
        analytics_config: AnalyticsConfig,
        dataset_source: HttpDatasetSource,
    ) -> Result<Self, Error> {
        initialize(&db_connection)?;

        let connection = Arc::new(Mutex::new(db_connection));

        Ok(Self {
            record_store: Arc::new(SQLiteRecordStore::new(connection)),
            analytics_config,
            dataset_source,
        })
    }
}
