//! Defines the record store trait.

use std::sync::Arc;

use crate::{
    Error,
    analytics::{RecordFilter, TransactionPage, paginate},
    pagination::Pagination,
    record::{NewRecord, Record},
};

/// Holds the sale records that analytics queries run over.
///
/// Implementers must make [RecordStore::replace_all] atomic with respect to
/// readers: a concurrent [RecordStore::find] sees either every old record or
/// every new record, never a mix.
pub trait RecordStore {
    /// Retrieve the records matching `filter`, ordered by ID.
    fn find(&self, filter: &RecordFilter) -> Result<Vec<Record>, Error>;

    /// Count the records matching `filter`.
    fn count(&self, filter: &RecordFilter) -> Result<u64, Error>;

    /// Retrieve one page of the records matching `filter`, ordered by ID,
    /// together with the total number of matching records.
    ///
    /// The total and the page must come from the same version of the store.
    /// The default implementation slices the result of [RecordStore::find].
    fn find_page(
        &self,
        filter: &RecordFilter,
        pagination: Pagination,
    ) -> Result<TransactionPage, Error> {
        let records = self.find(filter)?;

        Ok(paginate(&records, pagination))
    }

    /// Remove every record from the store.
    fn delete_all(&self) -> Result<(), Error>;

    /// Add `records` to the store, returning how many were inserted.
    fn insert_many(&self, records: Vec<NewRecord>) -> Result<usize, Error>;

    /// Replace the entire contents of the store with `records`.
    ///
    /// If the replacement fails, the previous contents are kept.
    fn replace_all(&self, records: Vec<NewRecord>) -> Result<usize, Error>;
}

/// A record store that can be shared between request handlers.
pub type SharedRecordStore = Arc<dyn RecordStore + Send + Sync>;
