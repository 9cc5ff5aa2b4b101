//! Sale transaction records and where they are stored.
//!
//! This module contains:
//! - The `Record` model and the `NewRecord` builder
//! - The `RecordStore` trait that analytics queries read from
//! - A SQLite implementation of the store

mod core;
mod sqlite;
mod store;

pub use core::{NewRecord, Record, RecordId};
pub use sqlite::{SQLiteRecordStore, create_record_table, map_record_row};
pub use store::{RecordStore, SharedRecordStore};
