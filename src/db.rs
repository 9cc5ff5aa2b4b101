//! Sets up the SQLite database used by the record store.

use rusqlite::{Connection, Transaction as SqlTransaction, TransactionBehavior};

use crate::{Error, record::create_record_table};

/// Create all the tables the application needs.
///
/// The tables are created inside a single exclusive transaction, so a
/// partially initialized database is never left behind. Calling this on an
/// already initialized database is a no-op.
///
/// # Errors
/// Returns an [Error::StoreUnavailable] if there is an SQL error.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    let transaction = SqlTransaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    create_record_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}
