use std::{
    error::Error,
    sync::{Arc, Mutex},
    time::Duration,
};

use clap::Parser;
use rusqlite::Connection;

use sales_insights::{
    SQLiteRecordStore, initialize_db,
    seed::{DEFAULT_SEED_URL, HttpDatasetSource, seed_record_store},
};

/// A utility for loading the remote sales dataset into a sales_insights database.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the SQLite database, created if it does not exist.
    #[arg(long)]
    db_path: String,

    /// The URL of the JSON dataset.
    #[arg(long, default_value_t = DEFAULT_SEED_URL.to_owned())]
    seed_url: String,

    /// How many seconds to wait for the dataset before giving up.
    #[arg(long, default_value_t = 10)]
    seed_timeout_secs: u64,
}

/// Replace the records in the database with the remote dataset.
#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    println!("Opening database at {:#?}", args.db_path);
    let conn = Connection::open(&args.db_path)?;

    initialize_db(&conn)?;

    let store = SQLiteRecordStore::new(Arc::new(Mutex::new(conn)));
    let source = HttpDatasetSource::new(
        &args.seed_url,
        Duration::from_secs(args.seed_timeout_secs),
    );

    println!("Fetching dataset from {}...", args.seed_url);
    let inserted = seed_record_store(&source, &store).await?;

    println!("Success! Inserted {inserted} records.");

    Ok(())
}
