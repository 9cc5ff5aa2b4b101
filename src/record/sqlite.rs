//! Implements a SQLite backed record store.
use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::{Connection, Row, params_from_iter, types::Value};

use crate::{
    Error,
    analytics::{RecordFilter, TransactionPage},
    pagination::Pagination,
    record::{NewRecord, Record, RecordStore},
};

/// Stores sale records in a SQLite database.
///
/// The record table must exist before the store is used, see
/// [crate::initialize_db].
#[derive(Debug, Clone)]
pub struct SQLiteRecordStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteRecordStore {
    /// Create a new store for the SQLite `connection`.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, Error> {
        self.connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::StoreUnavailable("could not acquire the database lock".to_owned()))
    }
}

impl RecordStore for SQLiteRecordStore {
    /// Query the database for records matching `filter`, ordered by ID.
    ///
    /// # Errors
    /// This function will return an [Error::StoreUnavailable] if the lock is
    /// poisoned or there is an SQL error.
    fn find(&self, filter: &RecordFilter) -> Result<Vec<Record>, Error> {
        select_records(&*self.lock()?, filter, None)
    }

    /// Count the records in the database matching `filter`.
    ///
    /// # Errors
    /// This function will return an [Error::StoreUnavailable] if the lock is
    /// poisoned or there is an SQL error.
    fn count(&self, filter: &RecordFilter) -> Result<u64, Error> {
        count_records(&*self.lock()?, filter)
    }

    /// Count the matching records and select one page of them with
    /// `LIMIT .. OFFSET`.
    ///
    /// Both queries run while holding the store lock, so a concurrent
    /// [RecordStore::replace_all] cannot change the records between them.
    ///
    /// # Errors
    /// This function will return an [Error::StoreUnavailable] if the lock is
    /// poisoned or there is an SQL error.
    fn find_page(
        &self,
        filter: &RecordFilter,
        pagination: Pagination,
    ) -> Result<TransactionPage, Error> {
        let connection = self.lock()?;

        let total = count_records(&connection, filter)?;
        let transactions = select_records(&connection, filter, Some(pagination))?;

        Ok(TransactionPage {
            total,
            page: pagination.page(),
            per_page: pagination.per_page(),
            transactions,
        })
    }

    fn delete_all(&self) -> Result<(), Error> {
        self.lock()?.execute("DELETE FROM sale_record", ())?;

        Ok(())
    }

    /// Insert `records` inside a single SQL transaction.
    ///
    /// # Errors
    /// This function will return an [Error::StoreUnavailable] if the lock is
    /// poisoned or there is an SQL error, in which case no records are inserted.
    fn insert_many(&self, records: Vec<NewRecord>) -> Result<usize, Error> {
        let connection = self.lock()?;
        let tx = connection.unchecked_transaction()?;

        let inserted = insert_records(&tx, records)?;

        tx.commit()?;
        Ok(inserted)
    }

    /// Delete every record and insert `records` inside a single SQL transaction.
    ///
    /// The store lock is held for the whole replacement, so readers observe
    /// either the old or the new set of records.
    ///
    /// # Errors
    /// This function will return an [Error::StoreUnavailable] if the lock is
    /// poisoned or there is an SQL error, in which case the transaction is
    /// rolled back and the old records are kept.
    fn replace_all(&self, records: Vec<NewRecord>) -> Result<usize, Error> {
        let connection = self.lock()?;
        let tx = connection.unchecked_transaction()?;

        tx.execute("DELETE FROM sale_record", ())?;
        let inserted = insert_records(&tx, records)?;

        tx.commit()?;
        Ok(inserted)
    }
}

fn select_records(
    connection: &Connection,
    filter: &RecordFilter,
    pagination: Option<Pagination>,
) -> Result<Vec<Record>, Error> {
    let (where_clause, mut params) = build_where_clause(filter);
    let mut query = format!(
        "SELECT id, title, description, price, category, image, sold, date_of_sale \
        FROM sale_record {where_clause} ORDER BY id ASC"
    );

    if let Some(pagination) = pagination {
        query.push_str(&format!(
            " LIMIT ?{} OFFSET ?{}",
            params.len() + 1,
            params.len() + 2
        ));
        params.push(Value::Integer(
            i64::try_from(pagination.per_page()).unwrap_or(i64::MAX),
        ));
        params.push(Value::Integer(
            i64::try_from(pagination.offset()).unwrap_or(i64::MAX),
        ));
    }

    connection
        .prepare(&query)?
        .query_map(params_from_iter(params.iter()), map_record_row)?
        .map(|maybe_record| maybe_record.map_err(|error| error.into()))
        .collect()
}

fn count_records(connection: &Connection, filter: &RecordFilter) -> Result<u64, Error> {
    let (where_clause, params) = build_where_clause(filter);
    let query = format!("SELECT COUNT(id) FROM sale_record {where_clause}");

    let count: i64 =
        connection.query_row(&query, params_from_iter(params.iter()), |row| row.get(0))?;

    Ok(count.unsigned_abs())
}

fn insert_records(connection: &Connection, records: Vec<NewRecord>) -> Result<usize, Error> {
    let mut stmt = connection.prepare(
        "INSERT INTO sale_record (title, description, price, category, image, sold, date_of_sale)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
    )?;

    let mut inserted = 0;

    for record in records {
        inserted += stmt.execute((
            record.title,
            record.description,
            record.price,
            record.category,
            record.image,
            record.sold,
            record.date_of_sale,
        ))?;
    }

    Ok(inserted)
}

/// Translate `filter` into a SQL `WHERE` clause and its positional parameters.
///
/// Returns an empty clause if the filter matches every record.
fn build_where_clause(filter: &RecordFilter) -> (String, Vec<Value>) {
    let mut where_clause_parts = vec![];
    let mut query_parameters = vec![];

    if let Some(window) = filter.window {
        where_clause_parts.push(format!(
            "date_of_sale >= ?{} AND date_of_sale < ?{}",
            query_parameters.len() + 1,
            query_parameters.len() + 2,
        ));
        query_parameters.push(Value::Text(window.start.to_string()));
        query_parameters.push(Value::Text(window.end.to_string()));
    }

    if let Some(search) = &filter.search {
        let pattern_index = query_parameters.len() + 1;
        let mut search_parts = vec![
            format!("title LIKE ?{pattern_index} ESCAPE '\\'"),
            format!("description LIKE ?{pattern_index} ESCAPE '\\'"),
        ];
        query_parameters.push(Value::Text(format!(
            "%{}%",
            escape_like_pattern(search.text())
        )));

        if let Some(price) = search.price() {
            search_parts.push(format!("price = ?{}", query_parameters.len() + 1));
            query_parameters.push(Value::Real(price));
        }

        where_clause_parts.push(format!("({})", search_parts.join(" OR ")));
    }

    if where_clause_parts.is_empty() {
        (String::new(), query_parameters)
    } else {
        (
            String::from("WHERE ") + &where_clause_parts.join(" AND "),
            query_parameters,
        )
    }
}

/// Escape the wildcard characters of SQL's `LIKE` so `text` is matched literally.
fn escape_like_pattern(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());

    for c in text.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }

    escaped
}

/// Create the sale record table in the database.
///
/// # Errors
/// Returns an error if there is an SQL error.
pub fn create_record_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS sale_record (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            description TEXT NOT NULL,
            price REAL NOT NULL CHECK (price >= 0),
            category TEXT NOT NULL CHECK (length(trim(category)) > 0),
            image TEXT,
            sold INTEGER NOT NULL,
            date_of_sale TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_sale_record_date ON sale_record(date_of_sale);",
    )
}

/// Map a database row to a [Record].
pub fn map_record_row(row: &Row) -> Result<Record, rusqlite::Error> {
    Ok(Record {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        price: row.get(3)?,
        category: row.get(4)?,
        image: row.get(5)?,
        sold: row.get(6)?,
        date_of_sale: row.get(7)?,
    })
}

#[cfg(test)]
mod sqlite_record_store_tests {
    use std::sync::{Arc, Mutex};

    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        Error,
        analytics::{FilterParams, RecordFilter, build_filter, paginate},
        db::initialize,
        pagination::{Pagination, PaginationConfig},
        record::{NewRecord, Record, RecordStore},
    };

    use super::SQLiteRecordStore;

    fn get_test_store() -> SQLiteRecordStore {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        SQLiteRecordStore::new(Arc::new(Mutex::new(conn)))
    }

    fn sample_records() -> Vec<NewRecord> {
        vec![
            Record::build("Fjallraven Backpack", 329.85, "men's clothing", date!(2021 - 03 - 01))
                .description("Your perfect pack for everyday use")
                .sold(true),
            Record::build("Mens Casual T-Shirt", 22.3, "men's clothing", date!(2021 - 03 - 31))
                .description("Slim-fitting style, 100% cotton"),
            Record::build("Gold Ring", 168.0, "jewelery", date!(2021 - 04 - 01))
                .description("Satisfaction guaranteed"),
            Record::build("WD 2TB Hard Drive", 64.0, "electronics", date!(2021 - 11 - 15))
                .description("USB 3.0 and 50% off_peak")
                .sold(true),
        ]
    }

    fn filter(month: Option<i64>, search: Option<&str>) -> RecordFilter {
        build_filter(
            &FilterParams {
                month,
                search: search.map(str::to_owned),
            },
            2021,
        )
        .expect("Could not build filter")
    }

    #[test]
    fn insert_many_assigns_ids_in_insertion_order() {
        let store = get_test_store();

        let inserted = store.insert_many(sample_records()).unwrap();
        let records = store.find(&RecordFilter::all()).unwrap();

        assert_eq!(inserted, 4);
        let ids: Vec<_> = records.iter().map(|record| record.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
        assert_eq!(records[0].title, "Fjallraven Backpack");
        assert_eq!(records[0].date_of_sale, date!(2021 - 03 - 01));
        assert!(records[0].sold);
    }

    fn page(page: i64, per_page: i64) -> Pagination {
        Pagination::new(Some(page), Some(per_page), &PaginationConfig::default())
            .expect("Could not create pagination")
    }

    #[test]
    fn find_page_matches_paginating_in_memory() {
        let store = get_test_store();
        store.insert_many(sample_records()).unwrap();

        for filter in [
            RecordFilter::all(),
            filter(Some(3), None),
            filter(None, Some("ing")),
            filter(Some(11), Some("64")),
        ] {
            let all_records = store.find(&filter).unwrap();

            for (page_number, per_page) in [(1, 1), (2, 1), (1, 3), (2, 3), (3, 3), (5, 10)] {
                let pagination = page(page_number, per_page);

                let got = store.find_page(&filter, pagination).unwrap();

                assert_eq!(
                    got,
                    paginate(&all_records, pagination),
                    "page {page_number} of {per_page} for {filter:?}"
                );
            }
        }
    }

    #[test]
    fn find_page_total_counts_all_matching_records() {
        let store = get_test_store();
        store.insert_many(sample_records()).unwrap();

        let got = store.find_page(&filter(None, Some("ing")), page(2, 1)).unwrap();

        assert_eq!(got.total, store.count(&filter(None, Some("ing"))).unwrap());
        assert_eq!(got.total, 2);
        assert_eq!(got.transactions.len(), 1);
        assert_eq!(got.transactions[0].title, "Gold Ring");
    }

    #[test]
    fn find_page_past_the_end_is_empty() {
        let store = get_test_store();
        store.insert_many(sample_records()).unwrap();

        let got = store.find_page(&RecordFilter::all(), page(3, 2)).unwrap();

        assert_eq!(got.total, 4);
        assert!(got.transactions.is_empty());
    }

    #[test]
    fn find_uses_half_open_month_window() {
        let store = get_test_store();
        store.insert_many(sample_records()).unwrap();

        let records = store.find(&filter(Some(3), None)).unwrap();

        let titles: Vec<_> = records.iter().map(|record| record.title.as_str()).collect();
        assert_eq!(titles, vec!["Fjallraven Backpack", "Mens Casual T-Shirt"]);
    }

    #[test]
    fn find_searches_title_and_description_case_insensitively() {
        let store = get_test_store();
        store.insert_many(sample_records()).unwrap();

        let by_title = store.find(&filter(None, Some("backPACK"))).unwrap();
        let by_description = store.find(&filter(None, Some("COTTON"))).unwrap();

        assert_eq!(by_title.len(), 1);
        assert_eq!(by_title[0].title, "Fjallraven Backpack");
        assert_eq!(by_description.len(), 1);
        assert_eq!(by_description[0].title, "Mens Casual T-Shirt");
    }

    #[test]
    fn find_matches_numeric_search_against_price() {
        let store = get_test_store();
        store.insert_many(sample_records()).unwrap();

        let records = store.find(&filter(None, Some("168"))).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title, "Gold Ring");
    }

    #[test]
    fn find_treats_like_wildcards_literally() {
        let store = get_test_store();
        store.insert_many(sample_records()).unwrap();

        let percent = store.find(&filter(None, Some("50%"))).unwrap();
        let underscore = store.find(&filter(None, Some("t_s"))).unwrap();

        assert_eq!(percent.len(), 1);
        assert_eq!(percent[0].title, "WD 2TB Hard Drive");
        assert!(underscore.is_empty());
    }

    #[test]
    fn sql_and_in_memory_filters_agree() {
        let store = get_test_store();
        store.insert_many(sample_records()).unwrap();
        let all_records = store.find(&RecordFilter::all()).unwrap();

        for (month, search) in [
            (None, Some("e")),
            (Some(3), Some("shirt")),
            (Some(11), None),
            (None, Some("64")),
            (Some(4), Some("nothing matches")),
        ] {
            let filter = filter(month, search);
            let want: Vec<_> = all_records
                .iter()
                .filter(|record| filter.matches(record))
                .cloned()
                .collect();

            let got = store.find(&filter).unwrap();

            assert_eq!(want, got, "month {month:?}, search {search:?}");
        }
    }

    #[test]
    fn count_matches_find() {
        let store = get_test_store();
        store.insert_many(sample_records()).unwrap();

        assert_eq!(store.count(&RecordFilter::all()).unwrap(), 4);
        assert_eq!(store.count(&filter(Some(3), None)).unwrap(), 2);
        assert_eq!(store.count(&filter(Some(1), None)).unwrap(), 0);
    }

    #[test]
    fn delete_all_empties_store() {
        let store = get_test_store();
        store.insert_many(sample_records()).unwrap();

        store.delete_all().unwrap();

        assert_eq!(store.count(&RecordFilter::all()).unwrap(), 0);
    }

    #[test]
    fn replace_all_swaps_contents() {
        let store = get_test_store();
        store.insert_many(sample_records()).unwrap();

        let inserted = store
            .replace_all(vec![Record::build(
                "Monitor",
                599.0,
                "electronics",
                date!(2021 - 05 - 05),
            )])
            .unwrap();

        let records = store.find(&RecordFilter::all()).unwrap();
        assert_eq!(inserted, 1);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title, "Monitor");
    }

    #[test]
    fn failed_replace_keeps_old_records() {
        let store = get_test_store();
        store.insert_many(sample_records()).unwrap();

        let result = store.replace_all(vec![
            Record::build("Valid", 1.0, "misc", date!(2021 - 05 - 05)),
            Record::build("Invalid", -1.0, "misc", date!(2021 - 05 - 05)),
        ]);

        assert!(matches!(result, Err(Error::StoreUnavailable(_))));
        assert_eq!(store.count(&RecordFilter::all()).unwrap(), 4);
    }
}
