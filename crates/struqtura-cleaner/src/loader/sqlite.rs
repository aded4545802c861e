//! SQLite database uploads via `sqlx`.
//!
//! The uploaded bytes are a whole database file. Only [`SQLITE_TABLE`] is
//! read; a database without it fails to load.

use super::columns::{Cell, build_table};
use crate::error::{CleanerError, Result};
use crate::types::Table;
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection, SqliteRow};
use sqlx::{Connection, Row};
use std::io::Write;
use std::path::Path;
use tracing::debug;

const FORMAT: &str = "sqlite";

/// Name of the table read from an uploaded database.
pub const SQLITE_TABLE: &str = "main_table";

/// Read [`SQLITE_TABLE`] from database bytes.
///
/// The read runs on its own current-thread runtime. Called from inside a
/// Tokio runtime, that runtime is driven on a separate thread.
pub(super) fn read_sqlite(bytes: &[u8]) -> Result<Table> {
    // SQLite needs a real file to open.
    let mut file = tempfile::NamedTempFile::new()?;
    file.write_all(bytes)?;
    file.flush()?;

    let path = file.path();
    let read = || -> Result<TableCells> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        runtime
            .block_on(read_main_table(path))
            .map_err(|e| CleanerError::parse(FORMAT, e))
    };

    let (names, columns) = if tokio::runtime::Handle::try_current().is_ok() {
        debug!("Already inside a Tokio runtime; reading the database on a separate thread");
        std::thread::scope(|scope| scope.spawn(read).join())
            .map_err(|_| CleanerError::parse(FORMAT, "database reader thread panicked"))??
    } else {
        read()?
    };

    if names.is_empty() {
        return Err(CleanerError::parse(
            FORMAT,
            format!("database has no table named '{}'", SQLITE_TABLE),
        ));
    }

    debug!("Read {} columns from {}", names.len(), SQLITE_TABLE);
    build_table(FORMAT, names, columns)
}

/// Column names and their cells.
type TableCells = (Vec<String>, Vec<Vec<Cell>>);

async fn read_main_table(path: &Path) -> std::result::Result<TableCells, sqlx::Error> {
    let options = SqliteConnectOptions::new().filename(path).read_only(true);
    let mut conn = SqliteConnection::connect_with(&options).await?;

    // Column names come from the schema so an empty table still has them.
    let schema = sqlx::query(&format!("PRAGMA table_info(\"{}\")", SQLITE_TABLE))
        .fetch_all(&mut conn)
        .await?;
    let names = schema
        .iter()
        .map(|row| row.try_get::<String, _>("name"))
        .collect::<std::result::Result<Vec<_>, _>>()?;

    if names.is_empty() {
        conn.close().await?;
        return Ok((names, Vec::new()));
    }

    let rows = sqlx::query(&format!("SELECT * FROM \"{}\"", SQLITE_TABLE))
        .fetch_all(&mut conn)
        .await?;

    let mut columns: Vec<Vec<Cell>> = vec![Vec::with_capacity(rows.len()); names.len()];
    for row in &rows {
        for (idx, column) in columns.iter_mut().enumerate() {
            column.push(cell_at(row, idx));
        }
    }

    conn.close().await?;
    Ok((names, columns))
}

/// SQLite is dynamically typed, so each value is decoded by trying the
/// storage classes in turn.
fn cell_at(row: &SqliteRow, idx: usize) -> Cell {
    if let Ok(value) = row.try_get::<Option<i64>, _>(idx) {
        return value.map(Cell::Int).unwrap_or(Cell::Null);
    }
    if let Ok(value) = row.try_get::<Option<f64>, _>(idx) {
        return value.map(Cell::Float).unwrap_or(Cell::Null);
    }
    if let Ok(value) = row.try_get::<Option<String>, _>(idx) {
        return value.map(|s| Cell::text(&s)).unwrap_or(Cell::Null);
    }
    match row.try_get::<Option<Vec<u8>>, _>(idx) {
        Ok(Some(blob)) => Cell::text(&String::from_utf8_lossy(&blob)),
        _ => Cell::Null,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;
    use pretty_assertions::assert_eq;

    fn build_database(statements: &[&str]) -> Vec<u8> {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("upload.db");

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        runtime.block_on(async {
            let options = SqliteConnectOptions::new().filename(&path).create_if_missing(true);
            let mut conn = SqliteConnection::connect_with(&options).await.unwrap();
            for statement in statements {
                sqlx::query(statement).execute(&mut conn).await.unwrap();
            }
            conn.close().await.unwrap();
        });

        std::fs::read(&path).unwrap()
    }

    #[test]
    fn test_read_main_table() {
        let bytes = build_database(&[
            "CREATE TABLE main_table (age INTEGER, score REAL, city TEXT)",
            "INSERT INTO main_table VALUES (25, 1.5, 'NY'), (NULL, 2.5, 'LA'), (35, NULL, NULL)",
        ]);

        let df = read_sqlite(&bytes).unwrap();

        assert_eq!(df.shape(), (3, 3));
        assert_eq!(df.column("age").unwrap().dtype(), &DataType::Int64);
        assert_eq!(df.column("score").unwrap().dtype(), &DataType::Float64);
        assert_eq!(df.column("city").unwrap().dtype(), &DataType::String);
        assert_eq!(df.column("age").unwrap().null_count(), 1);
        assert_eq!(df.column("city").unwrap().null_count(), 1);
    }

    #[test]
    fn test_empty_main_table_keeps_columns() {
        let bytes = build_database(&["CREATE TABLE main_table (id INTEGER, name TEXT)"]);

        let df = read_sqlite(&bytes).unwrap();

        assert_eq!(df.shape(), (0, 2));
    }

    #[test]
    fn test_missing_main_table_is_parse_error() {
        let bytes = build_database(&["CREATE TABLE other (id INTEGER)"]);

        let err = read_sqlite(&bytes).unwrap_err();

        assert_eq!(err.error_code(), "PARSE_ERROR");
        assert!(err.to_string().contains(SQLITE_TABLE));
    }

    #[test]
    fn test_text_missing_tokens_are_null() {
        let bytes = build_database(&[
            "CREATE TABLE main_table (city TEXT)",
            "INSERT INTO main_table VALUES ('NY'), ('NA'), ('null'), ('')",
        ]);

        let df = read_sqlite(&bytes).unwrap();

        assert_eq!(df.column("city").unwrap().null_count(), 3);
    }

    #[test]
    fn test_read_inside_tokio_runtime() {
        let bytes = build_database(&[
            "CREATE TABLE main_table (id INTEGER)",
            "INSERT INTO main_table VALUES (1), (2)",
        ]);

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        let df = runtime.block_on(async { read_sqlite(&bytes) }).unwrap();

        assert_eq!(df.shape(), (2, 1));
    }

    #[test]
    fn test_garbage_is_parse_error() {
        let err = read_sqlite(b"this is certainly not a sqlite database file at all").unwrap_err();
        assert_eq!(err.error_code(), "PARSE_ERROR");
    }
}
