//! # SQLite Database methods
//!
//! This module contains "low-level" SQLite database interactions.
//!
//! All these interaction are maintained by simple functions (rather than stateful structs) that accept a
//! `&mut SqliteConnection` argument. Callers can obtain a connection from a pool,
//! or create an atomic transaction as the need arises and call through to the functions without any other changes.
use std::{str::FromStr, time::Duration};

use log::{info, warn};
use sqlx::{
    migrate,
    migrate::MigrateDatabase,
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions},
    Error as SqlxError,
    Sqlite,
    SqlitePool,
};

pub mod orders;

/// How long a connection waits for another writer to finish before giving up with `SQLITE_BUSY`.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Creates the database file if it is missing.
pub async fn create_database_if_missing(url: &str) -> Result<(), SqlxError> {
    if !Sqlite::database_exists(url).await? {
        warn!("🗃️ Database {url} does not exist. Creating it now.");
        Sqlite::create_database(url).await?;
    }
    Ok(())
}

/// Opens a connection pool in WAL mode, so readers never block the single writer and writers queue on the busy
/// timeout instead of failing.
pub async fn new_pool(url: &str, max_connections: u32) -> Result<SqlitePool, SqlxError> {
    let options =
        SqliteConnectOptions::from_str(url)?.journal_mode(SqliteJournalMode::Wal).busy_timeout(BUSY_TIMEOUT);
    let pool = SqlitePoolOptions::new().max_connections(max_connections).connect_with(options).await?;
    Ok(pool)
}

/// Brings the schema up to date. Migrations are embedded in the binary at compile time.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), SqlxError> {
    migrate!("./src/sqlite/migrations").run(pool).await?;
    info!("🗃️ Database migrations complete");
    Ok(())
}
