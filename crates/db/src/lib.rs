//! SQLite persistence gateway for the library service.
//!
//! Owns the connection pool and hands out request-scoped transactions. A
//! [`DbTx`] that is dropped without `commit` rolls back and returns its
//! connection to the pool, so callers only commit on the success path.
//!
//! Requests that write use [`begin_write`], which takes SQLite's write lock
//! up front. A deferred transaction that reads and then writes can lose the
//! lock upgrade to a concurrent writer and fail with `SQLITE_BUSY`; an
//! immediate one waits for the other writer to commit and then reads its
//! rows.

use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

pub mod migrate;

pub use migrate::{applied_migrations, migrate, Migration, MigrationRecord, LEDGER_TABLE};

pub type DbPool = sqlx::SqlitePool;
pub type DbConn = sqlx::SqliteConnection;
pub type DbTx = sqlx::Transaction<'static, sqlx::Sqlite>;

/// How long a writer waits for another writer's lock before giving up.
pub const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Create a connection pool from a database URL.
///
/// Foreign keys are enforced on every connection. In-memory URLs are pinned
/// to a single long-lived connection, since each SQLite memory connection is
/// its own database.
pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<DbPool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true)
        .busy_timeout(BUSY_TIMEOUT);

    if is_in_memory(database_url) {
        return pinned_pool(options).await;
    }

    SqlitePoolOptions::new()
        .max_connections(max_connections.max(1))
        .connect_with(options)
        .await
}

/// Fresh private in-memory database, used by tests and `library serve --ephemeral`.
pub async fn memory_pool() -> Result<DbPool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);
    pinned_pool(options).await
}

async fn pinned_pool(options: SqliteConnectOptions) -> Result<DbPool, sqlx::Error> {
    SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
}

/// Whether the URL names a SQLite in-memory database.
pub fn is_in_memory(database_url: &str) -> bool {
    database_url.contains(":memory:") || database_url.contains("mode=memory")
}

/// Start the transaction that scopes one request's work.
pub async fn begin(pool: &DbPool) -> Result<DbTx, sqlx::Error> {
    pool.begin().await
}

/// Start a request transaction that will write. Holds the write lock from
/// the first statement, so its reads see every committed write.
pub async fn begin_write(pool: &DbPool) -> Result<DbTx, sqlx::Error> {
    pool.begin_with("BEGIN IMMEDIATE").await
}

/// Round-trip a trivial query to verify the store is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}
