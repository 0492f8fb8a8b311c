//! Forward-only migration runner with a ledger table.

use chrono::{DateTime, Utc};
use sqlx::FromRow;

use crate::DbPool;

/// Name of the table recording applied migrations.
pub const LEDGER_TABLE: &str = "_library_migrations";

/// Migration definition contributed by a module.
#[derive(Debug, Clone)]
pub struct Migration {
    pub id: &'static str,
    pub up: &'static str,
}

/// A row of the migration ledger.
#[derive(Debug, Clone, FromRow)]
pub struct MigrationRecord {
    pub module: String,
    pub id: String,
    pub applied_at: DateTime<Utc>,
}

/// Apply every pending `(module, migration)` pair in the given order.
///
/// Each migration runs in its own transaction together with its ledger
/// insert. Returns the number of migrations applied by this call.
pub async fn migrate(pool: &DbPool, migrations: &[(String, Migration)]) -> Result<usize, sqlx::Error> {
    ensure_ledger(pool).await?;

    let mut applied = 0;
    for (module, migration) in migrations {
        let already: Option<(String,)> = sqlx::query_as(&format!(
            "SELECT id FROM {LEDGER_TABLE} WHERE module = ?1 AND id = ?2"
        ))
        .bind(module.as_str())
        .bind(migration.id)
        .fetch_optional(pool)
        .await?;

        if already.is_some() {
            tracing::debug!(module = %module, migration = migration.id, "migration already applied");
            continue;
        }

        let mut tx = pool.begin().await?;
        sqlx::raw_sql(migration.up).execute(&mut *tx).await?;
        sqlx::query(&format!(
            "INSERT INTO {LEDGER_TABLE} (module, id, applied_at) VALUES (?1, ?2, ?3)"
        ))
        .bind(module.as_str())
        .bind(migration.id)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;

        tracing::info!(module = %module, migration = migration.id, "migration applied");
        applied += 1;
    }

    Ok(applied)
}

/// List ledger rows in application order.
pub async fn applied_migrations(pool: &DbPool) -> Result<Vec<MigrationRecord>, sqlx::Error> {
    ensure_ledger(pool).await?;
    sqlx::query_as::<_, MigrationRecord>(&format!(
        "SELECT module, id, applied_at FROM {LEDGER_TABLE} ORDER BY applied_at, module, id"
    ))
    .fetch_all(pool)
    .await
}

async fn ensure_ledger(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query(&format!(
        "CREATE TABLE IF NOT EXISTS {LEDGER_TABLE} (
             module     TEXT NOT NULL,
             id         TEXT NOT NULL,
             applied_at TEXT NOT NULL,
             PRIMARY KEY (module, id)
         )"
    ))
    .execute(pool)
    .await?;
    Ok(())
}
