//! Service bootstrap shared by the `library-app` binary and the CLI.

use anyhow::Context;
use library_db::DbPool;
use library_kernel::{settings::Settings, InitCtx, ModuleRegistry};

use crate::modules;

/// Registry with every domain module registered.
pub fn registry() -> anyhow::Result<ModuleRegistry> {
    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry)?;
    Ok(registry)
}

/// Open the configured store.
pub async fn connect(settings: &Settings) -> anyhow::Result<DbPool> {
    library_db::create_pool(&settings.database.url, settings.database.max_connections)
        .await
        .with_context(|| format!("failed to open database '{}'", settings.database.url))
}

/// Apply every pending module migration. Returns how many ran.
pub async fn migrate(db: &DbPool, registry: &ModuleRegistry) -> anyhow::Result<usize> {
    let migrations = registry.collect_migrations();
    let applied = library_db::migrate(db, &migrations)
        .await
        .context("failed to apply migrations")?;
    tracing::info!(applied, total = migrations.len(), "migrations up to date");
    Ok(applied)
}

/// Run the HTTP service against the configured store until shutdown.
pub async fn serve(settings: Settings) -> anyhow::Result<()> {
    let db = connect(&settings).await?;
    serve_with(settings, db).await
}

/// Run the HTTP service against an already opened store.
pub async fn serve_with(settings: Settings, db: DbPool) -> anyhow::Result<()> {
    let registry = registry()?;

    library_db::health_check(&db)
        .await
        .context("database health check failed")?;

    if settings.database.run_migrations || library_db::is_in_memory(&settings.database.url) {
        migrate(&db, &registry).await?;
    }

    let ctx = InitCtx {
        settings: &settings,
        db: &db,
    };
    registry.init_modules(&ctx).await?;
    registry.start_modules(&ctx).await?;

    tracing::info!(modules = registry.module_count(), "library-app bootstrap complete");

    let served = library_http::start_server(&registry, &settings, db.clone()).await;

    registry.stop_modules().await?;
    db.close().await;

    served
}
