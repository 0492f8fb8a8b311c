use library_db::DbPool;

/// In-memory store with every module migration applied.
pub async fn migrated_pool() -> DbPool {
    let db = library_db::memory_pool().await.expect("memory pool");
    let registry = crate::app::registry().expect("registry");
    crate::app::migrate(&db, &registry).await.expect("migrations");
    db
}
