//! Repository for the `authors` table.

use library_db::DbConn;
use uuid::Uuid;

use super::models::Author;

/// Column list for `authors` queries.
const COLUMNS: &str = "id, name, created_at, updated_at";

pub struct AuthorRepo;

impl AuthorRepo {
    /// Find an author by id.
    pub async fn find_by_id(conn: &mut DbConn, id: Uuid) -> Result<Option<Author>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM authors WHERE id = ?1");
        sqlx::query_as::<_, Author>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// Insert a fully populated author row.
    pub async fn insert(conn: &mut DbConn, author: &Author) -> Result<(), sqlx::Error> {
        let query = format!("INSERT INTO authors ({COLUMNS}) VALUES (?1, ?2, ?3, ?4)");
        sqlx::query(&query)
            .bind(author.id)
            .bind(&author.name)
            .bind(author.created_at)
            .bind(author.updated_at)
            .execute(conn)
            .await?;
        Ok(())
    }

    /// Delete an author; its books go with it through `ON DELETE CASCADE`.
    /// Returns `true` if a row was removed.
    pub async fn delete(conn: &mut DbConn, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM authors WHERE id = ?1")
            .bind(id)
            .execute(conn)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
