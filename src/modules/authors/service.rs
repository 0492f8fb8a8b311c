use chrono::Utc;
use library_db::DbConn;
use uuid::Uuid;

use super::models::{Author, CreateAuthor};
use super::repository::AuthorRepo;
use crate::modules::ServiceError;

/// Author operations over one request-scoped connection.
pub struct AuthorService<'c> {
    conn: &'c mut DbConn,
}

impl<'c> AuthorService<'c> {
    pub fn new(conn: &'c mut DbConn) -> Self {
        Self { conn }
    }

    /// Persist a new author. Names are not unique.
    #[tracing::instrument(skip_all)]
    pub async fn create_author(&mut self, input: CreateAuthor) -> Result<Author, ServiceError> {
        let now = Utc::now();
        let author = Author {
            id: Uuid::new_v4(),
            name: input.name,
            created_at: now,
            updated_at: now,
        };

        AuthorRepo::insert(&mut *self.conn, &author).await?;

        tracing::info!(author_id = %author.id, "author created");
        Ok(author)
    }

    /// Remove an author together with every book that references it.
    #[tracing::instrument(skip(self))]
    pub async fn delete_author(&mut self, id: Uuid) -> Result<(), ServiceError> {
        if !AuthorRepo::delete(&mut *self.conn, id).await? {
            return Err(ServiceError::NotFound { entity: "Author" });
        }

        tracing::info!(author_id = %id, "author deleted");
        Ok(())
    }
}
