//! Book operations.
//!
//! `create_book` checks in a fixed order: the author must exist, then the
//! `(author_id, title)` pair must be free, then the row is inserted. The
//! `uq_books_author_title` constraint backs the duplicate check when two
//! requests race between check and insert.

use chrono::Utc;
use library_db::DbConn;
use uuid::Uuid;

use super::models::{Book, BookOut, CreateBook};
use super::repository::BookRepo;
use crate::modules::authors::AuthorRepo;
use crate::modules::ServiceError;

pub const DUPLICATE_TITLE: &str = "This author already has a book with that title";

const AUTHOR_REFERENCE: ServiceError = ServiceError::ReferenceNotFound { field: "author_id" };
const BOOK_NOT_FOUND: ServiceError = ServiceError::NotFound { entity: "Book" };

/// Book operations over one request-scoped connection.
pub struct BookService<'c> {
    conn: &'c mut DbConn,
}

impl<'c> BookService<'c> {
    pub fn new(conn: &'c mut DbConn) -> Self {
        Self { conn }
    }

    #[tracing::instrument(skip_all, fields(author_id = %input.author_id))]
    pub async fn create_book(&mut self, input: CreateBook) -> Result<BookOut, ServiceError> {
        let author = AuthorRepo::find_by_id(&mut *self.conn, input.author_id)
            .await?
            .ok_or(AUTHOR_REFERENCE)?;

        let existing =
            BookRepo::find_by_author_and_title(&mut *self.conn, author.id, &input.title).await?;
        if existing.is_some() {
            tracing::debug!("duplicate title rejected before insert");
            return Err(ServiceError::Conflict(DUPLICATE_TITLE));
        }

        let now = Utc::now();
        let book = Book {
            id: Uuid::new_v4(),
            title: input.title,
            author_id: author.id,
            created_at: now,
            updated_at: now,
        };

        BookRepo::insert(&mut *self.conn, &book)
            .await
            .map_err(classify_insert_error)?;

        tracing::info!(book_id = %book.id, "book created");
        Ok(BookOut::from_parts(book, author.name))
    }

    pub async fn list_books(&mut self) -> Result<Vec<BookOut>, ServiceError> {
        Ok(BookRepo::list_with_author(&mut *self.conn).await?)
    }

    #[tracing::instrument(skip(self))]
    pub async fn get_book(&mut self, id: Uuid) -> Result<BookOut, ServiceError> {
        BookRepo::find_with_author(&mut *self.conn, id)
            .await?
            .ok_or(BOOK_NOT_FOUND)
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete_book(&mut self, id: Uuid) -> Result<(), ServiceError> {
        if !BookRepo::delete(&mut *self.conn, id).await? {
            return Err(BOOK_NOT_FOUND);
        }

        tracing::info!(book_id = %id, "book deleted");
        Ok(())
    }
}

/// Parse a path id. Anything that is not a UUID cannot name a stored book.
pub fn parse_book_id(raw: &str) -> Result<Uuid, ServiceError> {
    Uuid::parse_str(raw).map_err(|_| BOOK_NOT_FOUND)
}

/// Map constraint failures raised by the insert itself onto domain errors.
fn classify_insert_error(err: sqlx::Error) -> ServiceError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            tracing::warn!(error = %db_err, "duplicate title caught by storage constraint");
            ServiceError::Conflict(DUPLICATE_TITLE)
        }
        sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => AUTHOR_REFERENCE,
        _ => ServiceError::Store(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::authors::{AuthorService, CreateAuthor};
    use crate::test_support::migrated_pool;
    use library_db::DbPool;
    use sqlx::pool::PoolConnection;
    use sqlx::Sqlite;

    async fn conn_with_author(name: &str) -> (DbPool, PoolConnection<Sqlite>, Uuid) {
        let db = migrated_pool().await;
        let mut conn = db.acquire().await.unwrap();
        let author = AuthorService::new(&mut conn)
            .create_author(CreateAuthor {
                name: name.to_string(),
            })
            .await
            .unwrap();
        (db, conn, author.id)
    }

    fn create(title: &str, author_id: Uuid) -> CreateBook {
        CreateBook {
            title: title.to_string(),
            author_id,
        }
    }

    #[tokio::test]
    async fn create_book_attaches_author_name() {
        let (_db, mut conn, author_id) = conn_with_author("Jane Austen").await;

        let book = BookService::new(&mut conn)
            .create_book(create("Emma", author_id))
            .await
            .unwrap();

        assert_eq!(book.title, "Emma");
        assert_eq!(book.author_id, author_id);
        assert_eq!(book.author_name, "Jane Austen");
        assert_eq!(book.id.get_version_num(), 4);
    }

    #[tokio::test]
    async fn unknown_author_is_rejected_before_any_write() {
        let (_db, mut conn, _) = conn_with_author("Jane Austen").await;
        let ghost = Uuid::new_v4();

        let err = BookService::new(&mut conn)
            .create_book(create("Emma", ghost))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ServiceError::ReferenceNotFound { field: "author_id" }
        ));
        assert_eq!(BookRepo::count_by_author(&mut conn, ghost).await.unwrap(), 0);
        assert!(BookService::new(&mut conn).list_books().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn duplicate_title_conflicts_and_is_idempotent() {
        let (_db, mut conn, author_id) = conn_with_author("Jane Austen").await;
        let mut service = BookService::new(&mut conn);

        service.create_book(create("Emma", author_id)).await.unwrap();
        for _ in 0..2 {
            let err = service
                .create_book(create("Emma", author_id))
                .await
                .unwrap_err();
            assert!(matches!(err, ServiceError::Conflict(DUPLICATE_TITLE)));
        }

        assert_eq!(BookRepo::count_by_author(&mut conn, author_id).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn title_comparison_is_case_sensitive() {
        let (_db, mut conn, author_id) = conn_with_author("Jane Austen").await;
        let mut service = BookService::new(&mut conn);

        service.create_book(create("Emma", author_id)).await.unwrap();
        service.create_book(create("EMMA", author_id)).await.unwrap();

        assert_eq!(BookRepo::count_by_author(&mut conn, author_id).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn same_title_is_allowed_for_different_authors() {
        let (_db, mut conn, austen) = conn_with_author("Jane Austen").await;
        let other = AuthorService::new(&mut conn)
            .create_author(CreateAuthor {
                name: "Someone Else".to_string(),
            })
            .await
            .unwrap();

        let mut service = BookService::new(&mut conn);
        service.create_book(create("Emma", austen)).await.unwrap();
        service.create_book(create("Emma", other.id)).await.unwrap();

        assert_eq!(service.list_books().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn storage_constraint_is_translated_to_conflict() {
        let (_db, mut conn, author_id) = conn_with_author("Jane Austen").await;
        let now = Utc::now();
        let row = |id| Book {
            id,
            title: "Emma".to_string(),
            author_id,
            created_at: now,
            updated_at: now,
        };

        BookRepo::insert(&mut conn, &row(Uuid::new_v4())).await.unwrap();
        let err = BookRepo::insert(&mut conn, &row(Uuid::new_v4()))
            .await
            .unwrap_err();

        assert!(matches!(
            classify_insert_error(err),
            ServiceError::Conflict(DUPLICATE_TITLE)
        ));
    }

    #[tokio::test]
    async fn missing_author_at_insert_is_a_reference_error() {
        let (_db, mut conn, _) = conn_with_author("Jane Austen").await;
        let now = Utc::now();
        let orphan = Book {
            id: Uuid::new_v4(),
            title: "Emma".to_string(),
            author_id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
        };

        let err = BookRepo::insert(&mut conn, &orphan).await.unwrap_err();
        assert!(matches!(
            classify_insert_error(err),
            ServiceError::ReferenceNotFound { .. }
        ));
    }

    #[tokio::test]
    async fn list_books_is_sorted_by_id() {
        let (_db, mut conn, author_id) = conn_with_author("Jane Austen").await;
        let mut service = BookService::new(&mut conn);
        for title in ["Emma", "Persuasion", "Sanditon", "Lady Susan"] {
            service.create_book(create(title, author_id)).await.unwrap();
        }

        let ids: Vec<Uuid> = service
            .list_books()
            .await
            .unwrap()
            .into_iter()
            .map(|book| book.id)
            .collect();
        let mut sorted = ids.clone();
        sorted.sort_by_key(|id| *id.as_bytes());

        assert_eq!(ids.len(), 4);
        assert_eq!(ids, sorted);
    }

    #[tokio::test]
    async fn get_and_delete_unknown_book_are_not_found() {
        let (_db, mut conn, author_id) = conn_with_author("Jane Austen").await;
        let mut service = BookService::new(&mut conn);
        service.create_book(create("Emma", author_id)).await.unwrap();

        let missing = Uuid::new_v4();
        assert!(matches!(
            service.get_book(missing).await.unwrap_err(),
            ServiceError::NotFound { entity: "Book" }
        ));
        assert!(matches!(
            service.delete_book(missing).await.unwrap_err(),
            ServiceError::NotFound { entity: "Book" }
        ));

        assert_eq!(service.list_books().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn delete_book_removes_only_that_row() {
        let (_db, mut conn, author_id) = conn_with_author("Jane Austen").await;
        let mut service = BookService::new(&mut conn);
        let emma = service.create_book(create("Emma", author_id)).await.unwrap();
        let persuasion = service
            .create_book(create("Persuasion", author_id))
            .await
            .unwrap();

        service.delete_book(emma.id).await.unwrap();

        let remaining = service.list_books().await.unwrap();
        assert_eq!(remaining, vec![persuasion]);
        assert!(BookRepo::find_by_id(&mut conn, emma.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn deleting_author_cascades_to_exactly_its_books() {
        let (_db, mut conn, austen) = conn_with_author("Jane Austen").await;
        let bronte = AuthorService::new(&mut conn)
            .create_author(CreateAuthor {
                name: "Charlotte Brontë".to_string(),
            })
            .await
            .unwrap();

        let mut books = BookService::new(&mut conn);
        books.create_book(create("Emma", austen)).await.unwrap();
        books.create_book(create("Persuasion", austen)).await.unwrap();
        let jane_eyre = books.create_book(create("Jane Eyre", bronte.id)).await.unwrap();

        AuthorService::new(&mut conn).delete_author(austen).await.unwrap();

        assert!(AuthorRepo::find_by_id(&mut conn, austen).await.unwrap().is_none());
        assert_eq!(BookRepo::count_by_author(&mut conn, austen).await.unwrap(), 0);
        let remaining = BookService::new(&mut conn).list_books().await.unwrap();
        assert_eq!(remaining, vec![jane_eyre]);
    }

    #[tokio::test]
    async fn author_name_is_read_at_request_time() {
        let (_db, mut conn, author_id) = conn_with_author("Jane Austen").await;
        let emma = BookService::new(&mut conn)
            .create_book(create("Emma", author_id))
            .await
            .unwrap();

        sqlx::query("UPDATE authors SET name = ?1 WHERE id = ?2")
            .bind("J. Austen")
            .bind(author_id)
            .execute(&mut *conn)
            .await
            .unwrap();

        let fetched = BookService::new(&mut conn).get_book(emma.id).await.unwrap();
        assert_eq!(fetched.author_name, "J. Austen");

        let author = AuthorRepo::find_by_id(&mut conn, author_id)
            .await
            .unwrap()
            .unwrap();
        assert_ne!(author.updated_at, author.created_at);
    }

    #[test]
    fn non_uuid_path_ids_are_not_found() {
        assert!(matches!(
            parse_book_id("not-a-uuid"),
            Err(ServiceError::NotFound { entity: "Book" })
        ));
        let id = Uuid::new_v4();
        assert_eq!(parse_book_id(&id.to_string()).unwrap(), id);
    }
}
