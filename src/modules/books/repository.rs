//! Repository for the `books` table and its author join.

use library_db::DbConn;
use uuid::Uuid;

use super::models::{Book, BookOut};

/// Column list for plain `books` queries.
const COLUMNS: &str = "id, title, author_id, created_at, updated_at";

/// Projection shared by the joined read paths.
const JOINED_SELECT: &str = "SELECT b.id, b.title, b.author_id, a.name AS author_name, \
                                    b.created_at, b.updated_at \
                             FROM books b \
                             INNER JOIN authors a ON a.id = b.author_id";

pub struct BookRepo;

impl BookRepo {
    /// Find a book row by id.
    #[cfg(test)]
    pub async fn find_by_id(conn: &mut DbConn, id: Uuid) -> Result<Option<Book>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM books WHERE id = ?1");
        sqlx::query_as::<_, Book>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// Find the book an author already has under this exact title.
    pub async fn find_by_author_and_title(
        conn: &mut DbConn,
        author_id: Uuid,
        title: &str,
    ) -> Result<Option<Book>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM books WHERE author_id = ?1 AND title = ?2");
        sqlx::query_as::<_, Book>(&query)
            .bind(author_id)
            .bind(title)
            .fetch_optional(conn)
            .await
    }

    /// Insert a fully populated book row. Fails with a unique violation on
    /// `uq_books_author_title` and a foreign-key violation on an unknown author.
    pub async fn insert(conn: &mut DbConn, book: &Book) -> Result<(), sqlx::Error> {
        let query = format!("INSERT INTO books ({COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5)");
        sqlx::query(&query)
            .bind(book.id)
            .bind(&book.title)
            .bind(book.author_id)
            .bind(book.created_at)
            .bind(book.updated_at)
            .execute(conn)
            .await?;
        Ok(())
    }

    /// Delete a book. Returns `true` if a row was removed.
    pub async fn delete(conn: &mut DbConn, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM books WHERE id = ?1")
            .bind(id)
            .execute(conn)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// All books with their author's name, ordered by id.
    pub async fn list_with_author(conn: &mut DbConn) -> Result<Vec<BookOut>, sqlx::Error> {
        let query = format!("{JOINED_SELECT} ORDER BY b.id");
        sqlx::query_as::<_, BookOut>(&query).fetch_all(conn).await
    }

    /// One book with its author's name.
    pub async fn find_with_author(
        conn: &mut DbConn,
        id: Uuid,
    ) -> Result<Option<BookOut>, sqlx::Error> {
        let query = format!("{JOINED_SELECT} WHERE b.id = ?1");
        sqlx::query_as::<_, BookOut>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// Number of books referencing an author.
    #[cfg(test)]
    pub async fn count_by_author(conn: &mut DbConn, author_id: Uuid) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM books WHERE author_id = ?1")
            .bind(author_id)
            .fetch_one(conn)
            .await?;
        Ok(count)
    }
}
