use chrono::{DateTime, Utc};
use library_http::validation::{trimmed_string, uuid_v4, FieldError, Validate};
use serde::Serialize;
use serde_json::{Map, Value};
use sqlx::FromRow;
use uuid::Uuid;

/// Maximum book title length, in characters, after trimming.
pub const TITLE_MAX_CHARS: usize = 100;

/// A book row from the `books` table.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Book {
    pub id: Uuid,
    pub title: String,
    pub author_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Response shape: a book joined with its author's current name.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct BookOut {
    pub id: Uuid,
    pub title: String,
    pub author_id: Uuid,
    pub author_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BookOut {
    pub fn from_parts(book: Book, author_name: String) -> Self {
        Self {
            id: book.id,
            title: book.title,
            author_id: book.author_id,
            author_name,
            created_at: book.created_at,
            updated_at: book.updated_at,
        }
    }
}

/// Validated payload for `POST /books`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateBook {
    /// Trimmed, 1 to 100 characters
    pub title: String,
    pub author_id: Uuid,
}

impl Validate for CreateBook {
    fn validate(body: &Map<String, Value>) -> Result<Self, Vec<FieldError>> {
        let title = trimmed_string(body, "title", TITLE_MAX_CHARS);
        let author_id = uuid_v4(body, "author_id");

        match (title, author_id) {
            (Ok(title), Ok(author_id)) => Ok(Self { title, author_id }),
            (title, author_id) => Err([title.err(), author_id.err()]
                .into_iter()
                .flatten()
                .collect()),
        }
    }
}
