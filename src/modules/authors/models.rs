use chrono::{DateTime, Utc};
use library_http::validation::{trimmed_string, FieldError, Validate};
use serde::Serialize;
use serde_json::{Map, Value};
use sqlx::FromRow;
use uuid::Uuid;

/// Maximum author name length, in characters, after trimming.
pub const NAME_MAX_CHARS: usize = 50;

/// An author row from the `authors` table; also the response shape.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Author {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated payload for `POST /authors`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateAuthor {
    /// Trimmed, 1 to 50 characters
    pub name: String,
}

impl Validate for CreateAuthor {
    fn validate(body: &Map<String, Value>) -> Result<Self, Vec<FieldError>> {
        let name = trimmed_string(body, "name", NAME_MAX_CHARS).map_err(|err| vec![err])?;
        Ok(Self { name })
    }
}
