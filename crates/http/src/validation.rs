//! Request body validation.
//!
//! Input shapes implement [`Validate`], an explicit function from the raw JSON
//! object to the typed payload. [`ValidatedJson`] runs it before the handler,
//! so a rejected body never reaches a service or the store.

use axum::extract::{FromRequest, Request};
use axum::Json;
use serde::Serialize;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::error::AppError;

/// One rejected input field. `field` is the dotted path into the request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    fn body(key: &str, message: impl Into<String>) -> Self {
        Self::new(format!("body.{key}"), message)
    }
}

/// Explicit validation of an input shape from its JSON object.
pub trait Validate: Sized {
    /// Return the normalized payload, or every failing field at once.
    fn validate(body: &Map<String, Value>) -> Result<Self, Vec<FieldError>>;
}

/// Extractor that parses a JSON object body and validates it as `T`.
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: Validate,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<Value>::from_request(req, state)
            .await
            .map_err(|rejection| {
                AppError::validation(vec![FieldError::new("body", rejection.body_text())])
            })?;

        let Value::Object(body) = value else {
            return Err(AppError::validation(vec![FieldError::new(
                "body",
                "Input should be a valid dictionary",
            )]));
        };

        T::validate(&body).map(ValidatedJson).map_err(AppError::validation)
    }
}

/// Required string field, trimmed, non-empty, at most `max_chars` characters.
pub fn trimmed_string(
    body: &Map<String, Value>,
    key: &str,
    max_chars: usize,
) -> Result<String, FieldError> {
    let raw = match body.get(key) {
        None | Some(Value::Null) => return Err(FieldError::body(key, "Field required")),
        Some(Value::String(raw)) => raw,
        Some(_) => return Err(FieldError::body(key, "Input should be a valid string")),
    };

    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(FieldError::body(key, format!("{key} must not be empty")));
    }
    if trimmed.chars().count() > max_chars {
        return Err(FieldError::body(
            key,
            format!("String should have at most {max_chars} characters"),
        ));
    }

    Ok(trimmed.to_string())
}

/// Required string field holding a version-4 UUID.
pub fn uuid_v4(body: &Map<String, Value>, key: &str) -> Result<Uuid, FieldError> {
    let raw = match body.get(key) {
        None | Some(Value::Null) => return Err(FieldError::body(key, "Field required")),
        Some(Value::String(raw)) => raw,
        Some(_) => return Err(FieldError::body(key, "UUID input should be a string")),
    };

    let id = Uuid::parse_str(raw.trim())
        .map_err(|_| FieldError::body(key, "Input should be a valid UUID"))?;

    if id.get_version_num() != 4 {
        return Err(FieldError::body(key, "UUID version 4 expected"));
    }

    Ok(id)
}
