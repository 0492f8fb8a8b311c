use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use library_db::DbPool;
use library_http::{AppResult, ValidatedJson};

use super::models::{Author, CreateAuthor};
use super::service::AuthorService;

/// HTTP routes for the authors module
pub fn router(db: DbPool) -> Router {
    Router::new()
        .route("/authors", post(create_author))
        .with_state(db)
}

/// POST /authors
async fn create_author(
    State(db): State<DbPool>,
    ValidatedJson(input): ValidatedJson<CreateAuthor>,
) -> AppResult<(StatusCode, Json<Author>)> {
    let mut tx = library_db::begin_write(&db).await?;
    let author = AuthorService::new(&mut tx).create_author(input).await?;
    tx.commit().await?;

    Ok((StatusCode::CREATED, Json(author)))
}
