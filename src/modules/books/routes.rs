use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use library_db::DbPool;
use library_http::{AppResult, ValidatedJson};

use super::models::{BookOut, CreateBook};
use super::service::{parse_book_id, BookService};

/// HTTP routes for the books module
pub fn router(db: DbPool) -> Router {
    Router::new()
        .route("/books", get(list_books).post(create_book))
        .route("/books/{book_id}", get(get_book).delete(delete_book))
        .with_state(db)
}

/// POST /books
async fn create_book(
    State(db): State<DbPool>,
    ValidatedJson(input): ValidatedJson<CreateBook>,
) -> AppResult<(StatusCode, Json<BookOut>)> {
    let mut tx = library_db::begin_write(&db).await?;
    let book = BookService::new(&mut tx).create_book(input).await?;
    tx.commit().await?;

    Ok((StatusCode::CREATED, Json(book)))
}

/// GET /books
async fn list_books(State(db): State<DbPool>) -> AppResult<Json<Vec<BookOut>>> {
    let mut tx = library_db::begin(&db).await?;
    let books = BookService::new(&mut tx).list_books().await?;
    tx.commit().await?;

    Ok(Json(books))
}

/// GET /books/{book_id}
async fn get_book(
    State(db): State<DbPool>,
    Path(book_id): Path<String>,
) -> AppResult<Json<BookOut>> {
    let id = parse_book_id(&book_id)?;

    let mut tx = library_db::begin(&db).await?;
    let book = BookService::new(&mut tx).get_book(id).await?;
    tx.commit().await?;

    Ok(Json(book))
}

/// DELETE /books/{book_id}
async fn delete_book(
    State(db): State<DbPool>,
    Path(book_id): Path<String>,
) -> AppResult<StatusCode> {
    let id = parse_book_id(&book_id)?;

    let mut tx = library_db::begin_write(&db).await?;
    BookService::new(&mut tx).delete_book(id).await?;
    tx.commit().await?;

    Ok(StatusCode::NO_CONTENT)
}
