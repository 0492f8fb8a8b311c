pub mod models;
pub mod repository;
pub mod routes;
pub mod service;

use async_trait::async_trait;
use axum::Router;
use library_db::DbPool;
use library_kernel::{InitCtx, Migration, Module};
use serde_json::{json, Value};

pub use models::{Book, BookOut, CreateBook};
pub use repository::BookRepo;
pub use service::BookService;

/// Books module: book CRUD joined with author names, owner of the `books` table
pub struct BooksModule;

impl BooksModule {
    pub const fn new() -> Self {
        Self
    }
}

impl Default for BooksModule {
    fn default() -> Self {
        Self::new()
    }
}

fn error_response(description: &str) -> Value {
    json!({
        "description": description,
        "content": {
            "application/json": {
                "schema": { "$ref": "#/components/schemas/ErrorResponse" }
            }
        }
    })
}

fn book_id_parameter() -> Value {
    json!({
        "name": "book_id",
        "in": "path",
        "required": true,
        "schema": { "type": "string", "format": "uuid" }
    })
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "books"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self, db: DbPool) -> Router {
        routes::router(db)
    }

    fn openapi(&self) -> Option<Value> {
        Some(json!({
            "paths": {
                "/books": {
                    "post": {
                        "summary": "Create a book",
                        "tags": ["Books"],
                        "requestBody": {
                            "required": true,
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/BookCreate" }
                                }
                            }
                        },
                        "responses": {
                            "201": {
                                "description": "Book created",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/BookOut" }
                                    }
                                }
                            },
                            "400": error_response("Referenced author does not exist"),
                            "409": error_response("Author already has a book with that title"),
                            "422": error_response("Validation error")
                        }
                    },
                    "get": {
                        "summary": "List books",
                        "tags": ["Books"],
                        "responses": {
                            "200": {
                                "description": "All books with their author names",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "type": "array",
                                            "items": { "$ref": "#/components/schemas/BookOut" }
                                        }
                                    }
                                }
                            }
                        }
                    }
                },
                "/books/{book_id}": {
                    "get": {
                        "summary": "Get a book",
                        "tags": ["Books"],
                        "parameters": [book_id_parameter()],
                        "responses": {
                            "200": {
                                "description": "The book",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/BookOut" }
                                    }
                                }
                            },
                            "404": error_response("Book not found")
                        }
                    },
                    "delete": {
                        "summary": "Delete a book",
                        "tags": ["Books"],
                        "parameters": [book_id_parameter()],
                        "responses": {
                            "204": { "description": "Book deleted" },
                            "404": error_response("Book not found")
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "BookCreate": {
                        "type": "object",
                        "properties": {
                            "title": {
                                "type": "string",
                                "minLength": 1,
                                "maxLength": models::TITLE_MAX_CHARS,
                                "description": "Book title; surrounding whitespace is trimmed"
                            },
                            "author_id": { "type": "string", "format": "uuid" }
                        },
                        "required": ["title", "author_id"]
                    },
                    "BookOut": {
                        "type": "object",
                        "properties": {
                            "id": { "type": "string", "format": "uuid" },
                            "title": { "type": "string" },
                            "author_id": { "type": "string", "format": "uuid" },
                            "author_name": { "type": "string" },
                            "created_at": { "type": "string", "format": "date-time" },
                            "updated_at": { "type": "string", "format": "date-time" }
                        },
                        "required": ["id", "title", "author_id", "author_name", "created_at", "updated_at"]
                    }
                }
            }
        }))
    }

    fn migrations(&self) -> Vec<Migration> {
        vec![Migration {
            id: "001_init",
            up: r#"
                CREATE TABLE books (
                    id         BLOB PRIMARY KEY NOT NULL,
                    title      TEXT NOT NULL CHECK (length(title) BETWEEN 1 AND 100),
                    author_id  BLOB NOT NULL REFERENCES authors (id) ON DELETE CASCADE,
                    created_at TEXT NOT NULL,
                    updated_at TEXT NOT NULL,
                    CONSTRAINT uq_books_author_title UNIQUE (author_id, title)
                );
                CREATE INDEX idx_books_title ON books (title);
                CREATE INDEX idx_books_author_id ON books (author_id);
                CREATE TRIGGER trg_books_updated_at
                    AFTER UPDATE ON books
                    FOR EACH ROW WHEN NEW.updated_at = OLD.updated_at
                BEGIN
                    UPDATE books
                       SET updated_at = strftime('%Y-%m-%dT%H:%M:%f+00:00', 'now')
                     WHERE id = NEW.id;
                END;
                "#,
        }]
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module stopped");
        Ok(())
    }
}

/// Create a new instance of the books module
pub fn create_module() -> std::sync::Arc<dyn Module> {
    std::sync::Arc::new(BooksModule::new())
}
