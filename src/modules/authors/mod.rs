pub mod models;
pub mod repository;
pub mod routes;
pub mod service;

use async_trait::async_trait;
use axum::Router;
use library_db::DbPool;
use library_kernel::{InitCtx, Migration, Module};
use serde_json::json;

pub use models::{Author, CreateAuthor};
pub use repository::AuthorRepo;
pub use service::AuthorService;

/// Authors module: creation of authors and ownership of the `authors` table
pub struct AuthorsModule;

impl AuthorsModule {
    pub const fn new() -> Self {
        Self
    }
}

impl Default for AuthorsModule {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Module for AuthorsModule {
    fn name(&self) -> &'static str {
        "authors"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            "authors module initialized"
        );
        Ok(())
    }

    fn routes(&self, db: DbPool) -> Router {
        routes::router(db)
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(json!({
            "paths": {
                "/authors": {
                    "post": {
                        "summary": "Create an author",
                        "tags": ["Authors"],
                        "requestBody": {
                            "required": true,
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/AuthorCreate" }
                                }
                            }
                        },
                        "responses": {
                            "201": {
                                "description": "Author created",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/AuthorOut" }
                                    }
                                }
                            },
                            "422": {
                                "description": "Validation error",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/ErrorResponse" }
                                    }
                                }
                            }
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "AuthorCreate": {
                        "type": "object",
                        "properties": {
                            "name": {
                                "type": "string",
                                "minLength": 1,
                                "maxLength": models::NAME_MAX_CHARS,
                                "description": "Author name; surrounding whitespace is trimmed"
                            }
                        },
                        "required": ["name"]
                    },
                    "AuthorOut": {
                        "type": "object",
                        "properties": {
                            "id": { "type": "string", "format": "uuid" },
                            "name": { "type": "string" },
                            "created_at": { "type": "string", "format": "date-time" },
                            "updated_at": { "type": "string", "format": "date-time" }
                        },
                        "required": ["id", "name", "created_at", "updated_at"]
                    }
                }
            }
        }))
    }

    fn migrations(&self) -> Vec<Migration> {
        vec![Migration {
            id: "001_init",
            up: r#"
                CREATE TABLE authors (
                    id         BLOB PRIMARY KEY NOT NULL,
                    name       TEXT NOT NULL CHECK (length(name) BETWEEN 1 AND 50),
                    created_at TEXT NOT NULL,
                    updated_at TEXT NOT NULL
                );
                CREATE INDEX idx_authors_name ON authors (name);
                CREATE TRIGGER trg_authors_updated_at
                    AFTER UPDATE ON authors
                    FOR EACH ROW WHEN NEW.updated_at = OLD.updated_at
                BEGIN
                    UPDATE authors
                       SET updated_at = strftime('%Y-%m-%dT%H:%M:%f+00:00', 'now')
                     WHERE id = NEW.id;
                END;
                "#,
        }]
    }
}

/// Create a new instance of the authors module
pub fn create_module() -> std::sync::Arc<dyn Module> {
    std::sync::Arc::new(AuthorsModule::new())
}
