pub mod catalog;
pub mod models;
pub mod routes;

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use serde_json::json;
use shelf_kernel::{InitCtx, Module};

use catalog::Catalog;

/// Books module: owns the catalog and exposes it over HTTP
pub struct BooksModule {
    catalog: Arc<Catalog>,
}

impl BooksModule {
    /// Module backed by a fresh, empty catalog
    pub fn new() -> Self {
        Self::with_catalog(Arc::new(Catalog::new()))
    }

    /// Module backed by an existing catalog
    pub fn with_catalog(catalog: Arc<Catalog>) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }
}

impl Default for BooksModule {
    fn default() -> Self {
        Self::new()
    }
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
            books = self.catalog.len(),
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::router(self.catalog.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        let error_response = |description: &str| {
            json!({
                "description": description,
                "content": {
                    "application/json": {
                        "schema": { "$ref": "#/components/schemas/ErrorResponse" }
                    }
                }
            })
        };
        let book_response = |description: &str| {
            json!({
                "description": description,
                "content": {
                    "application/json": {
                        "schema": { "$ref": "#/components/schemas/Book" }
                    }
                }
            })
        };
        let id_parameter = json!({
            "name": "id",
            "in": "path",
            "required": true,
            "description": "Book identifier",
            "schema": { "type": "string" }
        });

        Some(json!({
            "paths": {
                "/": {
                    "get": {
                        "summary": "List books",
                        "tags": ["Books"],
                        "responses": {
                            "200": {
                                "description": "All books in creation order",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "type": "array",
                                            "items": { "$ref": "#/components/schemas/Book" }
                                        }
                                    }
                                }
                            }
                        }
                    },
                    "post": {
                        "summary": "Add a book",
                        "tags": ["Books"],
                        "requestBody": {
                            "required": true,
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/CreateBook" }
                                }
                            }
                        },
                        "responses": {
                            "200": book_response("Created book"),
                            "400": error_response("Malformed request body"),
                            "422": error_response("Validation error")
                        }
                    }
                },
                "/{id}": {
                    "get": {
                        "summary": "Get a book by id",
                        "tags": ["Books"],
                        "parameters": [id_parameter.clone()],
                        "responses": {
                            "200": book_response("Book with its reviews"),
                            "404": error_response("Book not found")
                        }
                    }
                },
                "/{id}/reviews": {
                    "post": {
                        "summary": "Add a review to a book",
                        "tags": ["Books"],
                        "parameters": [id_parameter],
                        "requestBody": {
                            "required": true,
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/CreateReview" }
                                }
                            }
                        },
                        "responses": {
                            "200": book_response("Book with the new review appended"),
                            "400": error_response("Malformed request body"),
                            "404": error_response("Book not found"),
                            "422": error_response("Validation error")
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "Book": {
                        "type": "object",
                        "properties": {
                            "id": {
                                "type": "string",
                                "description": "Unique identifier for the book"
                            },
                            "title": { "type": "string", "minLength": 1, "maxLength": 200 },
                            "author": { "type": "string", "minLength": 1, "maxLength": 100 },
                            "genre": { "type": "string", "minLength": 1, "maxLength": 50 },
                            "reviews": {
                                "type": "array",
                                "items": { "$ref": "#/components/schemas/Review" }
                            }
                        },
                        "required": ["id", "title", "author", "genre", "reviews"]
                    },
                    "Review": {
                        "type": "object",
                        "properties": {
                            "rating": { "type": "integer", "minimum": 1, "maximum": 5 },
                            "comment": { "type": "string", "minLength": 1, "maxLength": 1000 }
                        },
                        "required": ["rating", "comment"]
                    },
                    "CreateBook": {
                        "type": "object",
                        "properties": {
                            "title": { "type": "string", "minLength": 1, "maxLength": 200 },
                            "author": { "type": "string", "minLength": 1, "maxLength": 100 },
                            "genre": { "type": "string", "minLength": 1, "maxLength": 50 }
                        },
                        "required": ["title", "author", "genre"]
                    },
                    "CreateReview": {
                        "type": "object",
                        "properties": {
                            "rating": { "type": "integer", "minimum": 1, "maximum": 5 },
                            "comment": { "type": "string", "minLength": 1, "maxLength": 1000 }
                        },
                        "required": ["rating", "comment"]
                    }
                }
            }
        }))
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            books = self.catalog.len(),
            "books module stopped; in-memory catalog discarded"
        );
        Ok(())
    }
}

/// Create a new instance of the books module
pub fn create_module() -> Arc<dyn Module> {
    Arc::new(BooksModule::new())
}
