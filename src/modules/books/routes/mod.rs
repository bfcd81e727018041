//! HTTP handlers for the books module.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use shelf_http::{error::AppError, extract::Payload};

use super::catalog::{Catalog, CatalogError};
use super::models::{Book, CreateBook, CreateReview};

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::NotFound { .. } => AppError::not_found("Book not found"),
            CatalogError::Validation(violations) => AppError::from_violations(&violations),
        }
    }
}

/// Routes relative to the module mount point
pub fn router(catalog: Arc<Catalog>) -> Router {
    Router::new()
        .route("/", get(list_books).post(create_book))
        .route("/{id}", get(get_book))
        .route("/{id}/reviews", post(add_review))
        .with_state(catalog)
}

async fn list_books(State(catalog): State<Arc<Catalog>>) -> Json<Vec<Book>> {
    Json(catalog.list())
}

async fn create_book(
    State(catalog): State<Arc<Catalog>>,
    Payload(request): Payload<CreateBook>,
) -> Result<Json<Book>, AppError> {
    Ok(Json(catalog.create(request)?))
}

async fn get_book(
    State(catalog): State<Arc<Catalog>>,
    Path(id): Path<String>,
) -> Result<Json<Book>, AppError> {
    Ok(Json(catalog.get(&id)?))
}

/// The body is decoded leniently so an unknown book reports 404 even when
/// the review itself would not decode.
async fn add_review(
    State(catalog): State<Arc<Catalog>>,
    Path(id): Path<String>,
    payload: Result<Payload<CreateReview>, AppError>,
) -> Result<Json<Book>, AppError> {
    if !catalog.contains(&id) {
        return Err(CatalogError::NotFound { id }.into());
    }
    let Payload(request) = payload?;
    Ok(Json(catalog.add_review(&id, request)?))
}
