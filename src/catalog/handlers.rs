//! REST API handlers for browsing books

use crate::api::{Book, PageMeta};
use crate::checkout::state::SharedState;
use crate::error::AppError;
use crate::filters::{BookFilters, MemoryNavigator, QueryFilterStore};
use axum::{
    extract::{Path, RawQuery, State},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tracing::debug;

/// Creates routes for catalog operations
pub fn routes() -> Router<SharedState> {
    Router::new()
        .route("/books", get(list_books))
        .route("/books/:id", get(get_book))
}

/// Response of `GET /books`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookListResponse {
    pub data: Vec<Book>,
    pub meta: PageMeta,
    /// Every filter, defaults filled in.
    pub filters: BookFilters,
    /// Canonical query string for the current view, for shareable links.
    pub query: String,
}

/// Endpoint: GET /books
/// Unknown or malformed filter values fall back to their defaults.
async fn list_books(
    State(state): State<SharedState>,
    RawQuery(query): RawQuery,
) -> Result<Json<BookListResponse>, AppError> {
    let store = QueryFilterStore::new(MemoryNavigator::with_query(
        "/books",
        query.as_deref().unwrap_or_default(),
    ));
    let filters = store.snapshot();
    let canonical = filters.canonical_query();
    debug!(query = %canonical, "listing books");

    let page = state.api.list_books(&filters).await?;

    Ok(Json(BookListResponse {
        data: page.data,
        meta: page.meta,
        filters,
        query: canonical,
    }))
}

/// Endpoint: GET /books/:id
async fn get_book(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<Book>, AppError> {
    Ok(Json(state.api.get_book(&id).await?))
}
