use axum::{
    routing::{get, post},
    Router,
};
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod config;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

use models::catalog::Catalog;
use routes::{
    catalog::{get_book, list_authors, list_genres},
    health::health_check,
    sessions::{close_session, create_session, get_session, search_session, show_more},
};
use services::session::SessionStore;

/// Shared handler state. The catalog is read-only; sessions are isolated per id.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub sessions: SessionStore,
    pub page_size: NonZeroUsize,
}

impl AppState {
    pub fn new(catalog: Catalog, page_size: NonZeroUsize, session_ttl: Duration) -> Self {
        Self {
            catalog: Arc::new(catalog),
            sessions: SessionStore::new(session_ttl),
            page_size,
        }
    }
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/status", get(health_check))
        .route("/authors", get(list_authors))
        .route("/genres", get(list_genres))
        .route("/books/:book_id", get(get_book))
        .route("/sessions", post(create_session))
        .route("/sessions/:session_id", get(get_session).delete(close_session))
        .route("/sessions/:session_id/search", post(search_session))
        .route("/sessions/:session_id/more", post(show_more))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
