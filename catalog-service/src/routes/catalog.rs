use crate::models::responses::{BookDetail, NamedEntry};
use crate::services::selection::resolve_detail;
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use std::collections::BTreeMap;
use tracing::{info, warn};

fn named_entries(table: &BTreeMap<String, String>) -> Vec<NamedEntry> {
    table
        .iter()
        .map(|(id, name)| NamedEntry {
            id: id.clone(),
            name: name.clone(),
        })
        .collect()
}

pub async fn list_authors(State(state): State<AppState>) -> Json<Vec<NamedEntry>> {
    Json(named_entries(&state.catalog.references().authors))
}

pub async fn list_genres(State(state): State<AppState>) -> Json<Vec<NamedEntry>> {
    Json(named_entries(&state.catalog.references().genres))
}

pub async fn get_book(
    Path(book_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<BookDetail>, StatusCode> {
    match resolve_detail(&state.catalog, &book_id) {
        Some(detail) => {
            info!("Showing details for book {}", book_id);
            Ok(Json(detail))
        }
        None => {
            warn!("Book {} not found", book_id);
            Err(StatusCode::NOT_FOUND)
        }
    }
}
