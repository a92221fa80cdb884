use crate::models::book::Book;
use crate::models::catalog::Catalog;
use crate::models::criteria::FilterCriteria;
use crate::models::responses::{BookPreview, PageResponse};
use crate::services::pagination::PaginationError;
use crate::services::session::BrowseSession;
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub title: Option<String>,
    pub author: Option<String>,
    pub genre: Option<String>,
}

impl SearchParams {
    fn criteria(&self) -> FilterCriteria {
        FilterCriteria::from_params(
            self.title.as_deref(),
            self.author.as_deref(),
            self.genre.as_deref(),
        )
    }
}

fn build_page(
    session_id: Uuid,
    session: &BrowseSession,
    books: &[Arc<Book>],
    catalog: &Catalog,
) -> PageResponse {
    let pagination = session.pagination();

    PageResponse {
        session_id,
        criteria: session.criteria().clone(),
        results: books
            .iter()
            .map(|book| BookPreview::new(book, catalog.references()))
            .collect(),
        count: pagination.visible_count(),
        total: pagination.total(),
        page: pagination.current_page(),
        remaining: session.remaining(),
        has_more: session.has_more(),
        no_results: session.matches().is_empty(),
    }
}

pub async fn create_session(
    Query(params): Query<SearchParams>,
    State(state): State<AppState>,
) -> (StatusCode, Json<PageResponse>) {
    let criteria = params.criteria();
    info!("New browse session: {:?}", criteria);

    let session = BrowseSession::new(&state.catalog, criteria, state.page_size);
    let session_id = Uuid::new_v4();
    let page = build_page(session_id, &session, session.visible(), &state.catalog);
    state.sessions.insert(session_id, session);

    info!(
        "Session {} opened with {} matches",
        page.session_id, page.total
    );
    (StatusCode::CREATED, Json(page))
}

pub async fn get_session(
    Path(session_id): Path<Uuid>,
    State(state): State<AppState>,
) -> Result<Json<PageResponse>, StatusCode> {
    state
        .sessions
        .with_session(&session_id, |session| {
            build_page(session_id, session, session.visible(), &state.catalog)
        })
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

pub async fn search_session(
    Path(session_id): Path<Uuid>,
    Query(params): Query<SearchParams>,
    State(state): State<AppState>,
) -> Result<Json<PageResponse>, StatusCode> {
    let criteria = params.criteria();
    info!("Search in session {}: {:?}", session_id, criteria);

    state
        .sessions
        .with_session(&session_id, |session| {
            session.search(&state.catalog, criteria);
            build_page(session_id, session, session.visible(), &state.catalog)
        })
        .map(Json)
        .ok_or_else(|| {
            warn!("Unknown session {}", session_id);
            StatusCode::NOT_FOUND
        })
}

pub async fn show_more(
    Path(session_id): Path<Uuid>,
    State(state): State<AppState>,
) -> Result<Json<PageResponse>, StatusCode> {
    let outcome = state
        .sessions
        .with_session(
            &session_id,
            |session| -> Result<PageResponse, PaginationError> {
                session.show_more()?;
                Ok(build_page(
                    session_id,
                    session,
                    session.latest(),
                    &state.catalog,
                ))
            },
        );

    match outcome {
        Some(Ok(page)) => Ok(Json(page)),
        Some(Err(PaginationError::NoMoreItems)) => {
            warn!("Session {} has no more items", session_id);
            Err(StatusCode::CONFLICT)
        }
        None => {
            warn!("Unknown session {}", session_id);
            Err(StatusCode::NOT_FOUND)
        }
    }
}

pub async fn close_session(
    Path(session_id): Path<Uuid>,
    State(state): State<AppState>,
) -> StatusCode {
    if state.sessions.remove(&session_id) {
        info!("Session {} closed", session_id);
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    }
}
