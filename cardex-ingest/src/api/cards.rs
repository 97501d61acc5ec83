//! Catalog review handlers
//!
//! GET /cards, focus and version selection, manual resolution.

use axum::{
    extract::State,
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::{
    error::{ApiError, ApiResult},
    models::{CardVersion, ResolvedCard},
    services::ManualOutcome,
    AppState,
};

/// GET /cards response
#[derive(Debug, Serialize)]
pub struct CatalogResponse {
    pub resolved_cards: Vec<ResolvedCard>,
    pub unresolved_names: Vec<String>,
    pub focused_index: Option<usize>,
    pub preferred_set: Option<String>,
    /// Per-image errors of the most recent batch
    pub errors: Vec<String>,
}

/// PUT /cards/focus request
#[derive(Debug, Deserialize)]
pub struct FocusRequest {
    pub index: usize,
}

/// PUT /cards/focused/version request
#[derive(Debug, Deserialize)]
pub struct SelectVersionRequest {
    pub catalog_id: String,
}

/// POST /cards/manual request
#[derive(Debug, Deserialize)]
pub struct ManualRequest {
    pub name: String,
    /// Unresolved entry to replace; defaults to `name`
    #[serde(default)]
    pub entry: Option<String>,
}

/// GET /cards
pub async fn get_catalog(State(state): State<AppState>) -> Json<CatalogResponse> {
    let snapshot = state.session.snapshot().await;
    let errors = state.session.last_errors().await;

    Json(CatalogResponse {
        resolved_cards: snapshot.resolved_cards().to_vec(),
        unresolved_names: snapshot.unresolved_names().to_vec(),
        focused_index: snapshot.focused_index(),
        preferred_set: snapshot.preferred_set().map(str::to_string),
        errors,
    })
}

/// PUT /cards/focus
pub async fn set_focus(
    State(state): State<AppState>,
    Json(request): Json<FocusRequest>,
) -> ApiResult<Json<ResolvedCard>> {
    Ok(Json(state.session.select_card(request.index).await?))
}

/// GET /cards/focused
pub async fn get_focused(State(state): State<AppState>) -> ApiResult<Json<ResolvedCard>> {
    state
        .session
        .snapshot()
        .await
        .focused_card()
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("No resolved cards in the catalog".to_string()))
}

/// GET /cards/focused/versions
///
/// Sorted for a picker: preferred set first, newest release first.
pub async fn get_focused_versions(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<CardVersion>>> {
    Ok(Json(state.session.focused_versions().await?))
}

/// PUT /cards/focused/version
pub async fn select_version(
    State(state): State<AppState>,
    Json(request): Json<SelectVersionRequest>,
) -> ApiResult<Json<ResolvedCard>> {
    let card = state.session.select_version(&request.catalog_id).await?;
    tracing::info!(catalog_id = %card.catalog_id, set = %card.set_code, "Version selected");
    Ok(Json(card))
}

/// POST /cards/manual
pub async fn resolve_manually(
    State(state): State<AppState>,
    Json(request): Json<ManualRequest>,
) -> ApiResult<Json<ResolvedCard>> {
    let name = request.name.trim();
    if name.is_empty() {
        return Err(ApiError::BadRequest("Card name is empty".to_string()));
    }

    match state
        .session
        .resolve_manually(request.entry.as_deref(), name)
        .await?
    {
        ManualOutcome::Resolved(card) => Ok(Json(card)),
        ManualOutcome::StillUnresolved => Err(ApiError::StillUnresolved(name.to_string())),
    }
}

pub fn card_routes() -> Router<AppState> {
    Router::new()
        .route("/cards", get(get_catalog))
        .route("/cards/focus", put(set_focus))
        .route("/cards/focused", get(get_focused))
        .route("/cards/focused/versions", get(get_focused_versions))
        .route("/cards/focused/version", put(select_version))
        .route("/cards/manual", post(resolve_manually))
}
