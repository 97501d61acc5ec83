//! Session settings

use axum::{extract::State, routing::put, Json, Router};
use serde::{Deserialize, Serialize};

use crate::AppState;

/// PUT /settings/preferred-set request
#[derive(Debug, Deserialize)]
pub struct PreferredSetRequest {
    pub set_code: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PreferredSetResponse {
    pub set_code: Option<String>,
}

/// PUT /settings/preferred-set
///
/// `null` or a blank string clears the preference.
pub async fn set_preferred_set(
    State(state): State<AppState>,
    Json(request): Json<PreferredSetRequest>,
) -> Json<PreferredSetResponse> {
    state.session.set_preferred_set(request.set_code).await;

    let snapshot = state.session.snapshot().await;
    Json(PreferredSetResponse {
        set_code: snapshot.preferred_set().map(str::to_string),
    })
}

pub fn settings_routes() -> Router<AppState> {
    Router::new().route("/settings/preferred-set", put(set_preferred_set))
}
