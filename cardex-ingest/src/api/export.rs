//! CSV export download

use axum::{
    extract::State,
    http::header,
    response::IntoResponse,
    routing::get,
    Router,
};

use crate::services::csv_export::EXPORT_FILE_NAME;
use crate::AppState;

/// GET /export.csv
pub async fn export_csv(State(state): State<AppState>) -> impl IntoResponse {
    let csv = state.session.export_csv().await;
    tracing::info!(bytes = csv.len(), "Catalog exported");

    (
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", EXPORT_FILE_NAME),
            ),
        ],
        csv,
    )
}

pub fn export_routes() -> Router<AppState> {
    Router::new().route("/export.csv", get(export_csv))
}
