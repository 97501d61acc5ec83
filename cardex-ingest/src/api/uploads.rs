//! Upload handlers
//!
//! POST /cards/upload runs a whole batch before responding; progress is
//! streamed on /events as each image resolves.

use axum::{
    extract::{DefaultBodyLimit, Path, State},
    http::header,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    error::{ApiError, ApiResult},
    models::UploadedImage,
    AppState,
};

/// One image in an upload request
#[derive(Debug, Deserialize)]
pub struct UploadImage {
    pub name: String,
    /// Base64-encoded JPEG or PNG
    pub content: String,
}

/// POST /cards/upload request
#[derive(Debug, Deserialize)]
pub struct UploadRequest {
    pub images: Vec<UploadImage>,
}

/// POST /cards/upload response
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub resolved: usize,
    pub unresolved: Vec<String>,
    pub errors: Vec<String>,
}

/// POST /cards/upload
///
/// The whole request is rejected if any image fails validation, before
/// anything is sent to the recognition service.
pub async fn upload_cards(
    State(state): State<AppState>,
    Json(request): Json<UploadRequest>,
) -> ApiResult<Json<UploadResponse>> {
    if request.images.is_empty() {
        return Err(ApiError::BadRequest("No images in upload".to_string()));
    }
    if request.images.len() > state.max_batch_size {
        return Err(ApiError::PayloadTooLarge(format!(
            "{} images uploaded, at most {} per batch",
            request.images.len(),
            state.max_batch_size
        )));
    }

    let images = request
        .images
        .iter()
        .map(|image| UploadedImage::from_base64(image.name.clone(), &image.content))
        .collect::<Result<Vec<_>, _>>()?;

    tracing::info!(batch_size = images.len(), "Upload accepted");

    let outcome = state.session.upload_batch(images).await;

    Ok(Json(UploadResponse {
        resolved: outcome.resolved.len(),
        unresolved: outcome.unresolved,
        errors: outcome.errors,
    }))
}

/// GET /uploads/:id
pub async fn get_upload(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let image = state
        .session
        .upload(id)
        .await
        .ok_or_else(|| ApiError::NotFound(format!("Upload {}", id)))?;

    Ok(([(header::CONTENT_TYPE, image.content_type)], image.content))
}

/// Upload routes; `max_body_bytes` replaces axum's 2 MB default on the batch upload
pub fn upload_routes(max_body_bytes: usize) -> Router<AppState> {
    Router::new()
        .route(
            "/cards/upload",
            post(upload_cards).layer(DefaultBodyLimit::max(max_body_bytes)),
        )
        .route("/uploads/:id", get(get_upload))
}
