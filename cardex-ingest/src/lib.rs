//! cardex-ingest library interface
//!
//! Exposes the resolution pipeline, the catalog session and the HTTP router
//! for integration testing.

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod session;

pub use crate::error::{ApiError, ApiResult};

use axum::Router;
use cardex_common::events::EventBus;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::session::CatalogSession;

/// Upper bound on images per upload batch unless configured otherwise
pub const DEFAULT_MAX_BATCH_SIZE: usize = 500;

/// Upload request body limit unless configured otherwise
pub const DEFAULT_MAX_BODY_BYTES: usize = 256 * 1024 * 1024;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Owner of the catalog state
    pub session: Arc<CatalogSession>,
    /// Event bus for SSE broadcasting
    pub event_bus: EventBus,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
    pub max_batch_size: usize,
    /// Body limit for the upload route (axum's own default is 2 MB)
    pub max_body_bytes: usize,
}

impl AppState {
    pub fn new(session: CatalogSession) -> Self {
        let event_bus = session.event_bus().clone();
        Self {
            session: Arc::new(session),
            event_bus,
            startup_time: Utc::now(),
            max_batch_size: DEFAULT_MAX_BATCH_SIZE,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }

    pub fn with_max_batch_size(mut self, max_batch_size: usize) -> Self {
        self.max_batch_size = max_batch_size;
        self
    }

    pub fn with_max_body_bytes(mut self, max_body_bytes: usize) -> Self {
        self.max_body_bytes = max_body_bytes;
        self
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::get;

    Router::new()
        .merge(api::card_routes())
        .merge(api::upload_routes(state.max_body_bytes))
        .merge(api::settings_routes())
        .merge(api::export_routes())
        .merge(api::health_routes())
        .route("/events", get(api::event_stream))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
