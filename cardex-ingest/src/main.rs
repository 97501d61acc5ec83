//! cardex-ingest - card photo resolution service
//!
//! Accepts photos of physical cards, recognises their names through Google
//! Cloud Vision, resolves them against Scryfall and keeps the reviewed
//! catalog in memory for CSV export.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use cardex_common::events::EventBus;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cardex_ingest::services::{GoogleVisionClient, ResolutionPipeline, ScryfallClient};
use cardex_ingest::session::CatalogSession;
use cardex_ingest::AppState;

const MODULE_NAME: &str = "cardex-ingest";

#[tokio::main]
async fn main() -> Result<()> {
    // Config is read before logging starts so [logging].level can apply;
    // load warnings emitted before init are dropped.
    let config = cardex_common::config::load_or_default(MODULE_NAME)?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Starting {} (card resolution) service", MODULE_NAME);
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let api_key = cardex_ingest::config::resolve_vision_api_key(&config)?;
    let timeout = Duration::from_secs(config.request_timeout_secs);

    let recognizer = GoogleVisionClient::new(&config.recognition.base_url, api_key, timeout)?;
    let catalog = ScryfallClient::new(
        &config.catalog.base_url,
        config.catalog.requests_per_second,
        config.catalog.max_pages,
        timeout,
    )?;
    info!(
        catalog = %config.catalog.base_url,
        requests_per_second = config.catalog.requests_per_second,
        "Catalog client initialized"
    );

    let event_bus = EventBus::new(100);
    let pipeline = ResolutionPipeline::new(Arc::new(recognizer), Arc::new(catalog));
    let session = CatalogSession::new(pipeline, event_bus)
        .with_upload_capacity(config.upload.max_stored_images);
    if config.preferred_set.is_some() {
        session.set_preferred_set(config.preferred_set.clone()).await;
    }

    let state = AppState::new(session)
        .with_max_batch_size(config.max_batch_size)
        .with_max_body_bytes(config.upload.max_body_bytes);
    let app = cardex_ingest::build_router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    info!("Listening on http://{}", config.bind_address);
    info!("Health check: http://{}/health", config.bind_address);

    axum::serve(listener, app).await?;

    Ok(())
}
