//! HTTP API handlers for cardex-ingest

pub mod cards;
pub mod export;
pub mod health;
pub mod settings;
pub mod sse;
pub mod uploads;

pub use cards::card_routes;
pub use export::export_routes;
pub use health::health_routes;
pub use settings::settings_routes;
pub use sse::event_stream;
pub use uploads::upload_routes;
