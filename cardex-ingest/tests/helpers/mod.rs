//! Test Helper Utilities
//!
//! Shared utilities for testing cardex-ingest

#![allow(dead_code, unused_imports)]

pub mod fake_server;
pub mod fixtures;
pub mod log_capture;
pub mod stubs;

// Re-export commonly used items
pub use fake_server::spawn_fake_server;
pub use fixtures::{jpeg_image, png_image, resolved_card, version, JPEG_BYTES, PNG_BYTES};
pub use log_capture::{init_test_logging, LogCapture};
pub use stubs::{StubCatalog, StubRecognizer};
