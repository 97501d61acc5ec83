//! # Cardex Common Library
//!
//! Shared code for the Cardex services including:
//! - Error type shared by library code
//! - TOML configuration loading
//! - Catalog event types and the broadcast event bus
//! - Server-Sent Events helpers

pub mod config;
pub mod error;
pub mod events;
pub mod sse;

pub use error::{Error, Result};
