//! Configuration resolution for cardex-ingest
//!
//! The OCR credential resolves with ENV → TOML priority. Everything else is
//! read straight from [`TomlConfig`].

use cardex_common::config::TomlConfig;
use cardex_common::{Error, Result};
use tracing::{info, warn};

/// Environment variable holding the Vision API key
pub const VISION_API_KEY_ENV_VAR: &str = "CARDEX_VISION_API_KEY";

/// Resolve the Vision API key
///
/// **Priority:** ENV → TOML. Blank values count as unset.
pub fn resolve_vision_api_key(toml_config: &TomlConfig) -> Result<String> {
    let env_key = std::env::var(VISION_API_KEY_ENV_VAR)
        .ok()
        .filter(|key| is_valid_key(key));
    let toml_key = toml_config
        .vision_api_key
        .as_ref()
        .filter(|key| is_valid_key(key));

    if env_key.is_some() && toml_key.is_some() {
        warn!("Vision API key found in both environment and TOML. Using environment (highest priority).");
    }

    if let Some(key) = env_key {
        info!("Vision API key loaded from environment variable");
        return Ok(key);
    }

    if let Some(key) = toml_key {
        info!("Vision API key loaded from TOML config");
        return Ok(key.clone());
    }

    Err(Error::Config(format!(
        "Vision API key not configured. Please configure using one of:\n\
         1. Environment: {}=your-key-here\n\
         2. TOML config: ~/.config/cardex/cardex-ingest.toml (vision_api_key = \"your-key\")",
        VISION_API_KEY_ENV_VAR
    )))
}

/// Validate API key (non-empty, non-whitespace)
pub fn is_valid_key(key: &str) -> bool {
    !key.trim().is_empty()
}
