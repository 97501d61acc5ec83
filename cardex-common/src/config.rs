//! Configuration loading
//!
//! Bootstrap configuration comes from a single TOML file:
//! 1. Path in the `CARDEX_CONFIG` environment variable
//! 2. `<config_dir>/cardex/<module>.toml` (OS-dependent, via `dirs`)
//!
//! A missing file is never fatal: a warning is logged and compiled defaults
//! are used. A file that exists but cannot be parsed is a configuration error.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable overriding the configuration file location
pub const CONFIG_PATH_ENV_VAR: &str = "CARDEX_CONFIG";

/// Bootstrap configuration loaded from TOML
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TomlConfig {
    /// HTTP listen address
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// OCR service credential (environment variable takes precedence)
    #[serde(default)]
    pub vision_api_key: Option<String>,

    /// Timeout applied to every outgoing HTTP request
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Maximum number of images accepted in one upload batch
    #[serde(default = "default_max_batch_size")]
    pub max_batch_size: usize,

    /// Initial preferred set code for version ordering
    #[serde(default)]
    pub preferred_set: Option<String>,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub catalog: CatalogConfig,

    #[serde(default)]
    pub recognition: RecognitionConfig,

    #[serde(default)]
    pub upload: UploadConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

/// Card database (Scryfall) client settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CatalogConfig {
    #[serde(default = "default_catalog_base_url")]
    pub base_url: String,

    /// Token bucket quota; Scryfall asks for 50-100ms between requests
    #[serde(default = "default_requests_per_second")]
    pub requests_per_second: u32,

    /// Upper bound on `next_page` links followed for one search
    #[serde(default = "default_max_pages")]
    pub max_pages: u32,
}

/// OCR (Google Cloud Vision) client settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RecognitionConfig {
    #[serde(default = "default_recognition_base_url")]
    pub base_url: String,
}

/// Upload endpoint limits
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UploadConfig {
    /// Request body limit for `POST /cards/upload` (base64 inflates photos by a third)
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,

    /// Uploaded photos kept for previews; the oldest are evicted beyond this
    #[serde(default = "default_max_stored_images")]
    pub max_stored_images: usize,
}

fn default_bind_address() -> String {
    "127.0.0.1:5740".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_max_batch_size() -> usize {
    500
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_catalog_base_url() -> String {
    "https://api.scryfall.com".to_string()
}

fn default_requests_per_second() -> u32 {
    10
}

fn default_max_pages() -> u32 {
    5
}

fn default_recognition_base_url() -> String {
    "https://vision.googleapis.com".to_string()
}

fn default_max_body_bytes() -> usize {
    256 * 1024 * 1024
}

fn default_max_stored_images() -> usize {
    1000
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            vision_api_key: None,
            request_timeout_secs: default_request_timeout_secs(),
            max_batch_size: default_max_batch_size(),
            preferred_set: None,
            logging: LoggingConfig::default(),
            catalog: CatalogConfig::default(),
            recognition: RecognitionConfig::default(),
            upload: UploadConfig::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: default_catalog_base_url(),
            requests_per_second: default_requests_per_second(),
            max_pages: default_max_pages(),
        }
    }
}

impl Default for RecognitionConfig {
    fn default() -> Self {
        Self {
            base_url: default_recognition_base_url(),
        }
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_body_bytes: default_max_body_bytes(),
            max_stored_images: default_max_stored_images(),
        }
    }
}

/// Default configuration file path for a module, e.g.
/// `~/.config/cardex/cardex-ingest.toml` on Linux
pub fn default_config_path(module_name: &str) -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("cardex").join(format!("{}.toml", module_name)))
}

/// Resolve the configuration file path (environment variable first)
pub fn resolve_config_path(module_name: &str) -> Option<PathBuf> {
    match std::env::var(CONFIG_PATH_ENV_VAR) {
        Ok(path) if !path.trim().is_empty() => Some(PathBuf::from(path)),
        _ => default_config_path(module_name),
    }
}

/// Parse a TOML configuration file
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;

    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))
}

/// Load the module's configuration, falling back to defaults when no file exists
pub fn load_or_default(module_name: &str) -> Result<TomlConfig> {
    let Some(path) = resolve_config_path(module_name) else {
        warn!("Could not determine config directory, using defaults");
        return Ok(TomlConfig::default());
    };

    if !path.exists() {
        warn!(path = %path.display(), "Config file not found, using defaults");
        return Ok(TomlConfig::default());
    }

    let config = load_toml_config(&path)?;
    info!(path = %path.display(), "Configuration loaded");
    Ok(config)
}

/// User-Agent sent with every outgoing HTTP request
pub fn get_user_agent() -> String {
    format!(
        "Cardex/{} (trading card catalog ingest)",
        env!("CARGO_PKG_VERSION")
    )
}
