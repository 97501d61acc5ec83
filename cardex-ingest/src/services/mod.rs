//! Card resolution services

pub mod csv_export;
pub mod manual_resolution;
pub mod reconciliation;
pub mod resolution_pipeline;
pub mod scryfall_client;
pub mod vision_client;

pub use csv_export::export_csv;
pub use manual_resolution::{resolve_entry_manually, resolve_manually, ManualOutcome};
pub use reconciliation::{select_version, sort_versions};
pub use resolution_pipeline::{BatchOutcome, ImageOutcome, ResolutionError, ResolutionPipeline};
pub use scryfall_client::{CatalogError, CatalogSource, ScryfallClient, VersionQuery};
pub use vision_client::{CardRecognizer, GoogleVisionClient, RecognitionError};
