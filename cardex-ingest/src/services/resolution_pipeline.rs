//! Resolution pipeline - uploaded photo to catalog card
//!
//! Per image, sequentially and in input order:
//! 1. Recognize the card name (OCR)
//! 2. Search printings for the recognized name
//! 3. Fetch the newest printing, then search again with the catalog's
//!    canonical name to get the full sibling list
//! 4. Stamp the upload preview onto every sibling and back-fill sparse
//!    sibling fields from the fetched card
//!
//! Every image ends up either resolved or unresolved. A failure on one image
//! never aborts the batch.

use std::sync::Arc;

use cardex_common::events::{CatalogEvent, EventBus};
use chrono::Utc;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::models::{by_release_date_desc, CardVersion, ResolvedCard, UploadedImage};
use crate::services::scryfall_client::{CatalogError, CatalogSource};
use crate::services::vision_client::CardRecognizer;

/// Failures of the catalog stages (steps 2-4)
#[derive(Debug, Error)]
pub enum ResolutionError {
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// The id came from a search but fetch-by-id did not find it
    #[error("Card {0} disappeared from the catalog between search and fetch")]
    CardNotFound(String),
}

/// Result of resolving one image
#[derive(Debug, Clone)]
pub enum ImageOutcome {
    Resolved(ResolvedCard),
    Unresolved {
        name: String,
        /// Message for the user's error list, when the miss was a failure
        error: Option<String>,
    },
}

/// Result of resolving a batch
#[derive(Debug, Clone, Default)]
pub struct BatchOutcome {
    pub resolved: Vec<ResolvedCard>,
    pub unresolved: Vec<String>,
    pub errors: Vec<String>,
}

impl BatchOutcome {
    fn push(&mut self, outcome: ImageOutcome) {
        match outcome {
            ImageOutcome::Resolved(card) => self.resolved.push(card),
            ImageOutcome::Unresolved { name, error } => {
                self.unresolved.push(name);
                if let Some(message) = error {
                    self.errors.push(message);
                }
            }
        }
    }
}

/// Orchestrates recognition and catalog lookups
#[derive(Clone)]
pub struct ResolutionPipeline {
    recognizer: Arc<dyn CardRecognizer>,
    catalog: Arc<dyn CatalogSource>,
    event_bus: Option<EventBus>,
}

impl ResolutionPipeline {
    pub fn new(recognizer: Arc<dyn CardRecognizer>, catalog: Arc<dyn CatalogSource>) -> Self {
        Self {
            recognizer,
            catalog,
            event_bus: None,
        }
    }

    /// Publish per-image progress on `event_bus`
    pub fn with_event_bus(mut self, event_bus: EventBus) -> Self {
        self.event_bus = Some(event_bus);
        self
    }

    fn emit(&self, event: CatalogEvent) {
        if let Some(bus) = &self.event_bus {
            bus.emit_lossy(event);
        }
    }

    /// Resolve a batch of images one at a time, preserving input order
    pub async fn resolve(&self, images: &[UploadedImage]) -> BatchOutcome {
        info!(batch_size = images.len(), "Resolving upload batch");
        self.emit(CatalogEvent::BatchStarted {
            batch_size: images.len(),
            timestamp: Utc::now(),
        });

        let mut outcome = BatchOutcome::default();
        for image in images {
            let image_outcome = self.resolve_image(image).await;

            match &image_outcome {
                ImageOutcome::Resolved(card) => self.emit(CatalogEvent::ImageResolved {
                    image_id: image.id,
                    display_name: image.display_name.clone(),
                    catalog_id: card.catalog_id.clone(),
                    card_name: card.name.clone(),
                    version_count: card.versions.len(),
                }),
                ImageOutcome::Unresolved { error, .. } => self.emit(CatalogEvent::ImageUnresolved {
                    image_id: image.id,
                    display_name: image.display_name.clone(),
                    reason: error
                        .clone()
                        .unwrap_or_else(|| "no catalog match".to_string()),
                }),
            }

            outcome.push(image_outcome);
        }

        info!(
            resolved = outcome.resolved.len(),
            unresolved = outcome.unresolved.len(),
            errors = outcome.errors.len(),
            "Upload batch resolved"
        );
        self.emit(CatalogEvent::BatchCompleted {
            resolved: outcome.resolved.len(),
            unresolved: outcome.unresolved.len(),
            errors: outcome.errors.len(),
            timestamp: Utc::now(),
        });

        outcome
    }

    /// Resolve one image (steps 1-4)
    pub async fn resolve_image(&self, image: &UploadedImage) -> ImageOutcome {
        let unresolved = |error: Option<String>| ImageOutcome::Unresolved {
            name: image.display_name.clone(),
            error,
        };

        let recognized = match self.recognizer.recognize(image).await {
            Ok(Some(name)) => name,
            Ok(None) => {
                debug!(image = %image.display_name, "No card name recognized");
                return unresolved(None);
            }
            Err(e) => {
                warn!(image = %image.display_name, error = %e, "Recognition failed");
                return unresolved(Some(format!(
                    "Error processing image {}: {}",
                    image.display_name, e
                )));
            }
        };

        match self.resolve_name(&recognized, Some(&image.preview_handle)).await {
            Ok(Some(card)) => ImageOutcome::Resolved(card),
            Ok(None) => {
                debug!(image = %image.display_name, name = %recognized, "No catalog versions found");
                unresolved(None)
            }
            Err(e) => {
                warn!(
                    image = %image.display_name,
                    name = %recognized,
                    error = %e,
                    "Catalog lookup failed"
                );
                unresolved(Some(format!(
                    "Error resolving {} from image {}: {}",
                    recognized, image.display_name, e
                )))
            }
        }
    }

    /// Catalog stages for a known name (steps 2-4)
    ///
    /// `Ok(None)` when the name has no printings. Used by manual resolution
    /// with no preview handle.
    pub async fn resolve_name(
        &self,
        name: &str,
        preview_handle: Option<&str>,
    ) -> Result<Option<ResolvedCard>, ResolutionError> {
        let candidates = self.catalog.search_versions(name).await?;
        let Some(provisional) = candidates.first() else {
            return Ok(None);
        };

        let mut card = self
            .catalog
            .fetch_card(&provisional.catalog_id)
            .await?
            .ok_or_else(|| ResolutionError::CardNotFound(provisional.catalog_id.clone()))?;

        // The canonical name can differ from the OCR guess in case or diacritics
        let versions = self.catalog.search_versions(&card.name).await?;

        let preview = preview_handle.map(str::to_string);
        card.uploaded_image_url = preview.clone();
        card.versions = assemble_versions(&card, versions, preview.as_deref());

        info!(
            query = %name,
            catalog_id = %card.catalog_id,
            card = %card.name,
            versions = card.versions.len(),
            "Card resolved"
        );

        Ok(Some(card))
    }
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, str::is_empty)
}

/// Stamp one sibling printing with the upload and back-fill sparse fields
pub fn stamp_version(mut version: CardVersion, card: &ResolvedCard, preview: Option<&str>) -> CardVersion {
    version.uploaded_image_url = preview.map(str::to_string);

    if version.price.is_none() {
        version.price = card.price;
    }
    if is_blank(&version.mana_cost) && !card.mana_cost.is_empty() {
        version.mana_cost = Some(card.mana_cost.clone());
    }
    if is_blank(&version.type_line) && !card.type_line.is_empty() {
        version.type_line = Some(card.type_line.clone());
    }
    if is_blank(&version.rarity) && !card.rarity.is_empty() {
        version.rarity = Some(card.rarity.clone());
    }

    version
}

/// Stamp every sibling and make sure the card's own printing is listed
pub fn assemble_versions(
    card: &ResolvedCard,
    versions: Vec<CardVersion>,
    preview: Option<&str>,
) -> Vec<CardVersion> {
    let mut stamped: Vec<CardVersion> = versions
        .into_iter()
        .map(|v| stamp_version(v, card, preview))
        .collect();

    if !stamped.is_empty() && !stamped.iter().any(|v| v.catalog_id == card.catalog_id) {
        debug!(catalog_id = %card.catalog_id, "Own printing missing from sibling search, inserting");
        stamped.push(card.own_version());
        stamped.sort_by(by_release_date_desc);
    }

    stamped
}
