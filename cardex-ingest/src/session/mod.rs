//! Catalog session - the single writer of catalog state
//!
//! Network work (recognition, catalog lookups) happens without holding the
//! state lock; results are applied afterwards in one write. Upload batches
//! are serialised so they append in the order they started.

pub mod state;

use std::collections::{HashMap, VecDeque};

use cardex_common::events::{CatalogEvent, EventBus};
use thiserror::Error;
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use crate::models::{CardVersion, ResolvedCard, UploadedImage};
use crate::services::manual_resolution::{self, ManualOutcome};
use crate::services::resolution_pipeline::{BatchOutcome, ResolutionError, ResolutionPipeline};
use crate::services::csv_export;

pub use state::{CatalogState, StateError};

/// Session operation errors
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    State(#[from] StateError),

    #[error("Version {0} is not a printing of the focused card")]
    VersionNotFound(String),

    #[error(transparent)]
    Resolution(#[from] ResolutionError),
}

/// Photos kept for preview, bounded with oldest-first eviction
struct UploadStore {
    images: HashMap<Uuid, UploadedImage>,
    order: VecDeque<Uuid>,
    capacity: usize,
}

impl UploadStore {
    fn new(capacity: usize) -> Self {
        Self {
            images: HashMap::new(),
            order: VecDeque::new(),
            capacity,
        }
    }

    fn insert(&mut self, image: UploadedImage) {
        let id = image.id;
        if self.images.insert(id, image).is_none() {
            self.order.push_back(id);
        }
        while self.order.len() > self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.images.remove(&oldest);
                tracing::debug!(image_id = %oldest, "Evicted stored upload");
            }
        }
    }
}

/// Stored photos unless configured otherwise
pub const DEFAULT_UPLOAD_CAPACITY: usize = 1000;

pub struct CatalogSession {
    state: RwLock<CatalogState>,
    uploads: RwLock<UploadStore>,
    last_errors: RwLock<Vec<String>>,
    batch_lock: Mutex<()>,
    pipeline: ResolutionPipeline,
    event_bus: EventBus,
}

impl CatalogSession {
    pub fn new(pipeline: ResolutionPipeline, event_bus: EventBus) -> Self {
        Self {
            state: RwLock::new(CatalogState::new()),
            uploads: RwLock::new(UploadStore::new(DEFAULT_UPLOAD_CAPACITY)),
            last_errors: RwLock::new(Vec::new()),
            batch_lock: Mutex::new(()),
            pipeline: pipeline.with_event_bus(event_bus.clone()),
            event_bus,
        }
    }

    /// Keep at most `capacity` uploaded photos; older previews return not found
    pub fn with_upload_capacity(self, capacity: usize) -> Self {
        Self {
            uploads: RwLock::new(UploadStore::new(capacity)),
            ..self
        }
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    /// Copy of the current state
    pub async fn snapshot(&self) -> CatalogState {
        self.state.read().await.clone()
    }

    /// Per-image error messages of the most recent batch
    pub async fn last_errors(&self) -> Vec<String> {
        self.last_errors.read().await.clone()
    }

    /// Resolve an upload batch and append the results
    pub async fn upload_batch(&self, images: Vec<UploadedImage>) -> BatchOutcome {
        let _batch = self.batch_lock.lock().await;

        {
            let mut uploads = self.uploads.write().await;
            for image in &images {
                uploads.insert(image.clone());
            }
        }

        let outcome = self.pipeline.resolve(&images).await;

        {
            let mut state = self.state.write().await;
            let current = std::mem::take(&mut *state);
            *state = current.with_batch(outcome.resolved.clone(), outcome.unresolved.clone());
        }
        *self.last_errors.write().await = outcome.errors.clone();

        outcome
    }

    /// Uploaded image by id, for serving previews
    pub async fn upload(&self, id: Uuid) -> Option<UploadedImage> {
        self.uploads.read().await.images.get(&id).cloned()
    }

    /// Look up `name` for the unresolved `entry` (defaults to `name`)
    pub async fn resolve_manually(
        &self,
        entry: Option<&str>,
        name: &str,
    ) -> Result<ManualOutcome, SessionError> {
        let entry = entry.unwrap_or(name);
        let outcome = manual_resolution::lookup(&self.pipeline, name).await?;

        {
            let mut state = self.state.write().await;
            let current = std::mem::take(&mut *state);
            *state = manual_resolution::apply(current, entry, &outcome);
        }

        self.event_bus.emit_lossy(CatalogEvent::ManualResolutionAttempted {
            entry: entry.to_string(),
            name: name.to_string(),
            resolved: matches!(outcome, ManualOutcome::Resolved(_)),
        });

        Ok(outcome)
    }

    /// Focus the card at `index`
    pub async fn select_card(&self, index: usize) -> Result<ResolvedCard, SessionError> {
        let mut state = self.state.write().await;
        let next = state.clone().with_focus(index)?;
        *state = next;

        self.event_bus.emit_lossy(CatalogEvent::FocusChanged { index });
        state.focused_card().cloned().ok_or(SessionError::State(StateError::NoCards))
    }

    /// Swap the focused card to its sibling printing `catalog_id`
    pub async fn select_version(&self, catalog_id: &str) -> Result<ResolvedCard, SessionError> {
        let mut state = self.state.write().await;

        let focused = state.focused_card().ok_or(StateError::NoCards)?;
        let version: CardVersion = focused
            .find_version(catalog_id)
            .cloned()
            .ok_or_else(|| SessionError::VersionNotFound(catalog_id.to_string()))?;
        let index = state.focused_index().unwrap_or_default();

        let next = state.clone().with_selected_version(&version)?;
        *state = next;

        self.event_bus.emit_lossy(CatalogEvent::VersionSelected {
            index,
            catalog_id: catalog_id.to_string(),
        });
        state.focused_card().cloned().ok_or(SessionError::State(StateError::NoCards))
    }

    pub async fn set_preferred_set(&self, set_code: Option<String>) {
        let mut state = self.state.write().await;
        let current = std::mem::take(&mut *state);
        *state = current.with_preferred_set(set_code);

        self.event_bus.emit_lossy(CatalogEvent::PreferredSetChanged {
            set_code: state.preferred_set().map(str::to_string),
        });
    }

    /// Focused card's printings in picker order
    pub async fn focused_versions(&self) -> Result<Vec<CardVersion>, SessionError> {
        let state = self.state.read().await;
        if state.focused_card().is_none() {
            return Err(StateError::NoCards.into());
        }
        Ok(state.focused_versions_sorted())
    }

    pub async fn export_csv(&self) -> String {
        csv_export::export_csv(self.state.read().await.resolved_cards())
    }
}
