//! Manual resolution of unresolved entries
//!
//! The user types a card name for an entry that failed recognition or lookup.
//! The name re-enters the pipeline at the catalog search stage. Only a
//! successful lookup changes the catalog state.

use crate::models::ResolvedCard;
use crate::services::resolution_pipeline::{ResolutionError, ResolutionPipeline};
use crate::session::state::CatalogState;

/// Result of one manual lookup
#[derive(Debug, Clone, PartialEq)]
pub enum ManualOutcome {
    Resolved(ResolvedCard),
    /// No printings matched; the entry stays unresolved
    StillUnresolved,
}

/// Catalog stages for a user-supplied name (no upload preview)
pub async fn lookup(
    pipeline: &ResolutionPipeline,
    name: &str,
) -> Result<ManualOutcome, ResolutionError> {
    let name = name.trim();

    match pipeline.resolve_name(name, None).await {
        Ok(Some(card)) => {
            tracing::info!(name = %name, catalog_id = %card.catalog_id, "Manual lookup matched");
            Ok(ManualOutcome::Resolved(card))
        }
        Ok(None) => {
            tracing::info!(name = %name, "Manual lookup found no versions");
            Ok(ManualOutcome::StillUnresolved)
        }
        Err(e) => {
            tracing::warn!(name = %name, error = %e, "Manual lookup failed");
            Err(e)
        }
    }
}

/// Apply a lookup result: a resolved card replaces one `entry`
pub fn apply(state: CatalogState, entry: &str, outcome: &ManualOutcome) -> CatalogState {
    match outcome {
        ManualOutcome::Resolved(card) => state.with_manual_resolution(entry, card.clone()),
        ManualOutcome::StillUnresolved => state,
    }
}

/// Look up `name` and, on success, move `name` from unresolved to resolved
pub async fn resolve_manually(
    pipeline: &ResolutionPipeline,
    state: CatalogState,
    name: &str,
) -> (CatalogState, Result<ManualOutcome, ResolutionError>) {
    resolve_entry_manually(pipeline, state, name, name).await
}

/// Look up `name` and, on success, replace the unresolved `entry` with the card
///
/// `entry` is matched exactly and at most one instance is removed. The state
/// is returned unchanged when the lookup fails or finds nothing.
pub async fn resolve_entry_manually(
    pipeline: &ResolutionPipeline,
    state: CatalogState,
    entry: &str,
    name: &str,
) -> (CatalogState, Result<ManualOutcome, ResolutionError>) {
    match lookup(pipeline, name).await {
        Ok(outcome) => (apply(state, entry, &outcome), Ok(outcome)),
        Err(e) => (state, Err(e)),
    }
}
