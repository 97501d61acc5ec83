//! Catalog state store
//!
//! Every mutation consumes the current state and returns the next one, so a
//! transition can be tested without a session around it. `focused_index` is
//! a valid index whenever `resolved_cards` is non-empty.

use serde::Serialize;
use thiserror::Error;

use crate::models::{CardVersion, ResolvedCard};
use crate::services::reconciliation::{select_version, sort_versions};

/// State transition errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StateError {
    #[error("No resolved cards in the catalog")]
    NoCards,

    #[error("Card index {index} out of range (catalog has {len} cards)")]
    IndexOutOfRange { index: usize, len: usize },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CatalogState {
    resolved_cards: Vec<ResolvedCard>,
    unresolved_names: Vec<String>,
    focused_index: usize,
    preferred_set: Option<String>,
}

impl CatalogState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn resolved_cards(&self) -> &[ResolvedCard] {
        &self.resolved_cards
    }

    pub fn unresolved_names(&self) -> &[String] {
        &self.unresolved_names
    }

    /// `None` while the catalog is empty
    pub fn focused_index(&self) -> Option<usize> {
        if self.resolved_cards.is_empty() {
            None
        } else {
            Some(self.focused_index)
        }
    }

    pub fn focused_card(&self) -> Option<&ResolvedCard> {
        self.resolved_cards.get(self.focused_index)
    }

    pub fn preferred_set(&self) -> Option<&str> {
        self.preferred_set.as_deref()
    }

    pub fn is_unresolved(&self, name: &str) -> bool {
        self.unresolved_names.iter().any(|n| n == name)
    }

    /// The focused card's siblings in picker order
    pub fn focused_versions_sorted(&self) -> Vec<CardVersion> {
        self.focused_card()
            .map(|card| sort_versions(&card.versions, self.preferred_set()))
            .unwrap_or_default()
    }

    /// Append a batch's results, keeping their order
    pub fn with_batch(mut self, resolved: Vec<ResolvedCard>, unresolved: Vec<String>) -> Self {
        self.resolved_cards.extend(resolved);
        self.unresolved_names.extend(unresolved);
        self
    }

    /// Append a manually resolved card and drop one matching unresolved entry
    pub fn with_manual_resolution(mut self, entry: &str, card: ResolvedCard) -> Self {
        self.resolved_cards.push(card);
        if let Some(pos) = self.unresolved_names.iter().position(|n| n == entry) {
            self.unresolved_names.remove(pos);
        }
        self
    }

    /// Focus the card at `index`
    pub fn with_focus(mut self, index: usize) -> Result<Self, StateError> {
        let len = self.resolved_cards.len();
        if len == 0 {
            return Err(StateError::NoCards);
        }
        if index >= len {
            return Err(StateError::IndexOutOfRange { index, len });
        }
        self.focused_index = index;
        Ok(self)
    }

    /// Replace the focused card with `version`, keeping its upload and siblings
    pub fn with_selected_version(mut self, version: &CardVersion) -> Result<Self, StateError> {
        let index = self.focused_index;
        let current = self.resolved_cards.get(index).ok_or(StateError::NoCards)?;
        let merged = select_version(current, version);
        self.resolved_cards[index] = merged;
        Ok(self)
    }

    pub fn with_preferred_set(mut self, set_code: Option<String>) -> Self {
        self.preferred_set = set_code.filter(|s| !s.trim().is_empty());
        self
    }
}
