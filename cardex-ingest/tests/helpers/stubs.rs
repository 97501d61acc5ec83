//! In-memory recognizer and catalog

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use cardex_ingest::models::{CardVersion, ResolvedCard, UploadedImage};
use cardex_ingest::services::{
    CardRecognizer, CatalogError, CatalogSource, RecognitionError, VersionQuery,
};

/// Recognizer answering by image display name
#[derive(Default)]
pub struct StubRecognizer {
    names: HashMap<String, String>,
    failures: HashMap<String, String>,
}

impl StubRecognizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Image `display_name` reads as `card_name`
    pub fn reads(mut self, display_name: &str, card_name: &str) -> Self {
        self.names.insert(display_name.to_string(), card_name.to_string());
        self
    }

    /// Recognition of `display_name` fails with a network error
    pub fn fails(mut self, display_name: &str, message: &str) -> Self {
        self.failures.insert(display_name.to_string(), message.to_string());
        self
    }
}

#[async_trait]
impl CardRecognizer for StubRecognizer {
    async fn recognize(&self, image: &UploadedImage) -> Result<Option<String>, RecognitionError> {
        if let Some(message) = self.failures.get(&image.display_name) {
            return Err(RecognitionError::NetworkError(message.clone()));
        }
        Ok(self.names.get(&image.display_name).cloned())
    }
}

/// Catalog keyed by exact name, recording every search query
#[derive(Default)]
pub struct StubCatalog {
    versions: HashMap<String, Vec<CardVersion>>,
    cards: HashMap<String, ResolvedCard>,
    failing_names: HashMap<String, String>,
    queries: Mutex<Vec<VersionQuery>>,
}

impl StubCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register printings of `name`; each is also fetchable by id
    pub fn with_card(mut self, name: &str, versions: Vec<CardVersion>) -> Self {
        for v in &versions {
            self.cards.insert(
                v.catalog_id.clone(),
                ResolvedCard::from_version(v.clone(), None, vec![]),
            );
        }
        self.versions.insert(name.to_string(), versions);
        self
    }

    /// Register search results whose ids are not fetchable
    pub fn with_search_only(mut self, name: &str, versions: Vec<CardVersion>) -> Self {
        self.versions.insert(name.to_string(), versions);
        self
    }

    /// Override the fetch-by-id result for one id
    pub fn with_fetched(mut self, card: ResolvedCard) -> Self {
        self.cards.insert(card.catalog_id.clone(), card);
        self
    }

    /// Searches for `name` fail with a network error
    pub fn failing(mut self, name: &str, message: &str) -> Self {
        self.failing_names.insert(name.to_string(), message.to_string());
        self
    }

    pub fn queries(&self) -> Vec<VersionQuery> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl CatalogSource for StubCatalog {
    async fn search(&self, query: &VersionQuery) -> Result<Vec<CardVersion>, CatalogError> {
        self.queries.lock().unwrap().push(query.clone());

        if let Some(message) = self.failing_names.get(&query.name) {
            return Err(CatalogError::NetworkError(message.clone()));
        }
        Ok(self.versions.get(&query.name).cloned().unwrap_or_default())
    }

    async fn fetch_card(&self, catalog_id: &str) -> Result<Option<ResolvedCard>, CatalogError> {
        Ok(self.cards.get(catalog_id).cloned())
    }
}
