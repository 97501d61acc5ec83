//! Scryfall card database client
//!
//! Two calls back the whole resolution flow: exact-name printing search and
//! fetch-by-id. Requests share one token-bucket rate limiter; Scryfall asks
//! clients to stay around 10 requests per second.

use async_trait::async_trait;
use chrono::NaiveDate;
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use serde::Deserialize;
use std::num::NonZeroU32;
use std::time::Duration;
use thiserror::Error;

use crate::models::{by_release_date_desc, CardVersion, ResolvedCard};

/// Names whose searches are restricted to paper printings
pub const BASIC_LAND_NAMES: [&str; 5] = ["Plains", "Island", "Swamp", "Mountain", "Forest"];

/// Catalog client errors
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("API error {0}: {1}")]
    ApiError(u16, String),

    #[error("Parse error: {0}")]
    ParseError(String),
}

/// Printing search for one card name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionQuery {
    pub name: String,
    pub include_promos: bool,
    /// Restrict to physical (non-digital) printings
    pub paper_only: bool,
}

impl VersionQuery {
    /// Exact-name search without promos; basic lands are limited to paper
    pub fn exact_name(name: &str) -> Self {
        Self {
            name: name.to_string(),
            include_promos: false,
            paper_only: BASIC_LAND_NAMES.contains(&name),
        }
    }

    /// Scryfall search syntax for this query
    pub fn to_search_string(&self) -> String {
        let mut query = format!("!\"{}\"", self.name.replace('"', "\\\""));
        if !self.include_promos {
            query.push_str(" -is:promo");
        }
        if self.paper_only {
            query.push_str(" game:paper -digital");
        }
        query
    }
}

/// Card database operations used by the resolution pipeline
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// All printings matching the query, newest first; not-found is empty
    async fn search(&self, query: &VersionQuery) -> Result<Vec<CardVersion>, CatalogError>;

    /// Full card detail by catalog id; `None` only when the id does not exist
    ///
    /// The returned card has an empty `versions` list.
    async fn fetch_card(&self, catalog_id: &str) -> Result<Option<ResolvedCard>, CatalogError>;

    async fn search_versions(&self, name: &str) -> Result<Vec<CardVersion>, CatalogError> {
        self.search(&VersionQuery::exact_name(name)).await
    }
}

/// Scryfall card object (fields used by the catalog)
#[derive(Debug, Clone, Deserialize)]
pub struct ScryfallCard {
    pub id: String,
    pub name: String,
    pub set: String,
    pub set_name: String,
    pub collector_number: String,
    #[serde(default)]
    pub released_at: Option<NaiveDate>,
    #[serde(default)]
    pub image_uris: Option<ImageUris>,
    /// Present on double-faced and split cards
    #[serde(default)]
    pub card_faces: Vec<CardFace>,
    #[serde(default)]
    pub mana_cost: Option<String>,
    #[serde(default)]
    pub type_line: Option<String>,
    #[serde(default)]
    pub rarity: Option<String>,
    #[serde(default)]
    pub oracle_text: Option<String>,
    #[serde(default)]
    pub flavor_text: Option<String>,
    #[serde(default)]
    pub power: Option<String>,
    #[serde(default)]
    pub toughness: Option<String>,
    #[serde(default)]
    pub prices: Prices,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ImageUris {
    #[serde(default)]
    pub normal: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CardFace {
    #[serde(default)]
    pub mana_cost: Option<String>,
    #[serde(default)]
    pub oracle_text: Option<String>,
    #[serde(default)]
    pub flavor_text: Option<String>,
    #[serde(default)]
    pub power: Option<String>,
    #[serde(default)]
    pub toughness: Option<String>,
    #[serde(default)]
    pub image_uris: Option<ImageUris>,
}

/// Prices are decimal strings in USD, null when unknown
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Prices {
    #[serde(default)]
    pub usd: Option<String>,
    #[serde(default)]
    pub usd_foil: Option<String>,
}

/// Paginated list object returned by /cards/search
#[derive(Debug, Deserialize)]
pub struct ScryfallList {
    #[serde(default)]
    pub data: Vec<ScryfallCard>,
    #[serde(default)]
    pub has_more: bool,
    #[serde(default)]
    pub next_page: Option<String>,
}

fn parse_price(value: Option<&str>) -> Option<f64> {
    value.and_then(|v| v.parse::<f64>().ok())
}

impl ScryfallCard {
    fn front_face(&self) -> Option<&CardFace> {
        self.card_faces.first()
    }

    fn from_face<T>(&self, own: &Option<T>, face: impl Fn(&CardFace) -> &Option<T>) -> Option<T>
    where
        T: Clone,
    {
        own.clone()
            .or_else(|| self.front_face().and_then(|f| face(f).clone()))
    }

    pub fn into_version(self) -> CardVersion {
        let image_url = self
            .image_uris
            .as_ref()
            .and_then(|uris| uris.normal.clone())
            .or_else(|| {
                self.front_face()
                    .and_then(|f| f.image_uris.as_ref())
                    .and_then(|uris| uris.normal.clone())
            });
        let mana_cost = self.from_face(&self.mana_cost, |f| &f.mana_cost);
        let oracle_text = self.from_face(&self.oracle_text, |f| &f.oracle_text);
        let flavor_text = self.from_face(&self.flavor_text, |f| &f.flavor_text);
        let power = self.from_face(&self.power, |f| &f.power);
        let toughness = self.from_face(&self.toughness, |f| &f.toughness);

        CardVersion {
            catalog_id: self.id,
            name: self.name,
            set_code: self.set,
            set_name: self.set_name,
            collector_number: self.collector_number,
            image_url,
            release_date: self.released_at,
            price: parse_price(self.prices.usd.as_deref()),
            price_foil: parse_price(self.prices.usd_foil.as_deref()),
            mana_cost,
            type_line: self.type_line,
            rarity: self.rarity,
            oracle_text,
            flavor_text,
            power,
            toughness,
            uploaded_image_url: None,
        }
    }

    pub fn into_resolved(self) -> ResolvedCard {
        ResolvedCard::from_version(self.into_version(), None, Vec::new())
    }
}

/// Scryfall API client
pub struct ScryfallClient {
    http_client: reqwest::Client,
    base_url: String,
    rate_limiter: DefaultDirectRateLimiter,
    max_pages: u32,
}

impl ScryfallClient {
    pub fn new(
        base_url: impl Into<String>,
        requests_per_second: u32,
        max_pages: u32,
        timeout: Duration,
    ) -> Result<Self, CatalogError> {
        let http_client = reqwest::Client::builder()
            .user_agent(cardex_common::config::get_user_agent())
            .timeout(timeout)
            .build()
            .map_err(|e| CatalogError::NetworkError(e.to_string()))?;

        let per_second = NonZeroU32::new(requests_per_second).unwrap_or(NonZeroU32::MIN);

        Ok(Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            rate_limiter: RateLimiter::direct(Quota::per_second(per_second)),
            max_pages: max_pages.max(1),
        })
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response, CatalogError> {
        self.rate_limiter.until_ready().await;
        request
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| CatalogError::NetworkError(e.to_string()))
    }
}

async fn error_for_status(response: reqwest::Response) -> CatalogError {
    let status = response.status();
    if status == 429 {
        return CatalogError::RateLimitExceeded;
    }
    let error_text = response.text().await.unwrap_or_default();
    CatalogError::ApiError(status.as_u16(), error_text)
}

#[async_trait]
impl CatalogSource for ScryfallClient {
    async fn search(&self, query: &VersionQuery) -> Result<Vec<CardVersion>, CatalogError> {
        let q = query.to_search_string();
        let url = format!("{}/cards/search", self.base_url);

        tracing::debug!(query = %q, "Searching Scryfall printings");

        let mut response = self
            .send(self.http_client.get(&url).query(&[
                ("q", q.as_str()),
                ("unique", "prints"),
                ("order", "released"),
                ("dir", "desc"),
            ]))
            .await?;

        let mut versions = Vec::new();
        let mut pages = 1;

        loop {
            let status = response.status();

            if status == 404 {
                if versions.is_empty() {
                    tracing::warn!(name = %query.name, "No versions found for card");
                }
                break;
            }

            if !status.is_success() {
                return Err(error_for_status(response).await);
            }

            let page: ScryfallList = response
                .json()
                .await
                .map_err(|e| CatalogError::ParseError(e.to_string()))?;

            versions.extend(page.data.into_iter().map(ScryfallCard::into_version));

            match page.next_page {
                Some(next) if page.has_more && pages < self.max_pages => {
                    pages += 1;
                    tracing::debug!(page = pages, "Following Scryfall next_page");
                    response = self.send(self.http_client.get(&next)).await?;
                }
                _ => break,
            }
        }

        versions.sort_by(by_release_date_desc);

        tracing::info!(
            name = %query.name,
            versions = versions.len(),
            pages = pages,
            "Scryfall search complete"
        );

        Ok(versions)
    }

    async fn fetch_card(&self, catalog_id: &str) -> Result<Option<ResolvedCard>, CatalogError> {
        let url = format!("{}/cards/{}", self.base_url, catalog_id);

        tracing::debug!(catalog_id = %catalog_id, "Fetching Scryfall card");

        let response = self.send(self.http_client.get(&url)).await?;
        let status = response.status();

        if status == 404 {
            tracing::warn!(catalog_id = %catalog_id, "Card not found");
            return Ok(None);
        }

        if !status.is_success() {
            return Err(error_for_status(response).await);
        }

        let card: ScryfallCard = response
            .json()
            .await
            .map_err(|e| CatalogError::ParseError(e.to_string()))?;

        Ok(Some(card.into_resolved()))
    }
}
