//! Card catalog records
//!
//! `CardVersion` is one printing as returned by a catalog search,
//! `ResolvedCard` is the catalog entry a user reviews and exports.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// One canonical printing of a card
///
/// Identity is `catalog_id`. The optional detail fields are whatever the
/// catalog returned for this printing; the resolution pipeline back-fills the
/// sparse ones from the fetched card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardVersion {
    pub catalog_id: String,
    pub name: String,
    pub set_code: String,
    pub set_name: String,
    pub collector_number: String,
    pub image_url: Option<String>,
    pub release_date: Option<NaiveDate>,
    pub price: Option<f64>,
    #[serde(default)]
    pub price_foil: Option<f64>,
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
    /// Preview handle of the photo this printing was resolved from
    #[serde(default)]
    pub uploaded_image_url: Option<String>,
}

/// A confirmed catalog entry with its sibling printings
///
/// When `versions` is non-empty it contains the entry whose `catalog_id`
/// equals the card's own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedCard {
    pub catalog_id: String,
    pub name: String,
    pub set_code: String,
    pub set_name: String,
    pub collector_number: String,
    pub image_url: Option<String>,
    pub release_date: Option<NaiveDate>,
    pub mana_cost: String,
    pub type_line: String,
    pub rarity: String,
    pub text: String,
    pub flavor_text: Option<String>,
    pub power: Option<String>,
    pub toughness: Option<String>,
    pub price: Option<f64>,
    pub price_foil: Option<f64>,
    pub uploaded_image_url: Option<String>,
    pub versions: Vec<CardVersion>,
}

impl ResolvedCard {
    /// Build a card from a printing, attaching upload data and sibling list
    ///
    /// Only the printing's own fields are used; nothing is looked up.
    pub fn from_version(
        version: CardVersion,
        uploaded_image_url: Option<String>,
        versions: Vec<CardVersion>,
    ) -> Self {
        Self {
            catalog_id: version.catalog_id,
            name: version.name,
            set_code: version.set_code,
            set_name: version.set_name,
            collector_number: version.collector_number,
            image_url: version.image_url,
            release_date: version.release_date,
            mana_cost: version.mana_cost.unwrap_or_default(),
            type_line: version.type_line.unwrap_or_default(),
            rarity: version.rarity.unwrap_or_default(),
            text: version.oracle_text.unwrap_or_default(),
            flavor_text: version.flavor_text,
            power: version.power,
            toughness: version.toughness,
            price: version.price,
            price_foil: version.price_foil,
            uploaded_image_url,
            versions,
        }
    }

    /// This card's own printing as a version record
    pub fn own_version(&self) -> CardVersion {
        CardVersion {
            catalog_id: self.catalog_id.clone(),
            name: self.name.clone(),
            set_code: self.set_code.clone(),
            set_name: self.set_name.clone(),
            collector_number: self.collector_number.clone(),
            image_url: self.image_url.clone(),
            release_date: self.release_date,
            price: self.price,
            price_foil: self.price_foil,
            mana_cost: non_empty(&self.mana_cost),
            type_line: non_empty(&self.type_line),
            rarity: non_empty(&self.rarity),
            oracle_text: non_empty(&self.text),
            flavor_text: self.flavor_text.clone(),
            power: self.power.clone(),
            toughness: self.toughness.clone(),
            uploaded_image_url: self.uploaded_image_url.clone(),
        }
    }

    /// Look up a sibling printing by catalog id
    pub fn find_version(&self, catalog_id: &str) -> Option<&CardVersion> {
        self.versions.iter().find(|v| v.catalog_id == catalog_id)
    }
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Newest release first; printings without a release date sort last
pub fn by_release_date_desc(a: &CardVersion, b: &CardVersion) -> Ordering {
    b.release_date.cmp(&a.release_date)
}
