//! Card and image fixtures

use cardex_ingest::models::{CardVersion, ResolvedCard, UploadedImage};

pub const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\n\x00\x00\x00\x0dIHDR\x00\x00\x00\x01";
pub const JPEG_BYTES: &[u8] = b"\xFF\xD8\xFF\xE0\x00\x10JFIF\x00\x01\x01";

pub fn png_image(name: &str) -> UploadedImage {
    UploadedImage::new(name, PNG_BYTES.to_vec()).unwrap()
}

pub fn jpeg_image(name: &str) -> UploadedImage {
    UploadedImage::new(name, JPEG_BYTES.to_vec()).unwrap()
}

/// A fully populated printing
pub fn version(id: &str, name: &str, set: &str, date: &str, price: Option<f64>) -> CardVersion {
    CardVersion {
        catalog_id: id.to_string(),
        name: name.to_string(),
        set_code: set.to_string(),
        set_name: set.to_uppercase(),
        collector_number: "1".to_string(),
        image_url: Some(format!("https://img.example/{}.jpg", id)),
        release_date: date.parse().ok(),
        price,
        price_foil: None,
        mana_cost: Some("{0}".to_string()),
        type_line: Some("Artifact".to_string()),
        rarity: Some("rare".to_string()),
        oracle_text: None,
        flavor_text: None,
        power: None,
        toughness: None,
        uploaded_image_url: None,
    }
}

/// Fetch-by-id result for `version` (no siblings yet)
pub fn resolved_card(version: &CardVersion) -> ResolvedCard {
    ResolvedCard::from_version(version.clone(), None, vec![])
}
