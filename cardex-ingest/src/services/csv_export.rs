//! CSV export of the resolved catalog
//!
//! Column layout matches common collection-import formats: one copy of each
//! card, non-foil.

use crate::models::ResolvedCard;

pub const CSV_HEADERS: [&str; 12] = [
    "Scryfall ID",
    "Name",
    "Set",
    "Collector Number",
    "Mana Cost",
    "Type",
    "Rarity",
    "Power",
    "Toughness",
    "Price",
    "Quantity",
    "Quantity Foil",
];

/// Suggested download name
pub const EXPORT_FILE_NAME: &str = "mtg_cards_export.csv";

/// Wrap in double quotes, doubling embedded quotes
fn quoted(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

fn row(card: &ResolvedCard) -> String {
    [
        card.catalog_id.clone(),
        quoted(&card.name),
        card.set_code.clone(),
        card.collector_number.clone(),
        card.mana_cost.clone(),
        quoted(&card.type_line),
        card.rarity.clone(),
        card.power.clone().unwrap_or_default(),
        card.toughness.clone().unwrap_or_default(),
        card.price.map(|p| format!("{:.2}", p)).unwrap_or_default(),
        "1".to_string(),
        "0".to_string(),
    ]
    .join(",")
}

/// Render the header plus one row per card, newline separated
pub fn export_csv(cards: &[ResolvedCard]) -> String {
    std::iter::once(CSV_HEADERS.join(","))
        .chain(cards.iter().map(row))
        .collect::<Vec<_>>()
        .join("\n")
}
