//! Version reconciliation
//!
//! Swapping a resolved card to a sibling printing keeps what belongs to the
//! upload (the photo) and the sibling list; every other field comes from the
//! chosen printing as-is.

use crate::models::{by_release_date_desc, CardVersion, ResolvedCard};

/// Merge a newly chosen printing into the current card
pub fn select_version(current: &ResolvedCard, version: &CardVersion) -> ResolvedCard {
    ResolvedCard::from_version(
        version.clone(),
        current.uploaded_image_url.clone(),
        current.versions.clone(),
    )
}

/// Presentation order for a version picker
///
/// Printings from `preferred_set` come first, then newest release first within
/// each group. Ties keep their input order. An empty preferred set means no
/// preference.
pub fn sort_versions(versions: &[CardVersion], preferred_set: Option<&str>) -> Vec<CardVersion> {
    let preferred = preferred_set.filter(|set| !set.is_empty());

    let mut sorted = versions.to_vec();
    sorted.sort_by(|a, b| {
        let a_rank = preferred.map_or(false, |set| a.set_code != set);
        let b_rank = preferred.map_or(false, |set| b.set_code != set);
        a_rank.cmp(&b_rank).then_with(|| by_release_date_desc(a, b))
    });
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;

    fn version(id: &str, set: &str, date: &str) -> CardVersion {
        CardVersion {
            catalog_id: id.to_string(),
            name: "Counterspell".to_string(),
            set_code: set.to_string(),
            set_name: set.to_uppercase(),
            collector_number: "1".to_string(),
            image_url: Some(format!("https://img/{}.jpg", id)),
            release_date: date.parse().ok(),
            price: Some(1.0),
            price_foil: None,
            mana_cost: Some("{U}{U}".to_string()),
            type_line: Some("Instant".to_string()),
            rarity: Some("uncommon".to_string()),
            oracle_text: Some("Counter target spell.".to_string()),
            flavor_text: None,
            power: None,
            toughness: None,
            uploaded_image_url: Some("/uploads/photo".to_string()),
        }
    }

    fn ids(versions: &[CardVersion]) -> Vec<&str> {
        versions.iter().map(|v| v.catalog_id.as_str()).collect()
    }

    #[test]
    fn test_select_version_carries_upload_and_siblings() {
        let siblings = vec![
            version("mh2", "mh2", "2021-06-18"),
            version("tmp", "tmp", "1997-10-14"),
        ];
        let current = ResolvedCard::from_version(
            siblings[0].clone(),
            Some("/uploads/photo".to_string()),
            siblings.clone(),
        );

        let mut chosen = siblings[1].clone();
        chosen.uploaded_image_url = None;
        let merged = select_version(&current, &chosen);

        assert_eq!(merged.catalog_id, "tmp");
        assert_eq!(merged.set_code, "tmp");
        assert_eq!(merged.uploaded_image_url, current.uploaded_image_url);
        assert_eq!(merged.versions, current.versions);
    }

    #[test]
    fn test_select_own_version_is_noop() {
        let siblings = vec![version("mh2", "mh2", "2021-06-18")];
        let current = ResolvedCard::from_version(
            siblings[0].clone(),
            Some("/uploads/photo".to_string()),
            siblings.clone(),
        );

        assert_eq!(select_version(&current, &siblings[0]), current);
        assert_eq!(select_version(&current, &current.own_version()), current);
    }

    #[test]
    fn test_sort_without_preference_is_newest_first() {
        let versions = vec![
            version("a", "tmp", "1997-10-14"),
            version("b", "mh2", "2021-06-18"),
            version("c", "7ed", "2001-04-11"),
        ];
        assert_eq!(ids(&sort_versions(&versions, None)), vec!["b", "c", "a"]);
        assert_eq!(ids(&sort_versions(&versions, Some(""))), vec!["b", "c", "a"]);
    }

    #[test]
    fn test_sort_preferred_set_first() {
        let versions = vec![
            version("a", "tmp", "1997-10-14"),
            version("b", "mh2", "2021-06-18"),
            version("c", "tmp", "1998-01-01"),
            version("d", "7ed", "2001-04-11"),
        ];

        let sorted = sort_versions(&versions, Some("tmp"));
        assert_eq!(ids(&sorted), vec!["c", "a", "b", "d"]);
    }

    #[test]
    fn test_sort_is_stable_on_equal_keys() {
        let versions = vec![
            version("first", "tmp", "1997-10-14"),
            version("second", "tmp", "1997-10-14"),
            version("third", "mh2", "1997-10-14"),
        ];

        let sorted = sort_versions(&versions, Some("mh2"));
        assert_eq!(ids(&sorted), vec!["third", "first", "second"]);
    }
}
