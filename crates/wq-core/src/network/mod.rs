//! Verse network result model and assembly helpers.

pub mod model;

use std::collections::HashSet;

/// Canonical display identifier of a verse: `"<surah>:<verse>"`.
pub fn make_node_id(surah: i64, verse: i64) -> String {
    format!("{}:{}", surah, verse)
}

/// Keep the first occurrence of each root key, preserving order and the
/// key ↔ Arabic correspondence.
///
/// The two slices are parallel; if their lengths differ the extra tail of
/// the longer one is ignored.
pub fn deduplicate_roots(keys: &[String], arabic: &[String]) -> (Vec<String>, Vec<String>) {
    let mut seen = HashSet::with_capacity(keys.len());
    let mut unique_keys = Vec::new();
    let mut unique_arabic = Vec::new();

    for (key, ar) in keys.iter().zip(arabic.iter()) {
        if seen.insert(key.as_str()) {
            unique_keys.push(key.clone());
            unique_arabic.push(ar.clone());
        }
    }

    (unique_keys, unique_arabic)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_make_node_id() {
        assert_eq!(make_node_id(2, 255), "2:255");
        assert_eq!(make_node_id(114, 6), "114:6");
    }

    #[test]
    fn test_dedup_keeps_first_seen_order() {
        let (keys, arabic) = deduplicate_roots(
            &strings(&["ktb", "Elm", "ktb", "Hkm", "Elm"]),
            &strings(&["كتب", "علم", "كتب", "حكم", "علم"]),
        );
        assert_eq!(keys, strings(&["ktb", "Elm", "Hkm"]));
        assert_eq!(arabic, strings(&["كتب", "علم", "حكم"]));
    }

    #[test]
    fn test_dedup_empty() {
        let (keys, arabic) = deduplicate_roots(&[], &[]);
        assert!(keys.is_empty());
        assert!(arabic.is_empty());
    }

    #[test]
    fn test_dedup_without_duplicates_is_identity() {
        let keys = strings(&["qwl", "Aly"]);
        let arabic = strings(&["قول", "ءلي"]);
        assert_eq!(deduplicate_roots(&keys, &arabic), (keys.clone(), arabic.clone()));
    }
}
