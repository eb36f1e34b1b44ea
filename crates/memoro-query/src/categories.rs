//! Category picker vocabulary construction.

use memoro_types::{ALL_CATEGORY, DEFAULT_CATEGORIES};

/// Build the category picker list from the categories present in storage.
///
/// Order is the display order and must stay stable: the "All" sentinel
/// first, then the stored categories as given, then any predefined default
/// not already present, deduplicated on first occurrence.
pub fn build_category_list(stored: &[String]) -> Vec<String> {
    let mut list: Vec<String> = Vec::with_capacity(1 + stored.len() + DEFAULT_CATEGORIES.len());
    list.push(ALL_CATEGORY.to_string());
    list.extend(stored.iter().cloned());

    for default in DEFAULT_CATEGORIES {
        if !list.iter().any(|c| c == default) {
            list.push(default.to_string());
        }
    }

    let mut seen = std::collections::HashSet::new();
    list.retain(|c| seen.insert(c.clone()));
    list
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stored(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn all_is_always_first() {
        let list = build_category_list(&stored(&["Work", "Zoo"]));
        assert_eq!(list[0], "All");
    }

    #[test]
    fn stored_categories_precede_missing_defaults() {
        let list = build_category_list(&stored(&["Zoo", "Work"]));
        // Stored order is preserved verbatim, defaults appended after.
        assert_eq!(&list[..3], &["All", "Zoo", "Work"]);
        assert!(list.iter().position(|c| c == "Default").unwrap() > 2);
    }

    #[test]
    fn defaults_appended_only_when_absent() {
        let list = build_category_list(&stored(&["Work"]));
        assert_eq!(list.iter().filter(|c| *c == "Work").count(), 1);
        assert!(list.contains(&"Shopping".to_string()));
    }

    #[test]
    fn empty_storage_yields_all_plus_defaults() {
        let list = build_category_list(&[]);
        let mut expected = vec!["All".to_string()];
        expected.extend(memoro_types::DEFAULT_CATEGORIES.iter().map(|s| s.to_string()));
        assert_eq!(list, expected);
    }

    #[test]
    fn construction_is_idempotent_and_order_stable() {
        let input = stored(&["Ideas", "Work", "Default"]);
        let first = build_category_list(&input);
        let second = build_category_list(&input);
        assert_eq!(first, second);
    }
}
