//! Category catalog shared by every component that lists categories.

use std::collections::BTreeSet;

/// Categories offered even before any blog uses them.
pub const DEFAULT_CATEGORIES: [&str; 6] = [
    "Design",
    "Research",
    "Presentation",
    "Product",
    "Leadership",
    "Technology",
];

/// Sorted, de-duplicated union of the defaults and the categories in use.
pub fn merge_categories<I, S>(in_use: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut merged: BTreeSet<String> = DEFAULT_CATEGORIES.iter().map(|c| c.to_string()).collect();
    merged.extend(
        in_use
            .into_iter()
            .map(|c| c.as_ref().trim().to_string())
            .filter(|c| !c.is_empty()),
    );
    merged.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_keeps_defaults_sorted() {
        let merged = merge_categories(Vec::<String>::new());
        assert_eq!(
            merged,
            vec![
                "Design",
                "Leadership",
                "Presentation",
                "Product",
                "Research",
                "Technology"
            ]
        );
    }

    #[test]
    fn test_merge_adds_used_categories_once() {
        let merged = merge_categories(["Travel", "Design", "Travel", " "]);
        assert_eq!(merged.len(), DEFAULT_CATEGORIES.len() + 1);
        assert!(merged.contains(&"Travel".to_string()));
    }
}
