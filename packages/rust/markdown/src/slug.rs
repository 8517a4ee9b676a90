//! GitHub-compatible heading slugs.

use std::collections::HashMap;

/// Convert a heading title into the anchor GitHub generates for it.
///
/// Lowercases, drops everything except alphanumerics, `-`, `_` and spaces,
/// then turns each space into `-`.
pub fn slugify(title: &str) -> String {
    title
        .trim()
        .to_lowercase()
        .chars()
        .filter_map(|c| match c {
            ' ' => Some('-'),
            '-' | '_' => Some(c),
            c if c.is_alphanumeric() => Some(c),
            _ => None,
        })
        .collect()
}

/// Registry that hands out unique slugs within one document.
///
/// Collisions get a numeric suffix (`-1`, `-2`, ...) in first-seen order,
/// so callers must feed titles in the order they will appear.
#[derive(Debug, Default)]
pub struct Slugger {
    occurrences: HashMap<String, usize>,
}

impl Slugger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Slug for `title`, unique among all slugs issued so far.
    pub fn slug(&mut self, title: &str) -> String {
        let original = slugify(title);
        let mut slug = original.clone();

        while self.occurrences.contains_key(&slug) {
            let n = {
                let count = self.occurrences.entry(original.clone()).or_insert(0);
                *count += 1;
                *count
            };
            slug = format!("{original}-{n}");
        }

        self.occurrences.insert(slug.clone(), 0);
        slug
    }
}
