//! Core domain types for the question corpus.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Locale used when none is configured.
pub const DEFAULT_LOCALE: &str = "en-US";

// ---------------------------------------------------------------------------
// QuestionMetadata
// ---------------------------------------------------------------------------

/// The `metadata.json` descriptor stored in each question directory.
///
/// Unknown keys are ignored so hand-authored descriptors can carry extra
/// fields consumed by other tooling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionMetadata {
    /// Unique identifier; must equal the containing directory name.
    pub slug: String,
    /// Whether the question is included in the generated README.
    #[serde(default)]
    pub featured: bool,
    /// Ascending sort key for README ordering.
    pub ranking: f64,
    /// Whether the answer has been published (maintained by the sync step).
    #[serde(default)]
    pub published: bool,
}

// ---------------------------------------------------------------------------
// Question
// ---------------------------------------------------------------------------

/// A featured question, normalized and ready for formatting.
///
/// Built fresh on every run; discarded once the README is written.
#[derive(Debug, Clone, PartialEq)]
pub struct Question {
    /// Locale the content was loaded for.
    pub locale: String,
    /// Descriptor the question was loaded from.
    pub metadata: QuestionMetadata,
    /// Deep link to the full answer on the site.
    pub href: String,
    /// Title from the content front-matter.
    pub title: String,
    /// TL;DR excerpt with root-relative links made absolute.
    pub content: String,
    /// Path of the content file relative to the repository root.
    pub source_path: PathBuf,
}

impl Question {
    pub fn ranking(&self) -> f64 {
        self.metadata.ranking
    }

    pub fn slug(&self) -> &str {
        &self.metadata.slug
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metadata_defaults_flags_to_false() {
        let meta: QuestionMetadata =
            serde_json::from_str(r#"{"slug": "foo", "ranking": 3}"#).expect("parse metadata");
        assert_eq!(meta.slug, "foo");
        assert!(!meta.featured);
        assert!(!meta.published);
        assert_eq!(meta.ranking, 3.0);
    }

    #[test]
    fn metadata_ignores_unknown_keys() {
        let meta: QuestionMetadata = serde_json::from_str(
            r#"{"slug": "foo", "featured": true, "ranking": 1.5, "published": true, "difficulty": "easy"}"#,
        )
        .expect("parse metadata");
        assert!(meta.featured);
        assert!(meta.published);
        assert_eq!(meta.ranking, 1.5);
    }

    #[test]
    fn metadata_requires_slug_and_ranking() {
        assert!(serde_json::from_str::<QuestionMetadata>(r#"{"featured": true}"#).is_err());
        assert!(serde_json::from_str::<QuestionMetadata>(r#"{"slug": "x"}"#).is_err());
    }

    #[test]
    fn metadata_fixture_validates() {
        let fixture = std::fs::read_to_string(
            "../../../fixtures/questions/what-is-angular/metadata.json",
        )
        .expect("read fixture");
        let parsed: QuestionMetadata = serde_json::from_str(&fixture).expect("deserialize fixture");
        assert_eq!(parsed.slug, "what-is-angular");
        assert!(parsed.featured);
    }
}
