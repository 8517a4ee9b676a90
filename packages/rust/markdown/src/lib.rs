//! Markdown/MDX helpers for question content.
//!
//! Splits YAML front-matter from the body, extracts the `## TL;DR` excerpt,
//! and cleans excerpts up for embedding in a README. Heading anchors are
//! produced by [`Slugger`].

mod cleanup;
mod slug;

use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;
use tracing::{debug, instrument};

use quizbook_shared::{QuizbookError, Result};

pub use cleanup::{absolutize_links, indent, sanitize_excerpt};
pub use slug::{Slugger, slugify};

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// Front-matter fields the generator reads. Other keys are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FrontMatter {
    #[serde(default)]
    pub title: Option<String>,
}

/// A content file split into front-matter and body.
#[derive(Debug, Clone)]
pub struct Document<'a> {
    pub front_matter: FrontMatter,
    /// Everything after the closing front-matter delimiter.
    pub body: &'a str,
}

impl Document<'_> {
    /// The trimmed title, or `None` if absent or blank.
    pub fn title(&self) -> Option<&str> {
        self.front_matter
            .title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }
}

// ---------------------------------------------------------------------------
// Front-matter
// ---------------------------------------------------------------------------

/// Parse a content file. A file without a `---` front-matter block parses
/// with an empty [`FrontMatter`]; malformed YAML is an error.
#[instrument(skip(source), fields(len = source.len()))]
pub fn parse_document(source: &str) -> Result<Document<'_>> {
    let source = source.strip_prefix('\u{feff}').unwrap_or(source);

    let Some((yaml, body)) = split_front_matter(source) else {
        debug!("no front-matter block");
        return Ok(Document {
            front_matter: FrontMatter::default(),
            body: source,
        });
    };

    let front_matter = if yaml.trim().is_empty() {
        FrontMatter::default()
    } else {
        serde_yaml::from_str(yaml)
            .map_err(|e| QuizbookError::parse(format!("invalid front-matter: {e}")))?
    };

    Ok(Document { front_matter, body })
}

/// Split `---\n<yaml>\n---\n<body>` into its YAML and body parts.
fn split_front_matter(source: &str) -> Option<(&str, &str)> {
    let mut lines = source.split_inclusive('\n');
    let first = lines.next()?;
    if first.trim_end() != "---" {
        return None;
    }

    let yaml_start = first.len();
    let mut offset = yaml_start;
    for line in lines {
        if line.trim_end() == "---" {
            return Some((&source[yaml_start..offset], &source[offset + line.len()..]));
        }
        offset += line.len();
    }

    None
}

// ---------------------------------------------------------------------------
// TL;DR excerpt
// ---------------------------------------------------------------------------

/// Extract the raw TL;DR excerpt from a document body.
///
/// Matches the first `## TL;DR` followed by a blank line and captures,
/// non-greedily, everything up to the next line that is exactly `---`.
/// This is a textual heuristic: a CommonMark parser would read
/// `text\n---` as a setext heading and lose the boundary.
///
/// Returns `None` when there is no such span or it is blank.
pub fn extract_tldr(body: &str) -> Option<&str> {
    static TLDR_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"(?s)## TL;DR[ \t]*\r?\n[ \t]*\r?\n(.*?)\r?\n---[ \t]*(?:\r?\n|$)")
            .expect("valid regex")
    });

    let excerpt = TLDR_RE.captures(body)?.get(1)?.as_str();
    if excerpt.trim().is_empty() {
        return None;
    }
    Some(excerpt)
}

/// Whether an excerpt contains a sub-heading, meaning the excerpt boundary
/// captured more than the summary.
pub fn has_nested_heading(excerpt: &str) -> bool {
    excerpt.contains("###")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
