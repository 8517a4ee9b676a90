//! README writer.
//!
//! Replaces the text between paired sentinel comments of an existing README.
//! Everything outside the sentinel regions is preserved byte for byte.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, info, instrument};

use quizbook_shared::{QuizbookError, Result};

/// A README region delimited by `<!-- NAME:START -->` / `<!-- NAME:END -->`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    TableOfContents,
    Questions,
}

impl Region {
    pub const ALL: [Region; 2] = [Region::TableOfContents, Region::Questions];

    pub fn name(self) -> &'static str {
        match self {
            Region::TableOfContents => "TABLE_OF_CONTENTS",
            Region::Questions => "QUESTIONS",
        }
    }

    pub fn start_marker(self) -> String {
        format!("<!-- {}:START -->", self.name())
    }

    pub fn end_marker(self) -> String {
        format!("<!-- {}:END -->", self.name())
    }

    fn start_re(self) -> &'static Regex {
        static TOC: LazyLock<Regex> =
            LazyLock::new(|| marker_re(Region::TableOfContents, "START"));
        static QUESTIONS: LazyLock<Regex> =
            LazyLock::new(|| marker_re(Region::Questions, "START"));
        match self {
            Region::TableOfContents => &*TOC,
            Region::Questions => &*QUESTIONS,
        }
    }

    fn end_re(self) -> &'static Regex {
        static TOC: LazyLock<Regex> = LazyLock::new(|| marker_re(Region::TableOfContents, "END"));
        static QUESTIONS: LazyLock<Regex> = LazyLock::new(|| marker_re(Region::Questions, "END"));
        match self {
            Region::TableOfContents => &*TOC,
            Region::Questions => &*QUESTIONS,
        }
    }
}

/// Markers tolerate extra whitespace inside the comment.
fn marker_re(region: Region, edge: &str) -> Regex {
    Regex::new(&format!(r"<!--\s*{}:{edge}\s*-->", region.name())).expect("valid regex")
}

/// Result of writing the README.
#[derive(Debug, Clone)]
pub struct WriteOutcome {
    pub path: PathBuf,
    /// Whether the new content differs from what was on disk.
    pub changed: bool,
    pub bytes: usize,
}

/// Replace the text strictly between a region's markers with `content`.
///
/// Both markers must appear exactly once, start before end. Generated
/// content must not itself contain any sentinel marker.
pub fn replace_region(doc: &str, region: Region, content: &str) -> Result<String> {
    for other in Region::ALL {
        if other.start_re().is_match(content) || other.end_re().is_match(content) {
            return Err(QuizbookError::sentinel(
                other.start_marker(),
                format!("generated {} content contains a sentinel marker", region.name()),
            ));
        }
    }

    let start = find_unique(doc, region.start_re(), &region.start_marker())?;
    let end = find_unique(doc, region.end_re(), &region.end_marker())?;

    if end.start() < start.end() {
        return Err(QuizbookError::sentinel(
            region.end_marker(),
            format!("appears before {}", region.start_marker()),
        ));
    }

    let inner = if content.is_empty() {
        "\n".to_string()
    } else {
        format!("\n\n{content}\n\n")
    };

    Ok(format!(
        "{}{inner}{}",
        &doc[..start.end()],
        &doc[end.start()..]
    ))
}

fn find_unique<'d>(doc: &'d str, re: &Regex, marker: &str) -> Result<regex::Match<'d>> {
    let mut matches = re.find_iter(doc);
    let Some(first) = matches.next() else {
        return Err(QuizbookError::sentinel(marker, "not found"));
    };
    let extra = matches.count();
    if extra > 0 {
        return Err(QuizbookError::sentinel(
            marker,
            format!("found {} times, expected exactly once", extra + 1),
        ));
    }
    Ok(first)
}

/// Splice both generated blocks into a README document.
pub fn render_readme(doc: &str, toc: &str, questions: &str) -> Result<String> {
    let doc = replace_region(doc, Region::TableOfContents, toc)?;
    replace_region(&doc, Region::Questions, questions)
}

/// Read the README at `path`, splice in both blocks and write it back.
///
/// The write goes through a temp file and a rename, so a failure leaves the
/// original untouched.
#[instrument(skip(toc, questions), fields(path = %path.display()))]
pub fn write_readme(path: &Path, toc: &str, questions: &str) -> Result<WriteOutcome> {
    let current = std::fs::read_to_string(path).map_err(|e| QuizbookError::io(path, e))?;
    let updated = render_readme(&current, toc, questions)?;
    let changed = updated != current;

    replace_file(path, &updated)?;

    debug!(bytes = updated.len(), changed, "wrote README");
    info!(path = %path.display(), changed, "README updated");

    Ok(WriteOutcome {
        path: path.to_path_buf(),
        changed,
        bytes: updated.len(),
    })
}

/// Write `contents` to a temp file beside `path`, then rename it over `path`.
/// The temp file is removed if either step fails.
fn replace_file(path: &Path, contents: &str) -> Result<()> {
    let temp = temp_path(path);
    let written = std::fs::write(&temp, contents)
        .map_err(|e| QuizbookError::io(&temp, e))
        .and_then(|()| std::fs::rename(&temp, path).map_err(|e| QuizbookError::io(path, e)));

    if written.is_err() {
        let _ = std::fs::remove_file(&temp);
    }
    written
}

/// `.<name>.tmp` next to the target, so the rename stays on one filesystem.
fn temp_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "README.md".to_string());
    path.with_file_name(format!(".{name}.tmp"))
}

#[cfg(test)]
mod tests {
    use super::*;

    const README: &str = "# Questions\n\n## Table of Contents\n\n<!-- TABLE_OF_CONTENTS:START -->\nold toc\n<!-- TABLE_OF_CONTENTS:END -->\n\n<!-- QUESTIONS:START -->\nold questions\n<!-- QUESTIONS:END -->\n\nFooter\n";

    #[test]
    fn replace_region_swaps_inner_text_only() {
        let out = replace_region(README, Region::TableOfContents, "new toc").unwrap();
        assert!(out.contains("<!-- TABLE_OF_CONTENTS:START -->\n\nnew toc\n\n<!-- TABLE_OF_CONTENTS:END -->"));
        assert!(out.contains("old questions"));
        assert!(out.starts_with("# Questions\n"));
        assert!(out.ends_with("Footer\n"));
    }

    #[test]
    fn render_readme_is_idempotent() {
        let once = render_readme(README, "toc", "qs").unwrap();
        let twice = render_readme(&once, "toc", "qs").unwrap();
        assert_eq!(once, twice);
        assert!(!once.contains("old"));
    }

    #[test]
    fn empty_content_collapses_region() {
        let out = replace_region(README, Region::Questions, "").unwrap();
        assert!(out.contains("<!-- QUESTIONS:START -->\n<!-- QUESTIONS:END -->"));
    }

    #[test]
    fn markers_tolerate_inner_whitespace() {
        let doc = "<!--TABLE_OF_CONTENTS:START-->\nx\n<!--  TABLE_OF_CONTENTS:END  -->";
        let out = replace_region(doc, Region::TableOfContents, "y").unwrap();
        assert_eq!(out, "<!--TABLE_OF_CONTENTS:START-->\n\ny\n\n<!--  TABLE_OF_CONTENTS:END  -->");
    }

    #[test]
    fn missing_marker_is_an_error() {
        let doc = "<!-- QUESTIONS:START -->\n<!-- QUESTIONS:END -->";
        let err = replace_region(doc, Region::TableOfContents, "x").unwrap_err();
        assert!(err.to_string().contains("TABLE_OF_CONTENTS:START"));
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn duplicate_marker_is_an_error() {
        let doc = "<!-- QUESTIONS:START -->\n<!-- QUESTIONS:START -->\n<!-- QUESTIONS:END -->";
        let err = replace_region(doc, Region::Questions, "x").unwrap_err();
        assert!(err.to_string().contains("found 2 times"));
    }

    #[test]
    fn misordered_markers_are_an_error() {
        let doc = "<!-- QUESTIONS:END -->\n<!-- QUESTIONS:START -->";
        let err = replace_region(doc, Region::Questions, "x").unwrap_err();
        assert!(err.to_string().contains("appears before"));
    }

    #[test]
    fn content_with_marker_is_rejected() {
        let err = replace_region(README, Region::Questions, "<!-- QUESTIONS:END -->").unwrap_err();
        assert!(matches!(err, QuizbookError::Sentinel { .. }));
    }

    #[test]
    fn write_readme_reports_changes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("README.md");
        std::fs::write(&path, README).unwrap();

        let first = write_readme(&path, "toc", "qs").unwrap();
        assert!(first.changed);
        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(first.bytes, written.len());

        let second = write_readme(&path, "toc", "qs").unwrap();
        assert!(!second.changed);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), written);
        assert!(!dir.path().join(".README.md.tmp").exists());
    }

    #[test]
    fn write_readme_leaves_file_untouched_on_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("README.md");
        std::fs::write(&path, "no markers here\n").unwrap();

        assert!(write_readme(&path, "toc", "qs").is_err());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "no markers here\n");
    }

    #[test]
    fn failed_rename_removes_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("README.md");
        std::fs::create_dir_all(target.join("occupied")).unwrap();

        let err = replace_file(&target, "contents").unwrap_err();
        assert!(matches!(err, QuizbookError::Io { .. }));
        assert!(!dir.path().join(".README.md.tmp").exists());
        assert!(target.is_dir());
    }
}
