//! Question loader: one directory in, one normalized [`Question`] (or a skip) out.

use std::path::{Component, Path, PathBuf};

use tracing::{debug, instrument, warn};

use quizbook_markdown::{extract_tldr, has_nested_heading, parse_document, sanitize_excerpt};
use quizbook_shared::{AppConfig, Question, QuestionMetadata, QuizbookError, Result};

use crate::links::LinkBuilder;

/// Where question directories live and how their files are named.
#[derive(Debug, Clone)]
pub struct QuestionStore {
    /// Directory holding one subdirectory per question.
    pub root: PathBuf,
    /// Root as shown in provenance markers (`<label>/<slug>/<locale>.mdx`).
    pub label: PathBuf,
    /// Locale whose content file is loaded.
    pub locale: String,
    /// Metadata file name inside each question directory.
    pub metadata_file: String,
    /// Extension of localized content files.
    pub content_extension: String,
    /// Deep link construction.
    pub links: LinkBuilder,
}

impl QuestionStore {
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let root = config.paths.questions_dir.clone();
        Ok(Self {
            label: display_label(&root),
            root,
            locale: config.content.locale.clone(),
            metadata_file: config.content.metadata_file.clone(),
            content_extension: config.content.content_extension.clone(),
            links: LinkBuilder::from_config(config)?,
        })
    }

    pub fn metadata_path(&self, dir_name: &str) -> PathBuf {
        self.root.join(dir_name).join(&self.metadata_file)
    }

    pub fn content_path(&self, dir_name: &str) -> PathBuf {
        self.root.join(dir_name).join(self.content_file_name())
    }

    fn content_file_name(&self) -> String {
        format!("{}.{}", self.locale, self.content_extension)
    }
}

/// Relative roots are shown as configured; absolute ones by their last component.
fn display_label(root: &Path) -> PathBuf {
    if root.is_relative() {
        root.components()
            .filter(|c| !matches!(c, Component::CurDir))
            .collect()
    } else {
        root.file_name().map(PathBuf::from).unwrap_or_default()
    }
}

/// Read and parse a question's metadata, checking it against its directory.
pub async fn read_metadata(store: &QuestionStore, dir_name: &str) -> Result<QuestionMetadata> {
    let path = store.metadata_path(dir_name);
    let raw = tokio::fs::read_to_string(&path)
        .await
        .map_err(|e| QuizbookError::io(&path, e))?;

    let metadata: QuestionMetadata = serde_json::from_str(&raw)
        .map_err(|e| QuizbookError::parse(format!("{}: {e}", path.display())))?;

    if metadata.slug != dir_name {
        return Err(QuizbookError::Consistency {
            directory: dir_name.to_string(),
            declared: metadata.slug,
        });
    }

    Ok(metadata)
}

/// Load one question for the store's locale.
///
/// Returns `Ok(None)` for questions that should be left out of the README:
/// not featured, no title, or no TL;DR excerpt. Missing or malformed files,
/// a slug that disagrees with the directory, and an excerpt containing a
/// sub-heading are errors.
#[instrument(skip(store), fields(locale = %store.locale))]
pub async fn load_question(store: &QuestionStore, dir_name: &str) -> Result<Option<Question>> {
    let content_path = store.content_path(dir_name);
    let (metadata, source) = tokio::try_join!(read_metadata(store, dir_name), async {
        tokio::fs::read_to_string(&content_path)
            .await
            .map_err(|e| QuizbookError::io(&content_path, e))
    })?;

    if !metadata.featured {
        debug!("not featured, skipping");
        return Ok(None);
    }

    let document = parse_document(&source).map_err(|e| with_path(e, &content_path))?;

    let Some(title) = document.title() else {
        warn!(path = %content_path.display(), "question has no title, skipping");
        return Ok(None);
    };

    let Some(excerpt) = extract_tldr(document.body) else {
        debug!(path = %content_path.display(), "no TL;DR excerpt, skipping");
        return Ok(None);
    };

    if has_nested_heading(excerpt) {
        return Err(QuizbookError::content_structure(
            &content_path,
            "TL;DR excerpt contains a nested heading (###)",
        ));
    }

    let question = Question {
        locale: store.locale.clone(),
        href: store.links.question_href(&metadata.slug),
        title: title.to_string(),
        content: sanitize_excerpt(excerpt, store.links.site_url()),
        source_path: store
            .label
            .join(dir_name)
            .join(store.content_file_name()),
        metadata,
    };

    debug!(slug = %question.slug(), ranking = question.ranking(), "loaded question");
    Ok(Some(question))
}

/// Prefix parse errors with the file they came from.
fn with_path(err: QuizbookError, path: &Path) -> QuizbookError {
    match err {
        QuizbookError::Parse { message } => {
            QuizbookError::parse(format!("{}: {message}", path.display()))
        }
        other => other,
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Write a question directory under `root`.
    pub(crate) fn write_question(root: &Path, dir: &str, metadata: &str, content: Option<&str>) {
        let qdir = root.join(dir);
        std::fs::create_dir_all(&qdir).unwrap();
        std::fs::write(qdir.join("metadata.json"), metadata).unwrap();
        if let Some(content) = content {
            std::fs::write(qdir.join("en-US.mdx"), content).unwrap();
        }
    }

    pub(crate) fn store_at(root: &Path) -> QuestionStore {
        let mut config = AppConfig::default();
        config.paths.questions_dir = root.to_path_buf();
        QuestionStore::from_config(&config).unwrap()
    }

    #[tokio::test]
    async fn loads_featured_question() {
        let dir = tempfile::tempdir().unwrap();
        write_question(
            dir.path(),
            "foo",
            r#"{"slug": "foo", "featured": true, "ranking": 2}"#,
            Some("---\ntitle: Title Slug\n---\n\n## TL;DR\n\nShort answer.\n---\n\nLong answer.\n"),
        );

        let question = load_question(&store_at(dir.path()), "foo")
            .await
            .unwrap()
            .expect("featured question loads");

        assert_eq!(question.title, "Title Slug");
        assert_eq!(question.content, "Short answer.");
        assert_eq!(question.locale, "en-US");
        assert_eq!(
            question.href,
            "https://www.greatfrontend.com/questions/quiz/foo?framework=angular&tab=quiz"
        );
        let label = dir.path().file_name().unwrap();
        assert_eq!(question.source_path, Path::new(label).join("foo/en-US.mdx"));
    }

    #[tokio::test]
    async fn not_featured_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        write_question(
            dir.path(),
            "foo",
            r#"{"slug": "foo", "featured": false, "ranking": 1}"#,
            Some("---\ntitle: T\n---\n## TL;DR\n\nA.\n---\n"),
        );
        assert!(load_question(&store_at(dir.path()), "foo").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn missing_title_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        write_question(
            dir.path(),
            "foo",
            r#"{"slug": "foo", "featured": true, "ranking": 1}"#,
            Some("---\nsubtitle: none\n---\n## TL;DR\n\nA.\n---\n"),
        );
        assert!(load_question(&store_at(dir.path()), "foo").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn missing_tldr_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        write_question(
            dir.path(),
            "foo",
            r#"{"slug": "foo", "featured": true, "ranking": 1}"#,
            Some("---\ntitle: T\n---\n## Answer\n\nNo summary here.\n"),
        );
        assert!(load_question(&store_at(dir.path()), "foo").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn nested_heading_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        write_question(
            dir.path(),
            "foo",
            r#"{"slug": "foo", "featured": true, "ranking": 1}"#,
            Some("---\ntitle: T\n---\n## TL;DR\n\nA.\n\n### Oops\n\nB.\n---\n"),
        );
        let err = load_question(&store_at(dir.path()), "foo").await.unwrap_err();
        assert!(matches!(err, QuizbookError::ContentStructure { .. }));
    }

    #[tokio::test]
    async fn slug_mismatch_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        write_question(
            dir.path(),
            "bar",
            r#"{"slug": "baz", "featured": true, "ranking": 1}"#,
            Some("---\ntitle: T\n---\n## TL;DR\n\nA.\n---\n"),
        );
        let err = load_question(&store_at(dir.path()), "bar").await.unwrap_err();
        match err {
            QuizbookError::Consistency {
                directory,
                declared,
            } => {
                assert_eq!(directory, "bar");
                assert_eq!(declared, "baz");
            }
            other => panic!("expected consistency error, got {other}"),
        }
    }

    #[tokio::test]
    async fn missing_content_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        write_question(
            dir.path(),
            "foo",
            r#"{"slug": "foo", "featured": false, "ranking": 1}"#,
            None,
        );
        let err = load_question(&store_at(dir.path()), "foo").await.unwrap_err();
        assert!(matches!(err, QuizbookError::Io { .. }));
    }

    #[tokio::test]
    async fn malformed_metadata_names_the_file() {
        let dir = tempfile::tempdir().unwrap();
        write_question(dir.path(), "foo", "{not json", Some("---\ntitle: T\n---\n"));
        let err = load_question(&store_at(dir.path()), "foo").await.unwrap_err();
        assert!(matches!(err, QuizbookError::Parse { .. }));
        assert!(err.to_string().contains("metadata.json"));
    }

    #[tokio::test]
    async fn relative_links_become_absolute() {
        let dir = tempfile::tempdir().unwrap();
        write_question(
            dir.path(),
            "foo",
            r#"{"slug": "foo", "featured": true, "ranking": 1}"#,
            Some(
                "---\ntitle: T\n---\n## TL;DR\n\nSee [pipes](/questions/quiz/pipes) and [docs](https://angular.dev).\n---\n",
            ),
        );
        let question = load_question(&store_at(dir.path()), "foo").await.unwrap().unwrap();
        assert_eq!(
            question.content,
            "See [pipes](https://www.greatfrontend.com/questions/quiz/pipes) and [docs](https://angular.dev)."
        );
    }

    #[test]
    fn display_label_keeps_relative_roots() {
        assert_eq!(display_label(Path::new("./questions")), PathBuf::from("questions"));
        assert_eq!(display_label(Path::new("content/questions")), PathBuf::from("content/questions"));
        assert_eq!(display_label(Path::new("/srv/repo/questions")), PathBuf::from("questions"));
    }
}
