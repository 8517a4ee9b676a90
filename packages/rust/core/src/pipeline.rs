//! End-to-end `generate` pipeline: question store → load → rank → format → README.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use tracing::{info, instrument};

use quizbook_markdown::Slugger;
use quizbook_shared::{AppConfig, QuestionMetadata, QuizbookError, Result};

use crate::corpus;
use crate::format::{self, FormatOptions};
use crate::loader::QuestionStore;
use crate::readme;

/// Configuration for the pipeline, resolved from [`AppConfig`].
#[derive(Debug, Clone)]
pub struct GenerateConfig {
    /// Question corpus.
    pub store: QuestionStore,
    /// README whose sentinel regions are regenerated.
    pub readme_path: PathBuf,
    /// Boilerplate for question sections.
    pub format: FormatOptions,
}

impl GenerateConfig {
    pub fn from_app_config(config: &AppConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            store: QuestionStore::from_config(config)?,
            readme_path: config.paths.readme.clone(),
            format: FormatOptions::from(config),
        })
    }
}

/// The two generated README blocks.
#[derive(Debug, Clone)]
pub struct Sections {
    pub question_count: usize,
    pub table_of_contents: String,
    pub questions: String,
}

/// Result of [`generate`].
#[derive(Debug)]
pub struct GenerateResult {
    pub readme_path: PathBuf,
    /// Number of featured questions written.
    pub question_count: usize,
    /// Whether the README content changed.
    pub changed: bool,
    pub elapsed: Duration,
}

/// Result of [`check`].
#[derive(Debug)]
pub struct CheckResult {
    pub readme_path: PathBuf,
    pub question_count: usize,
    /// Whether the README already matches what [`generate`] would write.
    pub up_to_date: bool,
}

/// Progress callback for reporting pipeline status.
pub trait ProgressReporter: Send + Sync {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called each time a question directory finishes loading.
    fn question_loaded(&self, current: usize, total: usize);
    /// Called when the pipeline completes.
    fn done(&self, result: &GenerateResult);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn question_loaded(&self, _current: usize, _total: usize) {}
    fn done(&self, _result: &GenerateResult) {}
}

/// Load, rank and format the corpus without touching the README.
#[instrument(skip_all, fields(root = %config.store.root.display()))]
pub async fn build_sections(
    config: &GenerateConfig,
    progress: &dyn ProgressReporter,
) -> Result<Sections> {
    progress.phase("Loading questions");
    let mut questions = corpus::load_corpus(&config.store, progress).await?;

    progress.phase("Formatting README sections");
    format::sort_by_ranking(&mut questions);
    let entries = format::assign_anchors(&questions, &mut Slugger::new());

    Ok(Sections {
        question_count: entries.len(),
        table_of_contents: format::format_table_of_contents(&entries),
        questions: format::format_questions(&entries, &config.format),
    })
}

/// Run the full pipeline and rewrite the README in place.
///
/// Any load, format or sentinel error aborts before the README is written.
#[instrument(skip_all, fields(readme = %config.readme_path.display()))]
pub async fn generate(
    config: &GenerateConfig,
    progress: &dyn ProgressReporter,
) -> Result<GenerateResult> {
    let start = Instant::now();
    info!("starting generate pipeline");

    let sections = build_sections(config, progress).await?;

    progress.phase("Writing README");
    let outcome = readme::write_readme(
        &config.readme_path,
        &sections.table_of_contents,
        &sections.questions,
    )?;

    let result = GenerateResult {
        readme_path: outcome.path,
        question_count: sections.question_count,
        changed: outcome.changed,
        elapsed: start.elapsed(),
    };

    info!(
        questions = result.question_count,
        changed = result.changed,
        elapsed_ms = result.elapsed.as_millis() as u64,
        "generate pipeline complete"
    );
    progress.done(&result);

    Ok(result)
}

/// Render the README in memory and compare it with the file on disk.
#[instrument(skip_all, fields(readme = %config.readme_path.display()))]
pub async fn check(config: &GenerateConfig, progress: &dyn ProgressReporter) -> Result<CheckResult> {
    let sections = build_sections(config, progress).await?;

    progress.phase("Comparing README");
    let current = std::fs::read_to_string(&config.readme_path)
        .map_err(|e| QuizbookError::io(&config.readme_path, e))?;
    let rendered =
        readme::render_readme(&current, &sections.table_of_contents, &sections.questions)?;

    let up_to_date = rendered == current;
    info!(up_to_date, "README check complete");

    Ok(CheckResult {
        readme_path: config.readme_path.clone(),
        question_count: sections.question_count,
        up_to_date,
    })
}

/// Metadata of every question (or only featured ones), in ranking order.
#[instrument(skip_all, fields(all = all))]
pub async fn list_questions(
    config: &GenerateConfig,
    all: bool,
    progress: &dyn ProgressReporter,
) -> Result<Vec<QuestionMetadata>> {
    progress.phase("Reading metadata");
    let mut metadata = corpus::load_all_metadata(&config.store, progress).await?;
    if !all {
        metadata.retain(|m| m.featured);
    }
    metadata.sort_by(|a, b| a.ranking.total_cmp(&b.ranking));
    Ok(metadata)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
