//! Corpus loader: enumerate question directories and load them concurrently.

use std::future::Future;
use std::path::Path;
use std::sync::Arc;

use tokio::task::JoinSet;
use tracing::{debug, info, instrument, warn};

use quizbook_shared::{Question, QuestionMetadata, QuizbookError, Result};

use crate::loader::{self, QuestionStore};
use crate::pipeline::ProgressReporter;

/// List question directory names under `root`, sorted by name.
///
/// Files, hidden entries and non-UTF-8 names are ignored.
pub async fn list_question_dirs(root: &Path) -> Result<Vec<String>> {
    let mut entries = tokio::fs::read_dir(root)
        .await
        .map_err(|e| QuizbookError::io(root, e))?;

    let mut dirs = Vec::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| QuizbookError::io(root, e))?
    {
        let file_type = entry
            .file_type()
            .await
            .map_err(|e| QuizbookError::io(entry.path(), e))?;
        if !file_type.is_dir() {
            continue;
        }

        match entry.file_name().into_string() {
            Ok(name) if name.starts_with('.') => {}
            Ok(name) => dirs.push(name),
            Err(name) => warn!(?name, "skipping non UTF-8 directory name"),
        }
    }

    dirs.sort();
    Ok(dirs)
}

/// Load every featured question in the store.
///
/// Questions are loaded concurrently; the first error aborts the remaining
/// loads. Skipped questions are dropped and the survivors are returned in
/// directory order.
#[instrument(skip_all, fields(root = %store.root.display()))]
pub async fn load_corpus(
    store: &QuestionStore,
    progress: &dyn ProgressReporter,
) -> Result<Vec<Question>> {
    let dirs = list_question_dirs(&store.root).await?;
    let total = dirs.len();
    let store = Arc::new(store.clone());

    let loaded = load_each(dirs, progress, |dir| {
        let store = Arc::clone(&store);
        async move { loader::load_question(&store, &dir).await }
    })
    .await?;

    let questions: Vec<Question> = loaded.into_iter().flatten().collect();
    info!(
        directories = total,
        featured = questions.len(),
        "corpus loaded"
    );
    Ok(questions)
}

/// Read every question's metadata, featured or not.
#[instrument(skip_all, fields(root = %store.root.display()))]
pub async fn load_all_metadata(
    store: &QuestionStore,
    progress: &dyn ProgressReporter,
) -> Result<Vec<QuestionMetadata>> {
    let dirs = list_question_dirs(&store.root).await?;
    let store = Arc::new(store.clone());

    load_each(dirs, progress, |dir| {
        let store = Arc::clone(&store);
        async move { loader::read_metadata(&store, &dir).await }
    })
    .await
}

/// Run `load` for every directory concurrently, fail-fast, keeping input order.
async fn load_each<T, F, Fut>(
    dirs: Vec<String>,
    progress: &dyn ProgressReporter,
    load: F,
) -> Result<Vec<T>>
where
    T: Send + 'static,
    F: Fn(String) -> Fut,
    Fut: Future<Output = Result<T>> + Send + 'static,
{
    let total = dirs.len();
    let mut join_set = JoinSet::new();

    for (index, dir) in dirs.into_iter().enumerate() {
        let fut = load(dir);
        join_set.spawn(async move { (index, fut.await) });
    }

    let mut slots: Vec<Option<T>> = (0..total).map(|_| None).collect();
    let mut done = 0;

    while let Some(joined) = join_set.join_next().await {
        let (index, result) = joined.map_err(|e| QuizbookError::Task(e.to_string()))?;
        match result {
            Ok(value) => {
                slots[index] = Some(value);
                done += 1;
                progress.question_loaded(done, total);
            }
            Err(e) => {
                debug!(error = %e, "load failed, aborting remaining tasks");
                join_set.abort_all();
                return Err(e);
            }
        }
    }

    Ok(slots.into_iter().flatten().collect())
}
