//! README formatter.
//!
//! Turns ranked questions into the table-of-contents block and the question
//! sections that the README writer splices between sentinel markers.

use std::path::Path;

use tracing::{debug, instrument};

use quizbook_markdown::{Slugger, indent, slugify};
use quizbook_shared::{AppConfig, Question};

/// Indentation that nests question bodies under their list item.
const BODY_INDENT: usize = 4;

/// Boilerplate shared by every question section.
#[derive(Debug, Clone)]
pub struct FormatOptions {
    /// Site name shown in the call-to-action.
    pub site_name: String,
    /// Site home page linked from the call-to-action.
    pub site_url: String,
    /// Anchor targeted by "back to top" links.
    pub back_to_top_anchor: String,
}

impl From<&AppConfig> for FormatOptions {
    fn from(config: &AppConfig) -> Self {
        Self {
            site_name: config.readme.site_name.clone(),
            site_url: config.links.site_url.clone(),
            back_to_top_anchor: config.readme.back_to_top_anchor.clone(),
        }
    }
}

/// A question paired with its in-page anchor.
#[derive(Debug, Clone)]
pub struct Entry<'a> {
    pub question: &'a Question,
    pub anchor: String,
}

/// Stable ascending sort by ranking; ties keep their current order.
pub fn sort_by_ranking(questions: &mut [Question]) {
    questions.sort_by(|a, b| a.ranking().total_cmp(&b.ranking()));
}

/// Assign anchors in the given order, so earlier questions win collisions.
///
/// Titles that slugify to nothing (all punctuation) are anchored by the
/// question slug instead.
pub fn assign_anchors<'a>(questions: &'a [Question], slugger: &mut Slugger) -> Vec<Entry<'a>> {
    questions
        .iter()
        .map(|question| {
            let source = if slugify(&question.title).is_empty() {
                question.slug()
            } else {
                question.title.as_str()
            };
            Entry {
                anchor: slugger.slug(source),
                question,
            }
        })
        .collect()
}

/// Markdown table linking each question's number and title to its anchor.
#[instrument(skip_all, fields(count = entries.len()))]
pub fn format_table_of_contents(entries: &[Entry<'_>]) -> String {
    let mut md = String::from("| No. | Questions |\n| --- | :-- |\n");

    for (i, entry) in entries.iter().enumerate() {
        md.push_str(&format!(
            "| {} | [{}](#{}) |\n",
            i + 1,
            escape_table_cell(&entry.question.title),
            entry.anchor
        ));
    }

    md.truncate(md.trim_end_matches('\n').len());
    md
}

/// All question sections, separated by blank lines.
#[instrument(skip_all, fields(count = entries.len()))]
pub fn format_questions(entries: &[Entry<'_>], opts: &FormatOptions) -> String {
    let sections: Vec<String> = entries
        .iter()
        .enumerate()
        .map(|(i, entry)| format_question(i + 1, entry.question, opts))
        .collect();

    debug!(sections = sections.len(), "formatted question sections");
    sections.join("\n\n")
}

/// One question section: numbered heading, provenance markers around the
/// indented excerpt, call-to-action and a link back to the top.
pub fn format_question(number: usize, question: &Question, opts: &FormatOptions) -> String {
    let pad = " ".repeat(BODY_INDENT);
    let provenance = format!(
        "{pad}<!-- Update here: /{} -->",
        display_path(&question.source_path)
    );
    let body = indent(&question.content, BODY_INDENT);

    let mut md = String::new();
    md.push_str(&format!("{number}. ### {}\n\n", question.title));
    md.push_str(&provenance);
    md.push_str("\n\n");
    md.push_str(&body);
    md.push_str("\n\n");
    md.push_str(&provenance);
    md.push_str("\n\n");
    md.push_str(&format!("{pad}<br>\n\n"));
    md.push_str(&format!(
        "{pad}> Read the [detailed answer]({}) on [{}]({}) which allows progress tracking, contains more code samples, and useful resources.\n\n",
        question.href, opts.site_name, opts.site_url
    ));
    md.push_str(&format!(
        "{pad}[Back to top ↑](#{})\n\n",
        opts.back_to_top_anchor
    ));
    md.push_str(&format!("{pad}<br>"));
    md
}

/// Forward-slash path regardless of platform.
fn display_path(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

fn escape_table_cell(text: &str) -> String {
    text.replace('|', "\\|")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
