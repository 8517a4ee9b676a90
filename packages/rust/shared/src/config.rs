//! Application configuration for quizbook.
//!
//! Config lives at `./quizbook.toml` next to the corpus, or wherever
//! `--config` points. CLI flags override config file values, which
//! override defaults.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{QuizbookError, Result};
use crate::types::DEFAULT_LOCALE;

/// Default configuration file name.
pub const CONFIG_FILE_NAME: &str = "quizbook.toml";

/// Placeholder substituted with the question slug in `question_path`.
pub const SLUG_PLACEHOLDER: &str = "{slug}";

// ---------------------------------------------------------------------------
// Config structs (matching quizbook.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Where the corpus and README live.
    #[serde(default)]
    pub paths: PathsConfig,

    /// How question files are named.
    #[serde(default)]
    pub content: ContentConfig,

    /// Deep link construction.
    #[serde(default)]
    pub links: LinksConfig,

    /// Boilerplate rendered around each question.
    #[serde(default)]
    pub readme: ReadmeConfig,
}

/// `[paths]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Root directory holding one subdirectory per question.
    #[serde(default = "default_questions_dir")]
    pub questions_dir: PathBuf,

    /// README file whose sentinel regions are regenerated.
    #[serde(default = "default_readme")]
    pub readme: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            questions_dir: default_questions_dir(),
            readme: default_readme(),
        }
    }
}

fn default_questions_dir() -> PathBuf {
    PathBuf::from("questions")
}
fn default_readme() -> PathBuf {
    PathBuf::from("README.md")
}

/// `[content]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentConfig {
    /// Locale whose content file is loaded (`<locale>.<content_extension>`).
    #[serde(default = "default_locale")]
    pub locale: String,

    /// Metadata descriptor file name inside each question directory.
    #[serde(default = "default_metadata_file")]
    pub metadata_file: String,

    /// Extension of the localized content files.
    #[serde(default = "default_content_extension")]
    pub content_extension: String,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            locale: default_locale(),
            metadata_file: default_metadata_file(),
            content_extension: default_content_extension(),
        }
    }
}

fn default_locale() -> String {
    DEFAULT_LOCALE.into()
}
fn default_metadata_file() -> String {
    "metadata.json".into()
}
fn default_content_extension() -> String {
    "mdx".into()
}

/// `[links]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinksConfig {
    /// Base URL for deep links and for absolutizing root-relative links.
    #[serde(default = "default_site_url")]
    pub site_url: String,

    /// Path template for a question's page; must contain `{slug}`.
    #[serde(default = "default_question_path")]
    pub question_path: String,

    /// Fixed query parameters appended to every deep link (sorted by key).
    #[serde(default = "default_query")]
    pub query: BTreeMap<String, String>,
}

impl Default for LinksConfig {
    fn default() -> Self {
        Self {
            site_url: default_site_url(),
            question_path: default_question_path(),
            query: default_query(),
        }
    }
}

fn default_site_url() -> String {
    "https://www.greatfrontend.com".into()
}
fn default_question_path() -> String {
    "/questions/quiz/{slug}".into()
}
fn default_query() -> BTreeMap<String, String> {
    BTreeMap::from([
        ("framework".to_string(), "angular".to_string()),
        ("tab".to_string(), "quiz".to_string()),
    ])
}

/// `[readme]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadmeConfig {
    /// Site name shown in the call-to-action under each question.
    #[serde(default = "default_site_name")]
    pub site_name: String,

    /// Anchor the "back to top" links point at.
    #[serde(default = "default_back_to_top_anchor")]
    pub back_to_top_anchor: String,
}

impl Default for ReadmeConfig {
    fn default() -> Self {
        Self {
            site_name: default_site_name(),
            back_to_top_anchor: default_back_to_top_anchor(),
        }
    }
}

fn default_site_name() -> String {
    "GreatFrontEnd".into()
}
fn default_back_to_top_anchor() -> String {
    "table-of-contents".into()
}

impl AppConfig {
    /// Parsed `links.site_url`.
    pub fn site_url(&self) -> Result<Url> {
        Url::parse(&self.links.site_url).map_err(|e| {
            QuizbookError::validation(format!(
                "links.site_url {:?} is not an absolute URL: {e}",
                self.links.site_url
            ))
        })
    }

    /// Check values that serde cannot enforce.
    pub fn validate(&self) -> Result<()> {
        let site = self.site_url()?;
        if site.cannot_be_a_base() {
            return Err(QuizbookError::validation(format!(
                "links.site_url {:?} cannot be used as a base URL",
                self.links.site_url
            )));
        }
        if !self.links.question_path.contains(SLUG_PLACEHOLDER) {
            return Err(QuizbookError::validation(format!(
                "links.question_path {:?} must contain {SLUG_PLACEHOLDER}",
                self.links.question_path
            )));
        }
        if self.content.locale.trim().is_empty() {
            return Err(QuizbookError::validation("content.locale must not be empty"));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Load the config from `explicit` if given, else `./quizbook.toml` if it
/// exists, else defaults. An explicit path that does not exist is an error.
pub fn load_config(explicit: Option<&Path>) -> Result<AppConfig> {
    let config = match explicit {
        Some(path) => load_config_from(path)?,
        None => {
            let path = Path::new(CONFIG_FILE_NAME);
            if path.exists() {
                load_config_from(path)?
            } else {
                tracing::debug!(?path, "config file not found, using defaults");
                AppConfig::default()
            }
        }
    };

    config.validate()?;
    Ok(config)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| QuizbookError::io(path, e))?;

    toml::from_str(&content)
        .map_err(|e| QuizbookError::config(format!("failed to parse {}: {e}", path.display())))
}

/// Write a default config file into `dir`. Refuses to overwrite.
/// Returns the path to the created file.
pub fn init_config(dir: &Path) -> Result<PathBuf> {
    let path = dir.join(CONFIG_FILE_NAME);
    if path.exists() {
        return Err(QuizbookError::config(format!(
            "{} already exists",
            path.display()
        )));
    }

    let content = to_toml(&AppConfig::default())?;
    std::fs::write(&path, content).map_err(|e| QuizbookError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

/// Serialize a config to pretty TOML.
pub fn to_toml(config: &AppConfig) -> Result<String> {
    toml::to_string_pretty(config).map_err(|e| QuizbookError::config(e.to_string()))
}
