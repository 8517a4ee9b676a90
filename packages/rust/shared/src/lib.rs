//! Shared types, error model, and configuration for quizbook.
//!
//! This crate is the foundation depended on by all other quizbook crates.
//! It provides:
//! - [`QuizbookError`]: the unified error type
//! - Domain types ([`QuestionMetadata`], [`Question`])
//! - Configuration ([`AppConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, CONFIG_FILE_NAME, ContentConfig, LinksConfig, PathsConfig, ReadmeConfig,
    SLUG_PLACEHOLDER, init_config, load_config, load_config_from, to_toml,
};
pub use error::{QuizbookError, Result};
pub use types::{DEFAULT_LOCALE, Question, QuestionMetadata};
