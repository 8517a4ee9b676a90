//! CLI command definitions, routing, and tracing setup.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use indicatif::{ProgressBar, ProgressStyle};
use quizbook_core::pipeline::{self, GenerateConfig, GenerateResult, ProgressReporter};
use quizbook_shared::{AppConfig, init_config, load_config, to_toml};
use tracing::info;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// quizbook: regenerate the question README from the question corpus.
#[derive(Parser)]
#[command(
    name = "quizbook",
    version,
    about = "Aggregate featured interview questions into a README table of contents.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file (defaults to ./quizbook.toml when present).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory holding one subdirectory per question.
    #[arg(long, global = true)]
    pub questions_dir: Option<PathBuf>,

    /// README file to regenerate.
    #[arg(long, global = true)]
    pub readme: Option<PathBuf>,

    /// Locale of the content files to read.
    #[arg(long, global = true)]
    pub locale: Option<String>,

    /// Defaults to `generate`.
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Rewrite the README table of contents and question sections.
    Generate,

    /// Exit non-zero if the README is not what `generate` would write.
    Check,

    /// List questions in ranking order.
    List {
        /// Include questions that are not featured.
        #[arg(long)]
        all: bool,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Write a default quizbook.toml in the current directory.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "quizbook=info",
        1 => "quizbook=debug",
        _ => "quizbook=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Config resolution
// ---------------------------------------------------------------------------

/// Load the config file and apply CLI overrides on top.
fn resolve_config(cli: &Cli) -> Result<AppConfig> {
    let mut config = load_config(cli.config.as_deref())?;

    if let Some(dir) = &cli.questions_dir {
        config.paths.questions_dir = dir.clone();
    }
    if let Some(readme) = &cli.readme {
        config.paths.readme = readme.clone();
    }
    if let Some(locale) = &cli.locale {
        config.content.locale = locale.clone();
    }

    config.validate()?;
    Ok(config)
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    match &cli.command {
        None | Some(Command::Generate) => cmd_generate(&cli).await,
        Some(Command::Check) => cmd_check(&cli).await,
        Some(Command::List { all }) => cmd_list(&cli, *all).await,
        Some(Command::Config { action }) => match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show => cmd_config_show(&cli),
        },
    }
}

async fn cmd_generate(cli: &Cli) -> Result<()> {
    let config = GenerateConfig::from_app_config(&resolve_config(cli)?)?;

    info!(
        questions_dir = %config.store.root.display(),
        readme = %config.readme_path.display(),
        locale = %config.store.locale,
        "generating README"
    );

    let reporter = CliProgress::new();
    let result = pipeline::generate(&config, &reporter).await;
    reporter.spinner.finish_and_clear();
    let result = result?;

    println!();
    println!("  README generated.");
    println!("  Questions: {}", result.question_count);
    println!(
        "  Changed:   {}",
        if result.changed { "yes" } else { "no" }
    );
    println!("  Path:      {}", result.readme_path.display());
    println!("  Time:      {:.1}s", result.elapsed.as_secs_f64());
    println!();

    Ok(())
}

async fn cmd_check(cli: &Cli) -> Result<()> {
    let config = GenerateConfig::from_app_config(&resolve_config(cli)?)?;

    let reporter = CliProgress::new();
    let result = pipeline::check(&config, &reporter).await;
    reporter.spinner.finish_and_clear();
    let result = result?;

    if !result.up_to_date {
        return Err(eyre!(
            "{} is out of date; run `quizbook generate`",
            result.readme_path.display()
        ));
    }

    println!(
        "{} is up to date ({} questions)",
        result.readme_path.display(),
        result.question_count
    );
    Ok(())
}

async fn cmd_list(cli: &Cli, all: bool) -> Result<()> {
    let config = GenerateConfig::from_app_config(&resolve_config(cli)?)?;

    let reporter = CliProgress::new();
    let metadata = pipeline::list_questions(&config, all, &reporter).await;
    reporter.spinner.finish_and_clear();
    let metadata = metadata?;

    println!("{:>8}  {:<9}  {:<9}  SLUG", "RANKING", "FEATURED", "PUBLISHED");
    for meta in &metadata {
        println!(
            "{:>8}  {:<9}  {:<9}  {}",
            meta.ranking, meta.featured, meta.published, meta.slug
        );
    }
    println!("\n{} question(s)", metadata.len());

    Ok(())
}

fn cmd_config_init() -> Result<()> {
    let cwd = std::env::current_dir()?;
    let path = init_config(&cwd)?;
    println!("Config file created at: {}", path.display());
    Ok(())
}

fn cmd_config_show(cli: &Cli) -> Result<()> {
    let config = resolve_config(cli)?;
    println!("{}", to_toml(&config)?);
    Ok(())
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]);
        spinner.set_style(style);
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn question_loaded(&self, current: usize, total: usize) {
        self.spinner
            .set_message(format!("Loading questions [{current}/{total}]"));
    }

    fn done(&self, _result: &GenerateResult) {
        self.spinner.finish_and_clear();
    }
}
