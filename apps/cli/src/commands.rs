//! CLI command definitions, routing, and tracing setup.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use docpress_core::pipeline::{ConvertConfig, ConvertResult, ProgressReporter};
use docpress_shared::{AppConfig, init_config, load_config, load_config_from};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// docpress — convert exported site-content documents into a static-site bundle.
#[derive(Parser)]
#[command(
    name = "docpress",
    version,
    about = "Convert exported .docx site content into a static-site content bundle.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
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
    /// Convert a .docx document into a content bundle.
    Convert {
        /// Source .docx path.
        input: PathBuf,

        /// Output directory for the bundle (defaults to ./bundle).
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Use a specific config file instead of ~/.docpress/docpress.toml.
        #[arg(short, long)]
        config: Option<PathBuf>,
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
    /// Initialize config file with defaults.
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
        0 => "docpress=info",
        1 => "docpress=debug",
        _ => "docpress=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .init();
        }
        LogFormat::Json => {
            fmt().json().with_env_filter(env_filter).init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Convert { input, out, config } => {
            cmd_convert(input, out, config.as_deref()).await
        }
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init().await,
            ConfigAction::Show => cmd_config_show().await,
        },
    }
}

async fn cmd_convert(
    input: PathBuf,
    out: Option<PathBuf>,
    config_path: Option<&std::path::Path>,
) -> Result<()> {
    if !input.exists() {
        return Err(eyre!("input file '{}' does not exist", input.display()));
    }

    let app = match config_path {
        Some(path) => load_config_from(path)?,
        None => load_config()?,
    };

    let output_dir = out.unwrap_or_else(|| PathBuf::from("bundle"));

    let convert_config = ConvertConfig {
        input: input.clone(),
        output_dir,
        app,
    };

    info!(input = %input.display(), "converting document");

    let reporter = CliProgress::new();
    let result = docpress_core::pipeline::convert_document(&convert_config, &reporter).await?;

    println!();
    println!("  Conversion complete!");
    println!("  Pages:   {}", result.pages_written);
    if result.pages_skipped > 0 {
        println!("  Skipped: {}", result.pages_skipped);
    }
    if result.reviews > 0 {
        println!("  Reviews: {}", result.reviews);
    }
    println!("  Path:    {}", result.bundle_path.display());
    println!("  Time:    {:.1}s", result.elapsed.as_secs_f64());

    if !result.image_log.is_empty() {
        println!();
        println!("  Images:");
        for entry in &result.image_log {
            match &entry.detail {
                None => println!("    ok      {}.webp", entry.filename),
                Some(reason) => println!("    missed  {} ({reason})", entry.filename),
            }
        }
    }
    println!();

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
        spinner.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap()
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
        );
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn page_parsed(&self, name: &str, current: usize, total: usize) {
        self.spinner
            .set_message(format!("Parsing [{current}/{total}] {name}"));
    }

    fn image_processed(&self, filename: &str, current: usize, total: usize) {
        self.spinner
            .set_message(format!("Fetching image [{current}/{total}] {filename}"));
    }

    fn done(&self, _result: &ConvertResult) {
        self.spinner.finish_and_clear();
    }
}

async fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

async fn cmd_config_show() -> Result<()> {
    let config: AppConfig = load_config()?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}
