//! CLI command definitions, routing, and tracing setup.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;
use url::Url;

use travelkb_core::{BuildKbConfig, BuildKbResult, ProgressReporter, build_kb};
use travelkb_shared::{AppConfig, CrawlConfig, init_config, load_config};

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// travelkb — build a travel-destination knowledge base.
#[derive(Parser)]
#[command(
    name = "travelkb",
    version,
    about = "Build a Prolog knowledge base of countries as travel destinations.",
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
    /// Query entities, crawl guides, and write the fact file.
    Build {
        /// Origin city for distance facts (defaults to config value).
        #[arg(short, long)]
        origin: Option<String>,

        /// Output fact file path (defaults to config value).
        #[arg(short = 'O', long)]
        out: Option<String>,

        /// Concurrent destination crawls (defaults to config value).
        #[arg(short, long)]
        concurrency: Option<u32>,
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
        0 => "travelkb=info",
        1 => "travelkb=debug",
        _ => "travelkb=trace",
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
        Command::Build {
            origin,
            out,
            concurrency,
        } => cmd_build(origin.as_deref(), out.as_deref(), concurrency).await,
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init().await,
            ConfigAction::Show => cmd_config_show().await,
        },
    }
}

// ---------------------------------------------------------------------------
// build
// ---------------------------------------------------------------------------

async fn cmd_build(
    origin: Option<&str>,
    out: Option<&str>,
    concurrency: Option<u32>,
) -> Result<()> {
    let config = load_config()?;

    let origin_city = origin
        .map(String::from)
        .unwrap_or_else(|| config.defaults.origin_city.clone());

    let output_path = PathBuf::from(
        out.map(String::from)
            .unwrap_or_else(|| config.defaults.output_file.clone()),
    );

    let sparql_endpoint = Url::parse(&config.endpoints.sparql)
        .map_err(|e| eyre!("invalid SPARQL endpoint '{}': {e}", config.endpoints.sparql))?;
    let travel_guide_base = Url::parse(&config.endpoints.travel_guide).map_err(|e| {
        eyre!(
            "invalid travel-guide base '{}': {e}",
            config.endpoints.travel_guide
        )
    })?;

    let mut crawl = CrawlConfig::from(&config);
    if let Some(concurrency) = concurrency {
        crawl.concurrency = concurrency;
    }

    let build_config = BuildKbConfig {
        origin_city: origin_city.clone(),
        output_path,
        sparql_endpoint,
        travel_guide_base,
        crawl,
        vocabulary: config.vocabulary.clone(),
    };

    info!(origin = %origin_city, "building knowledge base");

    let reporter = CliProgress::new();
    let result = build_kb(&build_config, &reporter).await?;

    // Print summary
    println!();
    println!("  Knowledge base built!");
    println!("  Origin:    {origin_city} ({}, {})", result.origin.lat, result.origin.lng);
    println!("  Countries: {}", result.country_count);
    println!("  Output:    {}", result.output_path.display());
    println!("  Time:      {:.1}s", result.elapsed.as_secs_f64());
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

    fn destination_crawled(&self, name: &str, current: usize, total: usize) {
        self.spinner
            .set_message(format!("Crawling [{current}/{total}] {name}"));
    }

    fn done(&self, _result: &BuildKbResult) {
        self.spinner.finish_and_clear();
    }
}

// ---------------------------------------------------------------------------
// config
// ---------------------------------------------------------------------------

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
