//! CLI command definitions, routing, and tracing setup.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use docsource_core::SourceMapService;
use docsource_discovery::FsContentSource;
use docsource_shared::{
    AppConfig, PipelineKind, config_file_path, init_config, load_config, load_config_from,
    validate_config,
};
use tracing::info;

use crate::server;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// docsource — serve the slug → source file map of a docs tree.
#[derive(Parser)]
#[command(
    name = "docsource",
    version,
    about = "Scan markdown front matter and serve a slug to source path map.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file to use instead of ~/.docsource/docsource.toml.
    #[arg(long, global = true, env = "DOCSOURCE_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Content selection shared by `serve` and `scan`.
#[derive(clap::Args, Debug, Default)]
pub(crate) struct ContentArgs {
    /// Project root containing docs/ and develop-docs/.
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// Pipeline to serve: docs or develop-docs.
    #[arg(long, env = "DOCSOURCE_PIPELINE")]
    pub pipeline: Option<PipelineKind>,

    /// Maximum concurrent file reads.
    #[arg(long)]
    pub concurrency: Option<usize>,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Run the HTTP server exposing the source map.
    Serve {
        /// Address to listen on.
        #[arg(long, env = "DOCSOURCE_BIND")]
        bind: Option<String>,

        #[command(flatten)]
        content: ContentArgs,
    },

    /// Scan once and print the source map as JSON.
    Scan {
        #[command(flatten)]
        content: ContentArgs,

        /// Pretty-print the JSON output.
        #[arg(long)]
        pretty: bool,
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
        0 => "docsource=info",
        1 => "docsource=debug",
        _ => "docsource=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    // Logs go to stderr so `scan` output stays pipeable.
    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .with_target(false)
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
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Serve { bind, content } => {
            cmd_serve(cli.config.as_ref(), bind.as_deref(), &content).await
        }
        Command::Scan { content, pretty } => cmd_scan(cli.config.as_ref(), &content, pretty).await,
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show => cmd_config_show(cli.config.as_ref()),
        },
    }
}

/// Load the config file (explicit path or default location).
fn load(config_path: Option<&PathBuf>) -> Result<AppConfig> {
    let config = match config_path {
        Some(path) => load_config_from(path)?,
        None => load_config()?,
    };
    Ok(config)
}

/// Apply CLI overrides on top of the loaded config.
fn resolve(mut config: AppConfig, content: &ContentArgs) -> Result<AppConfig> {
    if let Some(root) = &content.root {
        config.content.root = root.clone();
    }
    if let Some(pipeline) = content.pipeline {
        config.content.pipeline = pipeline;
    }
    if let Some(concurrency) = content.concurrency {
        config.content.concurrency = concurrency;
    }
    validate_config(&config)?;
    Ok(config)
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

async fn cmd_serve(
    config_path: Option<&PathBuf>,
    bind: Option<&str>,
    content: &ContentArgs,
) -> Result<()> {
    let mut config = resolve(load(config_path)?, content)?;
    if let Some(bind) = bind {
        config.server.bind = bind.to_string();
    }

    info!(
        root = %config.content.root.display(),
        pipeline = %config.content.pipeline,
        "starting docsource server"
    );

    let service = SourceMapService::from_config(Arc::new(FsContentSource), &config);
    server::run(service, &config.server.bind, &config.server.route).await
}

async fn cmd_scan(
    config_path: Option<&PathBuf>,
    content: &ContentArgs,
    pretty: bool,
) -> Result<()> {
    let config = resolve(load(config_path)?, content)?;
    let service = SourceMapService::from_config(Arc::new(FsContentSource), &config);

    let map = service.source_map().await?;
    let json = if pretty {
        serde_json::to_string_pretty(&map)?
    } else {
        serde_json::to_string(&map)?
    };
    println!("{json}");
    Ok(())
}

fn cmd_config_init() -> Result<()> {
    let path = config_file_path()?;
    if path.exists() {
        return Err(eyre!("config file already exists at {}", path.display()));
    }
    let created = init_config()?;
    println!("Created config file: {}", created.display());
    Ok(())
}

fn cmd_config_show(config_path: Option<&PathBuf>) -> Result<()> {
    let config = load(config_path)?;
    let rendered = toml::to_string_pretty(&config)?;
    println!("{rendered}");
    Ok(())
}
