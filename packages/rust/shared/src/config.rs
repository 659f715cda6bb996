//! Application configuration for docsource.
//!
//! User config lives at `~/.docsource/docsource.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{DocSourceError, Result};
use crate::types::PipelineKind;

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "docsource.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".docsource";

/// Maximum number of content files read and parsed at once.
pub const FILE_CONCURRENCY_LIMIT: usize = 20;

// ---------------------------------------------------------------------------
// Config structs (matching docsource.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Content tree settings.
    #[serde(default)]
    pub content: ContentConfig,
}

/// `[server]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Socket address to listen on.
    #[serde(default = "default_bind")]
    pub bind: String,

    /// Path of the source map route.
    #[serde(default = "default_route")]
    pub route: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            route: default_route(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:3000".into()
}
fn default_route() -> String {
    "/api/source-map".into()
}

/// `[content]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentConfig {
    /// Project root holding `docs/` and `develop-docs/`.
    #[serde(default = "default_root")]
    pub root: PathBuf,

    /// Pipeline served by the endpoint.
    #[serde(default)]
    pub pipeline: PipelineKind,

    /// Maximum concurrent file reads.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Slugs of API-generated pages, served with a null source path.
    #[serde(default)]
    pub generated_pages: Vec<String>,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            pipeline: PipelineKind::default(),
            concurrency: default_concurrency(),
            generated_pages: Vec::new(),
        }
    }
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}
fn default_concurrency() -> usize {
    FILE_CONCURRENCY_LIMIT
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.docsource/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| DocSourceError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.docsource/docsource.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| DocSourceError::io(path, e))?;

    let config: AppConfig = toml::from_str(&content).map_err(|e| {
        DocSourceError::config(format!("failed to parse {}: {e}", path.display()))
    })?;
    validate_config(&config)?;
    Ok(config)
}

/// Reject values the server cannot run with.
pub fn validate_config(config: &AppConfig) -> Result<()> {
    if config.content.concurrency == 0 {
        return Err(DocSourceError::config("content.concurrency must be at least 1"));
    }
    if !config.server.route.starts_with('/') {
        return Err(DocSourceError::config(format!(
            "server.route must start with '/', got '{}'",
            config.server.route
        )));
    }
    Ok(())
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| DocSourceError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| DocSourceError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| DocSourceError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}
