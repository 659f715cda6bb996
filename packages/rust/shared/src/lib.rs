//! Shared types, error model, and configuration for docsource.
//!
//! This crate is the foundation depended on by all other docsource crates.
//! It provides:
//! - [`DocSourceError`] — the unified error type
//! - Domain types ([`FrontMatterRecord`], [`SourceMap`], [`PipelineKind`])
//! - Configuration ([`AppConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, ContentConfig, FILE_CONCURRENCY_LIMIT, ServerConfig, config_dir,
    config_file_path, init_config, load_config, load_config_from, validate_config,
};
pub use error::{DocSourceError, Result};
pub use types::{FrontMatterRecord, PipelineKind, SourceMap};
