//! # Storage Layer
//!
//! File access for manifests and configuration.
//!
//! ## Files
//!
//! | Data | Format | Location |
//! |------|--------|----------|
//! | Items / extensions | JSON, YAML, TOML or JSONL | any path given on the command line |
//! | Project config | TOML | `placement.toml` (nearest ancestor directory) |
//! | Global config | TOML | `~/.config/placement/config.toml` |
//!
//! ## Key Types
//!
//! - [`Manifest`] - Read/write item and extension lists
//! - [`Config`] - Project and global configuration

mod config;
mod manifest;

pub use config::{
    CheckConfig, Config, ConfigError, GlobalConfig, OrderConfig, OutputFormat, ProjectConfig,
    CONFIG_DIR_ENV, CONFIG_FILE,
};
pub use manifest::{parse, render, Manifest, ManifestError, ManifestFormat};
