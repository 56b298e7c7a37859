//! Configuration handling for placement
//!
//! Configuration is stored in `placement.toml` (project, found by walking up
//! from the working directory) and `~/.config/placement/config.toml`
//! (global). `PLACEMENT_CONFIG_DIR` overrides the global directory.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Project configuration file name
pub const CONFIG_FILE: &str = "placement.toml";

/// Environment variable overriding the global config directory
pub const CONFIG_DIR_ENV: &str = "PLACEMENT_CONFIG_DIR";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

/// Settings for `placement order`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct OrderConfig {
    /// Print a warning for every item that fell back to input order
    pub warn_unplaced: bool,
}

impl Default for OrderConfig {
    fn default() -> Self {
        Self {
            warn_unplaced: true,
        }
    }
}

/// Settings for `placement check`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CheckConfig {
    /// Fail when an item could not be positioned
    pub fail_on_unplaced: bool,

    /// Fail when a hint names an unknown ID
    pub fail_on_dangling: bool,

    /// Fail when an ID is declared twice
    pub fail_on_duplicates: bool,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            fail_on_unplaced: true,
            fail_on_dangling: false,
            fail_on_duplicates: true,
        }
    }
}

/// Project-level configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct ProjectConfig {
    /// Output format, overriding the global default
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<OutputFormat>,

    pub order: OrderConfig,

    pub check: CheckConfig,
}

/// Global user configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct GlobalConfig {
    /// Default output format (text or json)
    pub default_format: OutputFormat,
}

/// Output format for commands
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Combined configuration (global + project)
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub project: ProjectConfig,
    pub global: GlobalConfig,
    pub project_root: Option<PathBuf>,
}

impl Config {
    /// Loads configuration from default locations
    pub fn load() -> Result<Self> {
        let start = std::env::current_dir().context("Failed to read current directory")?;
        Self::load_from(&start)
    }

    /// Loads configuration, searching for a project file upward from `start`
    pub fn load_from(start: &Path) -> Result<Self> {
        let global = Self::load_global()?;

        let (project, project_root) = match Self::find_project_root(start) {
            Some(root) => (Self::load_project_config(&root)?, Some(root)),
            None => (ProjectConfig::default(), None),
        };

        Ok(Self {
            project,
            global,
            project_root,
        })
    }

    /// Returns the global config directory
    pub fn global_config_dir() -> Option<PathBuf> {
        if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV) {
            return Some(PathBuf::from(dir));
        }
        ProjectDirs::from("dev", "placement", "placement-cli")
            .map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Loads global configuration
    fn load_global() -> Result<GlobalConfig> {
        let config_dir = match Self::global_config_dir() {
            Some(dir) => dir,
            None => return Ok(GlobalConfig::default()),
        };

        let config_path = config_dir.join("config.toml");
        if !config_path.exists() {
            return Ok(GlobalConfig::default());
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read global config: {}", config_path.display()))?;

        toml::from_str(&content)
            .map_err(|e| ConfigError::Parse(e.to_string()))
            .context("Failed to parse global config")
    }

    /// Loads project configuration from a specific root
    fn load_project_config(project_root: &Path) -> Result<ProjectConfig> {
        let config_path = project_root.join(CONFIG_FILE);

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read project config: {}", config_path.display()))?;

        toml::from_str(&content)
            .map_err(|e| ConfigError::Parse(e.to_string()))
            .context("Failed to parse project config")
    }

    /// Finds the project root by looking for `placement.toml`
    pub fn find_project_root(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();

        loop {
            if current.join(CONFIG_FILE).is_file() {
                return Some(current);
            }

            if !current.pop() {
                return None;
            }
        }
    }

    /// Returns the project config file path, if in a project
    pub fn project_file(&self) -> Option<PathBuf> {
        self.project_root.as_ref().map(|root| root.join(CONFIG_FILE))
    }

    /// Resolves the output format: flag, then project, then global
    pub fn effective_format(&self, flag: Option<OutputFormat>) -> OutputFormat {
        flag.or(self.project.format)
            .unwrap_or(self.global.default_format)
    }

    /// Writes a default project configuration into `dir`
    ///
    /// Returns false if the file already existed.
    pub fn init_project(dir: &Path) -> Result<bool> {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory: {}", dir.display()))?;

        let config_path = dir.join(CONFIG_FILE);
        if config_path.exists() {
            return Ok(false);
        }

        let content = toml::to_string_pretty(&ProjectConfig::default())
            .context("Failed to serialize project config")?;

        fs::write(&config_path, content)
            .with_context(|| format!("Failed to write project config: {}", config_path.display()))?;

        Ok(true)
    }
}
