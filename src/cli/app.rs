//! Main CLI application structure

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use super::output::{Output, OutputFormat};
use super::{check, extension_cmd, order_cmd};
use crate::extension::Menu;
use crate::storage::Config;

#[derive(Parser)]
#[command(name = "placement")]
#[command(author, version, about = "Order navigation and action-menu items by insertBefore/insertAfter hints")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format (defaults to the configured format, then text)
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Enable verbose output for debugging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a default placement.toml
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        path: PathBuf,
    },

    /// Order a flat item manifest
    Order {
        /// Manifest file (.json, .yaml, .toml or .jsonl)
        file: PathBuf,

        /// Print only the ordered IDs
        #[arg(long)]
        ids_only: bool,

        /// Write the ordered manifest to a file instead of printing it
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Order a nested item manifest (items linked by `parent`)
    Tree {
        /// Manifest file
        file: PathBuf,
    },

    /// Report dangling hints, cycles, duplicate IDs and unplaced items
    Check {
        /// Manifest file
        file: PathBuf,

        /// Check each sibling collection of the nested order (as `tree` does)
        #[arg(long, conflicts_with = "extensions")]
        tree: bool,

        /// Treat the file as extension declarations
        #[arg(long)]
        extensions: bool,
    },

    /// Resolve the navigation menu from extension declarations
    Nav {
        /// Extensions file
        file: PathBuf,
    },

    /// Resolve the action menu from extension declarations
    Actions {
        /// Extensions file
        file: PathBuf,
    },

    /// Show the effective configuration
    Config,
}

/// Installs the tracing subscriber for library diagnostics
///
/// `RUST_LOG` wins; otherwise `--verbose` enables debug events.
fn init_tracing(verbose: bool) {
    let default = if verbose {
        "placement_cli=debug"
    } else {
        "placement_cli=error"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Main entry point for the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = Config::load()?;
    let format = config.effective_format(cli.format.map(Into::into));
    let output = Output::new(format.into(), cli.verbose);

    output.verbose("placement starting");
    if let Some(path) = config.project_file() {
        output.verbose_ctx("config", &format!("Using project config: {}", path.display()));
    }

    match cli.command {
        Commands::Init { path } => init(&output, &path)?,

        Commands::Order {
            file,
            ids_only,
            output: out_path,
        } => order_cmd::order(&output, &config, &file, ids_only, out_path.as_deref())?,

        Commands::Tree { file } => order_cmd::tree(&output, &file)?,

        Commands::Check {
            file,
            tree,
            extensions,
        } => check::run(&output, &config, &file, tree, extensions)?,

        Commands::Nav { file } => extension_cmd::run(&output, &file, Menu::Navigation)?,
        Commands::Actions { file } => extension_cmd::run(&output, &file, Menu::Actions)?,

        Commands::Config => show_config(&output, &config)?,
    }

    output.verbose("Command completed successfully");
    Ok(())
}

/// Writes a default project configuration
fn init(output: &Output, path: &std::path::Path) -> Result<()> {
    output.verbose_ctx("init", &format!("Initializing project at: {}", path.display()));

    if Config::init_project(path)? {
        output.success(&format!(
            "Initialized placement project at {}",
            path.display()
        ));
    } else {
        output.success(&format!(
            "placement.toml already exists in {}",
            path.display()
        ));
    }

    Ok(())
}

/// Prints the effective configuration
fn show_config(output: &Output, config: &Config) -> Result<()> {
    if output.is_json() {
        output.data(&serde_json::json!({
            "project_file": config.project_file().map(|p| p.display().to_string()),
            "project": config.project,
            "global": config.global,
        }));
        return Ok(());
    }

    match config.project_file() {
        Some(path) => println!("# project: {}", path.display()),
        None => println!("# project: (none, using defaults)"),
    }
    print!("{}", toml::to_string_pretty(&config.project)?);
    println!();
    println!("# global");
    print!("{}", toml::to_string_pretty(&config.global)?);

    Ok(())
}
