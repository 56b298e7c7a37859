//! # Command-Line Interface
//!
//! User-facing commands and output formatting.
//!
//! ## Commands
//!
//! | Command | Purpose |
//! |---------|---------|
//! | `init` | Write a default `placement.toml` |
//! | `order` | Order a flat manifest |
//! | `tree` | Order a nested manifest (`parent` links) |
//! | `check` | Report dangling hints, cycles, duplicates and unplaced items (`--tree` for nested manifests) |
//! | `nav`, `actions` | Resolve menus from extension declarations |
//! | `config` | Show the effective configuration |
//!
//! ## Output Formats
//!
//! All commands support the `--format` flag:
//! - `text` (default) - Human-readable output
//! - `json` - Machine-parseable JSON
//!
//! The default can be changed in `placement.toml` (`format`) or the global
//! config (`default_format`).
//!
//! ## Verbose Mode
//!
//! Use `--verbose` (or `-v`) for debug output, including ordering
//! diagnostics. `RUST_LOG` overrides the diagnostic filter:
//! ```bash
//! placement --verbose order nav.yaml
//! RUST_LOG=placement_cli=warn placement order nav.yaml
//! ```
//!
//! ## Entry Point
//!
//! Call [`run()`] to parse arguments and execute the appropriate command.

mod app;
mod output;
mod order_cmd;
mod check;
mod extension_cmd;

pub use app::{Cli, Commands, run};
pub use check::Diagnostics;
pub use output::{Output, OutputFormat};
