//! Manifest files
//!
//! A manifest is a list of items or extensions. The format follows the file
//! extension:
//!
//! | Extension | Layout |
//! |-----------|--------|
//! | `.json` | `[...]` or `{"items": [...]}` |
//! | `.yaml`, `.yml` | sequence or `items:` mapping |
//! | `.toml` | `[[items]]` (or `[[extensions]]`) tables |
//! | `.jsonl` | one record per line |
//!
//! Writes go through a temp file and a rename.

use std::fs::{self, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("Unsupported manifest format '{0}': expected .json, .yaml, .yml, .toml or .jsonl")]
    UnsupportedFormat(String),

    #[error("Expected a list of records, or an `items` or `extensions` list")]
    NoRecords,
}

/// On-disk manifest format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestFormat {
    Json,
    Yaml,
    Toml,
    Jsonl,
}

impl ManifestFormat {
    /// Picks the format from a file extension
    pub fn from_path(path: &Path) -> Result<Self, ManifestError> {
        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        match ext.as_str() {
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            "toml" => Ok(Self::Toml),
            "jsonl" => Ok(Self::Jsonl),
            _ => Err(ManifestError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// Keys that may hold the record list in a table-shaped document
const LIST_KEYS: [&str; 2] = ["items", "extensions"];

#[derive(Serialize)]
struct ItemsTable<'a, T> {
    items: &'a [T],
}

/// A manifest file on disk
pub struct Manifest {
    path: PathBuf,
    format: ManifestFormat,
}

impl Manifest {
    /// Opens a manifest, inferring the format from its extension
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let format = ManifestFormat::from_path(&path)?;
        Ok(Self { path, format })
    }

    pub fn format(&self) -> ManifestFormat {
        self.format
    }

    /// Reads every record in the manifest
    pub fn read<T: DeserializeOwned>(&self) -> Result<Vec<T>> {
        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read manifest: {}", self.path.display()))?;

        parse(&content, self.format)
            .with_context(|| format!("Failed to parse manifest: {}", self.path.display()))
    }

    /// Writes records to the manifest (full rewrite)
    pub fn write<T: Serialize>(&self, records: &[T]) -> Result<()> {
        let content = render(records, self.format)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        // Write to temp file first
        let temp_path = self.path.with_extension("tmp");
        {
            let file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&temp_path)
                .with_context(|| format!("Failed to create temp file: {}", temp_path.display()))?;

            let mut writer = BufWriter::new(&file);
            writer
                .write_all(content.as_bytes())
                .context("Failed to write manifest")?;
            writer.flush().context("Failed to flush manifest")?;
        }

        // Atomic rename
        fs::rename(&temp_path, &self.path).with_context(|| {
            format!(
                "Failed to rename {} to {}",
                temp_path.display(),
                self.path.display()
            )
        })
    }
}

/// Parses manifest content in the given format
///
/// The document is read generically first, then each record is decoded on
/// its own so a bad record reports its own error and position.
pub fn parse<T: DeserializeOwned>(content: &str, format: ManifestFormat) -> Result<Vec<T>> {
    match format {
        ManifestFormat::Json => {
            let doc: serde_json::Value =
                serde_json::from_str(content).context("Invalid JSON manifest")?;
            let list = match doc {
                serde_json::Value::Array(list) => list,
                serde_json::Value::Object(mut table) => {
                    match LIST_KEYS.iter().find_map(|key| table.remove(*key)) {
                        Some(serde_json::Value::Array(list)) => list,
                        _ => return Err(ManifestError::NoRecords.into()),
                    }
                }
                _ => return Err(ManifestError::NoRecords.into()),
            };
            decode_records(list, serde_json::from_value)
        }
        ManifestFormat::Yaml => {
            if content.trim().is_empty() {
                return Ok(Vec::new());
            }
            let doc: serde_yaml::Value =
                serde_yaml::from_str(content).context("Invalid YAML manifest")?;
            let list = match doc {
                serde_yaml::Value::Null => Vec::new(),
                serde_yaml::Value::Sequence(list) => list,
                serde_yaml::Value::Mapping(mut table) => {
                    match LIST_KEYS.iter().find_map(|key| table.remove(*key)) {
                        Some(serde_yaml::Value::Sequence(list)) => list,
                        _ => return Err(ManifestError::NoRecords.into()),
                    }
                }
                _ => return Err(ManifestError::NoRecords.into()),
            };
            decode_records(list, serde_yaml::from_value)
        }
        ManifestFormat::Toml => {
            let mut table: toml::Table = toml::from_str(content).context("Invalid TOML manifest")?;
            if table.is_empty() {
                return Ok(Vec::new());
            }
            let list = match LIST_KEYS.iter().find_map(|key| table.remove(*key)) {
                Some(toml::Value::Array(list)) => list,
                _ => return Err(ManifestError::NoRecords.into()),
            };
            decode_records(list, |value: toml::Value| value.try_into())
        }
        ManifestFormat::Jsonl => {
            let mut records = Vec::new();
            for (line_num, line) in content.lines().enumerate() {
                if line.trim().is_empty() {
                    continue;
                }

                let record: T = serde_json::from_str(line)
                    .with_context(|| format!("Failed to parse record at line {}", line_num + 1))?;
                records.push(record);
            }
            Ok(records)
        }
    }
}

/// Decodes each value of a record list, naming the record that failed
fn decode_records<V, T, E>(list: Vec<V>, decode: impl Fn(V) -> Result<T, E>) -> Result<Vec<T>>
where
    E: std::error::Error + Send + Sync + 'static,
{
    list.into_iter()
        .enumerate()
        .map(|(index, value)| {
            decode(value).with_context(|| format!("Invalid record {}", index + 1))
        })
        .collect()
}

/// Renders records in the given format
pub fn render<T: Serialize>(records: &[T], format: ManifestFormat) -> Result<String> {
    let content = match format {
        ManifestFormat::Json => {
            let mut json =
                serde_json::to_string_pretty(records).context("Failed to serialize JSON")?;
            json.push('\n');
            json
        }
        ManifestFormat::Yaml => serde_yaml::to_string(records).context("Failed to serialize YAML")?,
        ManifestFormat::Toml => toml::to_string_pretty(&ItemsTable { items: records })
            .context("Failed to serialize TOML")?,
        ManifestFormat::Jsonl => {
            let mut out = String::new();
            for record in records {
                let line = serde_json::to_string(record).context("Failed to serialize record")?;
                out.push_str(&line);
                out.push('\n');
            }
            out
        }
    };

    Ok(content)
}
