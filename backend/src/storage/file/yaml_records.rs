//! YAML table files.
//!
//! ```yaml
//! data_format_version: "1.0"
//! updated_at: "2024-11-01T10:00:00+00:00"
//! records:
//!   - id: user-001
//!     name: Ivan Petrov
//!     ...
//! ```

use anyhow::{Context, Result};
use chrono::Utc;
use log::debug;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DATA_FORMAT_VERSION: &str = "1.0";

#[derive(Debug, Deserialize)]
struct YamlTable<T> {
    #[serde(default)]
    data_format_version: String,
    records: Vec<T>,
}

#[derive(Debug, Serialize)]
struct YamlTableRef<'a, T> {
    data_format_version: &'a str,
    updated_at: String,
    records: &'a [T],
}

/// Read a table file; a missing file is an empty table.
pub fn load<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    if !path.exists() {
        debug!("No table file at {:?}, starting empty", path);
        return Ok(Vec::new());
    }
    let yaml_content =
        fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
    let table: YamlTable<T> = serde_yaml::from_str(&yaml_content)
        .with_context(|| format!("Failed to parse {:?}", path))?;
    debug!(
        "Loaded {} record(s) from {:?} (format {})",
        table.records.len(),
        path,
        table.data_format_version
    );
    Ok(table.records)
}

/// Write `records` next to `path` and return the temp file's location; the
/// caller renames it into place.
pub fn write_temp<T: Serialize>(path: &Path, records: &[T]) -> Result<PathBuf> {
    let table = YamlTableRef {
        data_format_version: DATA_FORMAT_VERSION,
        updated_at: Utc::now().to_rfc3339(),
        records,
    };
    let yaml_content = serde_yaml::to_string(&table)?;
    let temp_path = path.with_extension("tmp");
    fs::write(&temp_path, yaml_content)
        .with_context(|| format!("Failed to write {:?}", temp_path))?;
    Ok(temp_path)
}
