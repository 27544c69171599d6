//! # Server Configuration
//!
//! Settings come from an optional YAML file and are then overridden by
//! environment variables:
//!
//! | Variable               | Field             |
//! |------------------------|-------------------|
//! | `ROSCA_CONFIG`         | path of the YAML file |
//! | `ROSCA_DATA_DIR`       | `data_directory`  |
//! | `ROSCA_BIND_ADDRESS`   | `bind_address`    |
//! | `ROSCA_STORAGE`        | `storage` (`memory` or `file`) |
//! | `ROSCA_SEED_DEMO`      | `seed_demo_data`  |
//! | `ROSCA_ALLOWED_ORIGIN` | `allowed_origin`  |
//! | `ROSCA_LOG`            | `log_filter`      |
//!
//! Without `ROSCA_CONFIG` the file is looked up as `rosca.yaml` inside the
//! data directory. A missing file is not an error.
//!
//! ```yaml
//! data_directory: "~/Documents/ROSCA Circles"
//! bind_address: "127.0.0.1:3000"
//! storage: file
//! seed_demo_data: true
//! allowed_origin: "http://localhost:8080"
//! log_filter: "info"
//! ```

use anyhow::{anyhow, Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub const CONFIG_FILE_NAME: &str = "rosca.yaml";
const DATA_DIRECTORY_NAME: &str = "ROSCA Circles";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageKind {
    Memory,
    File,
}

impl fmt::Display for StorageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageKind::Memory => f.write_str("memory"),
            StorageKind::File => f.write_str("file"),
        }
    }
}

impl FromStr for StorageKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "memory" => Ok(StorageKind::Memory),
            "file" => Ok(StorageKind::File),
            other => Err(anyhow!("Unknown storage kind '{}', expected memory or file", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub data_directory: PathBuf,
    pub bind_address: String,
    pub storage: StorageKind,
    /// Load the demo group into an empty store at start-up
    pub seed_demo_data: bool,
    /// CORS origin; any origin when unset
    pub allowed_origin: Option<String>,
    /// `tracing_subscriber::EnvFilter` directive; `RUST_LOG` wins when set
    pub log_filter: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_directory: default_data_directory(),
            bind_address: "127.0.0.1:3000".to_string(),
            storage: StorageKind::File,
            seed_demo_data: true,
            allowed_origin: Some("http://localhost:8080".to_string()),
            log_filter: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Load from the process environment.
    pub fn load() -> Result<Self> {
        Self::load_with(|key| std::env::var(key).ok())
    }

    /// Load using `env` as the variable source.
    pub fn load_with(env: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let config_path = match env("ROSCA_CONFIG") {
            Some(path) => expand_tilde(&path),
            None => env("ROSCA_DATA_DIR")
                .map(|dir| expand_tilde(&dir))
                .unwrap_or_else(default_data_directory)
                .join(CONFIG_FILE_NAME),
        };

        let mut config = if config_path.exists() {
            let config = Self::from_yaml_file(&config_path)?;
            info!("Loaded configuration from {:?}", config_path);
            config
        } else {
            debug!("No configuration file at {:?}, using defaults", config_path);
            Self::default()
        };
        config.apply_overrides(env)?;
        Ok(config)
    }

    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file {:?}", path))?;
        let mut config: AppConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Invalid configuration file {:?}", path))?;
        config.data_directory = expand_tilde(&config.data_directory.to_string_lossy());
        Ok(config)
    }

    fn apply_overrides(&mut self, env: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(dir) = env("ROSCA_DATA_DIR") {
            self.data_directory = expand_tilde(&dir);
        }
        if let Some(address) = env("ROSCA_BIND_ADDRESS") {
            self.bind_address = address;
        }
        if let Some(storage) = env("ROSCA_STORAGE") {
            self.storage = storage.parse()?;
        }
        if let Some(seed) = env("ROSCA_SEED_DEMO") {
            self.seed_demo_data = parse_flag(&seed)
                .ok_or_else(|| anyhow!("ROSCA_SEED_DEMO must be true or false, got '{}'", seed))?;
        }
        if let Some(origin) = env("ROSCA_ALLOWED_ORIGIN") {
            self.allowed_origin = match origin.trim() {
                "" | "*" => None,
                origin => Some(origin.to_string()),
            };
        }
        if let Some(filter) = env("ROSCA_LOG") {
            self.log_filter = filter;
        }
        Ok(())
    }

    pub fn socket_addr(&self) -> Result<SocketAddr> {
        self.bind_address
            .parse()
            .with_context(|| format!("Invalid bind address '{}'", self.bind_address))
    }
}

/// `~/Documents/ROSCA Circles`, or `./rosca_data` when no home directory is
/// known.
pub fn default_data_directory() -> PathBuf {
    dirs::document_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join("Documents")))
        .map(|documents| documents.join(DATA_DIRECTORY_NAME))
        .unwrap_or_else(|| PathBuf::from("rosca_data"))
}

fn expand_tilde(path: &str) -> PathBuf {
    let trimmed = path.trim();
    if trimmed == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    } else if let Some(rest) = trimmed.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(trimmed)
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
