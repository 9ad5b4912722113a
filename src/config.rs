use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::seed::FixturePaths;

/// Application configuration, read from TOML with env overrides.
///
/// | Source       | Default        |
/// |--------------|----------------|
/// | `APP_CONFIG` | `config.toml`  |
/// | `HOST`       | `0.0.0.0`      |
/// | `PORT`       | `3030`         |
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub seed: SeedConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3030,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Snapshot directory; in-memory only when unset.
    pub data_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SeedConfig {
    pub enabled: bool,
    pub dealerships_path: PathBuf,
    pub reviews_path: PathBuf,
    /// Finish seeding before the listener is bound.
    pub wait_for_completion: bool,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            dealerships_path: PathBuf::from("data/dealerships.json"),
            reviews_path: PathBuf::from("data/reviews.json"),
            wait_for_completion: true,
        }
    }
}

impl SeedConfig {
    pub fn fixture_paths(&self) -> FixturePaths {
        FixturePaths {
            dealerships: self.dealerships_path.clone(),
            reviews: self.reviews_path.clone(),
        }
    }
}

impl AppConfig {
    /// Load from `$APP_CONFIG` (or `config.toml`), then apply env overrides.
    pub fn load() -> Result<Self> {
        let path = std::env::var("APP_CONFIG").unwrap_or_else(|_| "config.toml".to_string());
        let mut config = Self::from_file(Path::new(&path))?;

        if let Ok(host) = std::env::var("HOST") {
            config.server.host = host;
        }
        if let Ok(port) = std::env::var("PORT") {
            config.server.port = port
                .parse()
                .with_context(|| format!("PORT must be a valid port number, got {port:?}"))?;
        }

        Ok(config)
    }

    /// Parse a config file. A missing file yields the defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(raw) => {
                Self::parse(&raw).with_context(|| format!("invalid config {}", path.display()))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e).with_context(|| format!("failed to read config {}", path.display())),
        }
    }

    pub fn parse(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
