//! Source list configuration (`config/sources.yaml`).
//!
//! Declares the market collector's feed URLs, the docs collector's scan
//! directories, and any custom metric endpoints. A missing file is not an
//! error; [`SourcesFile::default`] gives an empty, valid configuration so
//! every collector still runs on its fallbacks.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// One syndication feed consumed by the market collector. Declaration
/// order is the tie-break order for ranked results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    pub name: String,
    pub url: String,
}

/// Directory scan settings for the docs collector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    #[serde(default)]
    pub directories: Vec<PathBuf>,
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
    #[serde(default = "default_max_file_bytes")]
    pub max_file_bytes: u64,
}

fn default_extensions() -> Vec<String> {
    ["md", "txt", "vtt", "srt", "json", "csv"]
        .iter()
        .map(ToString::to_string)
        .collect()
}

fn default_max_file_bytes() -> u64 {
    1_048_576
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            directories: Vec::new(),
            extensions: default_extensions(),
            max_file_bytes: default_max_file_bytes(),
        }
    }
}

/// One custom metric endpoint polled by the metrics collector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointConfig {
    pub name: String,
    pub url: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourcesFile {
    #[serde(default)]
    pub feeds: Vec<FeedConfig>,
    #[serde(default)]
    pub scan: ScanConfig,
    #[serde(default)]
    pub metric_endpoints: Vec<EndpointConfig>,
}

/// Load and validate the sources configuration from a YAML file.
///
/// A non-existent file returns the empty default configuration.
///
/// # Errors
///
/// Returns `ConfigError` if an existing file cannot be read, parsed, or
/// fails validation.
pub fn load_sources(path: &Path) -> Result<SourcesFile, ConfigError> {
    if !path.exists() {
        tracing::info!(path = %path.display(), "sources file not found, using built-in defaults");
        return Ok(SourcesFile::default());
    }

    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::SourcesFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let sources: SourcesFile = serde_yaml::from_str(&content)?;
    validate_sources(&sources)?;
    Ok(sources)
}

fn validate_sources(sources: &SourcesFile) -> Result<(), ConfigError> {
    let mut seen_feed_names = HashSet::new();
    for feed in &sources.feeds {
        if feed.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "feed name must be non-empty".to_string(),
            ));
        }
        if feed.url.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "feed '{}' has an empty url",
                feed.name
            )));
        }
        if !seen_feed_names.insert(feed.name.to_lowercase()) {
            return Err(ConfigError::Validation(format!(
                "duplicate feed name: '{}'",
                feed.name
            )));
        }
    }

    let mut seen_endpoint_names = HashSet::new();
    for endpoint in &sources.metric_endpoints {
        if endpoint.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "metric endpoint name must be non-empty".to_string(),
            ));
        }
        if endpoint.url.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "metric endpoint '{}' has an empty url",
                endpoint.name
            )));
        }
        if !seen_endpoint_names.insert(endpoint.name.to_lowercase()) {
            return Err(ConfigError::Validation(format!(
                "duplicate metric endpoint name: '{}'",
                endpoint.name
            )));
        }
    }

    if sources.scan.max_file_bytes == 0 {
        return Err(ConfigError::Validation(
            "scan.max_file_bytes must be greater than zero".to_string(),
        ));
    }

    Ok(())
}
