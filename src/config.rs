//! Checker configuration, loaded from a JSON file with defaults for anything missing.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Hosted model service the browser extension talks to.
pub const DEFAULT_ENDPOINT: &str = "https://kshitijk20-nss.hf.space";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckerConfig {
    /// Remote classifier
    pub classifier: ClassifierConfig,
    /// Trusted domains
    pub whitelist: WhitelistConfig,
    /// Sites-checked / threats-blocked counters
    pub counters: CountersConfig,
    /// Batch scanning
    pub batch: BatchConfig,
    /// Logging
    pub log: LogConfig,
}

/// How the classifier's response body is turned into a label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseFormat {
    /// Substring sniffing, compatible with the deployed extension.
    #[default]
    Marker,
    /// Read the predicted cell out of the rendered HTML table.
    Table,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Base URL; `None` runs offline with a classifier that never flags.
    pub endpoint: Option<String>,
    pub predict_path: String,
    /// File name of the CSV part in the multipart upload
    pub upload_file_name: String,
    pub timeout_secs: u64,
    pub connect_timeout_secs: u64,
    pub response_format: ResponseFormat,
    /// Raise instead of answering "not phishing" when the response can't be read
    pub strict_response: bool,
    /// Class label the model uses for phishing
    pub phishing_label: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WhitelistConfig {
    /// Include the built-in trusted-domain list
    pub builtin: bool,
    pub extra_domains: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CountersConfig {
    /// SQLite file for persistent counters; in-memory when unset
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Worker threads for batch checks
    pub workers: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
    pub json: bool,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            endpoint: Some(DEFAULT_ENDPOINT.to_string()),
            predict_path: "/predict".to_string(),
            upload_file_name: "check.csv".to_string(),
            timeout_secs: 15,
            connect_timeout_secs: 5,
            response_format: ResponseFormat::Marker,
            strict_response: false,
            phishing_label: 1,
        }
    }
}

impl Default for WhitelistConfig {
    fn default() -> Self {
        Self {
            builtin: true,
            extra_domains: Vec::new(),
        }
    }
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self { workers: 4 }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: true,
        }
    }
}

impl CheckerConfig {
    /// Load from JSON file if present; otherwise return default
    pub fn load(path: &std::path::Path) -> Self {
        if path.exists() {
            if let Ok(data) = std::fs::read_to_string(path) {
                if let Ok(c) = serde_json::from_str::<CheckerConfig>(&data) {
                    return c;
                }
            }
        }
        Self::default()
    }
}
