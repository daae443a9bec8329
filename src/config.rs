//! Configuration handling for the intake client

use anyhow::Result;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

const ENV_BACKEND_URL: &str = "HIRE_INTAKE_BACKEND_URL";
const ENV_ANON_KEY: &str = "HIRE_INTAKE_ANON_KEY";

/// Backend connection and naming settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IntakeConfig {
    /// Project URL of the hosted backend
    pub backend_url: Option<String>,
    /// Public (anon) API key
    pub anon_key: Option<String>,
    /// Table hire requests are written to
    pub table: String,
    /// Storage bucket for attachments
    pub bucket: String,
    /// Per-request HTTP timeout
    pub request_timeout_secs: u64,
    /// Lifetime of signed download links
    pub signed_url_ttl_secs: u64,
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self {
            backend_url: None,
            anon_key: None,
            table: "hire_requests".to_string(),
            bucket: "hire-attachments".to_string(),
            request_timeout_secs: 30,
            signed_url_ttl_secs: 3600,
        }
    }
}

impl IntakeConfig {
    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("dev", "portfolio", "hire-intake")
            .map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Load configuration from file, then apply environment overrides
    pub fn load() -> Result<Self> {
        let mut config = Self::default();

        if let Some(path) = Self::config_path() {
            if path.exists() {
                let content = fs::read_to_string(&path)?;
                config = serde_json::from_str(&content)?;
                tracing::debug!("Loaded config from {}", path.display());
            }
        }

        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Override connection settings from the environment
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(ENV_BACKEND_URL) {
            self.backend_url = Some(url);
        }
        if let Some(key) = lookup(ENV_ANON_KEY) {
            self.anon_key = Some(key);
        }
    }
}
