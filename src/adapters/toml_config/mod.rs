// TOML config adapter - Client configuration from TOML files and environment

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tracing::debug;
use url::Url;

use crate::domain::errors::*;
use crate::domain::model::FailurePolicy;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Environment variables and the config keys they override
pub const ENV_MAPPINGS: [(&str, &str); 5] = [
    ("EMPTYCUT_BASE_URL", "base_url"),
    ("EMPTYCUT_TIMEOUT_SECS", "timeout_secs"),
    ("EMPTYCUT_FAILURE_POLICY", "failure_policy"),
    ("EMPTYCUT_DOWNLOAD_DIR", "download_dir"),
    ("EMPTYCUT_LOG_LEVEL", "log_level"),
];

/// Resolved client configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Origin of the processing service
    pub base_url: Url,
    pub timeout: Duration,
    pub failure_policy: FailurePolicy,
    pub download_dir: Option<PathBuf>,
    pub log_level: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base URL is valid"),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            failure_policy: FailurePolicy::default(),
            download_dir: None,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

/// `[emptycut]` table as written in the file; every key optional
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigSection {
    base_url: Option<String>,
    timeout_secs: Option<u64>,
    failure_policy: Option<FailurePolicy>,
    download_dir: Option<PathBuf>,
    log_level: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    emptycut: ConfigSection,
}

/// TOML configuration adapter
#[derive(Debug, Default)]
pub struct TomlConfigAdapter {
    config: ClientConfig,
    config_file_path: Option<PathBuf>,
}

impl TomlConfigAdapter {
    /// Adapter holding the defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Candidate config file locations, in search order
    pub fn default_config_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("emptycut.toml")];
        if let Some(dir) = std::env::var_os("XDG_CONFIG_HOME") {
            paths.push(PathBuf::from(dir).join("emptycut").join("config.toml"));
        } else if let Some(home) = std::env::var_os("HOME") {
            paths.push(PathBuf::from(home).join(".config").join("emptycut").join("config.toml"));
        }
        if let Some(appdata) = std::env::var_os("APPDATA") {
            paths.push(PathBuf::from(appdata).join("EmptyCut").join("config.toml"));
        }
        paths
    }

    /// Load the first existing default config file, if any
    pub fn load_default_file(&mut self) -> Result<Option<PathBuf>, DomainError> {
        for path in Self::default_config_paths() {
            if path.is_file() {
                self.load_file(&path)?;
                return Ok(Some(path));
            }
        }
        debug!("No configuration file found");
        Ok(None)
    }

    /// Merge values from a TOML file
    pub fn load_file(&mut self, path: &Path) -> Result<(), DomainError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            DomainError::ConfigFail(format!("Failed to read config file {}: {}", path.display(), e))
        })?;
        self.merge_toml(&content)?;
        debug!("Loaded configuration from: {}", path.display());
        self.config_file_path = Some(path.to_path_buf());
        Ok(())
    }

    /// Merge values from TOML text
    pub fn merge_toml(&mut self, content: &str) -> Result<(), DomainError> {
        let parsed: ConfigFile = toml::from_str(content)
            .map_err(|e| DomainError::ConfigFail(format!("Failed to parse TOML config: {}", e)))?;
        let section = parsed.emptycut;

        if let Some(base_url) = section.base_url {
            self.set("base_url", &base_url)?;
        }
        if let Some(timeout_secs) = section.timeout_secs {
            self.set("timeout_secs", &timeout_secs.to_string())?;
        }
        if let Some(policy) = section.failure_policy {
            self.config.failure_policy = policy;
        }
        if let Some(dir) = section.download_dir {
            self.config.download_dir = Some(dir);
        }
        if let Some(level) = section.log_level {
            self.set("log_level", &level)?;
        }
        Ok(())
    }

    /// Apply overrides from an environment snapshot, returning the variables used
    pub fn apply_env(
        &mut self,
        env: &HashMap<String, String>,
    ) -> Result<Vec<&'static str>, DomainError> {
        let mut applied = Vec::new();
        for (var, key) in ENV_MAPPINGS {
            if let Some(value) = env.get(var) {
                debug!("Found environment override: {} = {}", var, value);
                self.set(key, value)?;
                applied.push(var);
            }
        }
        Ok(applied)
    }

    /// Set one configuration key from its string form
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), DomainError> {
        match key {
            "base_url" => {
                let url = Url::parse(value.trim()).map_err(|e| {
                    DomainError::ConfigFail(format!("Invalid base_url '{}': {}", value, e))
                })?;
                if url.cannot_be_a_base() {
                    return Err(DomainError::ConfigFail(format!(
                        "base_url '{}' cannot be used as a base",
                        value
                    )));
                }
                self.config.base_url = url;
            }
            "timeout_secs" => {
                let secs: u64 = value.trim().parse().map_err(|e| {
                    DomainError::ConfigFail(format!("Invalid timeout_secs '{}': {}", value, e))
                })?;
                if secs == 0 {
                    return Err(DomainError::ConfigFail(
                        "timeout_secs must be greater than zero".to_string(),
                    ));
                }
                self.config.timeout = Duration::from_secs(secs);
            }
            "failure_policy" => {
                self.config.failure_policy = FailurePolicy::parse(value)
                    .map_err(|e| DomainError::ConfigFail(e.to_string()))?;
            }
            "download_dir" => {
                self.config.download_dir = Some(PathBuf::from(value));
            }
            "log_level" => {
                self.config.log_level = value.trim().to_lowercase();
            }
            _ => {
                return Err(DomainError::ConfigFail(format!(
                    "Unknown configuration key: {}",
                    key
                )))
            }
        }
        Ok(())
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn into_config(self) -> ClientConfig {
        self.config
    }

    /// File the configuration was loaded from, if any
    pub fn config_file_path(&self) -> Option<&Path> {
        self.config_file_path.as_deref()
    }
}
