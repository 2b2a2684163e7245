//! Configuration initialization and hierarchy management

use std::collections::HashMap;
use std::path::PathBuf;

use tracing::info;

use crate::adapters::{ClientConfig, TomlConfigAdapter};
use crate::cli::Cli;
use crate::error::{EmptyCutError, EmptyCutResult};

/// Resolved configuration plus where its values came from.
///
/// Resolution runs before logging is installed, so the sources are kept
/// here and reported by [`ConfigResolution::log_summary`] afterwards.
#[derive(Debug, Clone)]
pub struct ConfigResolution {
    pub config: ClientConfig,
    /// Config file that was loaded, if any
    pub file: Option<PathBuf>,
    /// Environment variables that overrode a value
    pub env_overrides: Vec<&'static str>,
    /// CLI options that overrode a value
    pub cli_overrides: Vec<&'static str>,
}

impl ConfigResolution {
    /// Log the configuration sources; call once the subscriber is installed
    pub fn log_summary(&self) {
        match &self.file {
            Some(path) => info!("Loaded configuration from: {}", path.display()),
            None => info!("No config file loaded, using defaults"),
        }
        if !self.env_overrides.is_empty() {
            info!(
                "Applied {} environment variable overrides: {}",
                self.env_overrides.len(),
                self.env_overrides.join(", ")
            );
        }
        if !self.cli_overrides.is_empty() {
            info!(
                "Applied {} CLI configuration overrides: {}",
                self.cli_overrides.len(),
                self.cli_overrides.join(", ")
            );
        }
        info!(
            base_url = %self.config.base_url,
            timeout = ?self.config.timeout,
            failure_policy = ?self.config.failure_policy,
            "Configuration resolved"
        );
    }
}

/// Build the client configuration following precedence: CLI > Env > File > Defaults
pub fn initialize_configuration_hierarchy(cli: &Cli) -> EmptyCutResult<ConfigResolution> {
    let env: HashMap<String, String> = std::env::vars().collect();
    resolve_configuration(cli, &env)
}

/// Same as [`initialize_configuration_hierarchy`] with an explicit environment
pub fn resolve_configuration(
    cli: &Cli,
    env: &HashMap<String, String>,
) -> EmptyCutResult<ConfigResolution> {
    let mut adapter = TomlConfigAdapter::new();

    // Step 1: defaults come from TomlConfigAdapter::new()
    // Step 2: config file, explicit path must exist
    match &cli.config {
        Some(path) => adapter.load_file(path).map_err(config_error)?,
        None => {
            adapter.load_default_file().map_err(config_error)?;
        }
    }

    // Step 3: environment variables
    let env_overrides = adapter.apply_env(env).map_err(config_error)?;

    // Step 4: CLI arguments
    let mut cli_overrides = Vec::new();
    if let Some(base_url) = &cli.base_url {
        adapter.set("base_url", base_url).map_err(config_error)?;
        cli_overrides.push("--base-url");
    }
    if let Some(timeout) = cli.timeout_secs {
        adapter
            .set("timeout_secs", &timeout.to_string())
            .map_err(config_error)?;
        cli_overrides.push("--timeout-secs");
    }
    if let Some(policy) = &cli.failure_policy {
        adapter.set("failure_policy", policy).map_err(config_error)?;
        cli_overrides.push("--failure-policy");
    }
    if let Some(level) = &cli.log_level {
        adapter.set("log_level", level).map_err(config_error)?;
        cli_overrides.push("--log-level");
    }

    let file = adapter.config_file_path().map(PathBuf::from);
    Ok(ConfigResolution {
        config: adapter.into_config(),
        file,
        env_overrides,
        cli_overrides,
    })
}

fn config_error(e: crate::domain::errors::DomainError) -> EmptyCutError {
    EmptyCutError::ConfigError {
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::FailurePolicy;
    use clap::Parser;
    use std::time::Duration;

    #[test]
    fn test_cli_overrides_env_and_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("emptycut.toml");
        std::fs::write(
            &path,
            "[emptycut]\nbase_url = \"http://file:1\"\ntimeout_secs = 10\nfailure_policy = \"clear\"\n",
        )
        .unwrap();

        let cli = Cli::parse_from([
            "emptycut",
            "--config",
            path.to_str().unwrap(),
            "--base-url",
            "http://cli:3",
            "fields",
        ]);
        let env = HashMap::from([
            ("EMPTYCUT_BASE_URL".to_string(), "http://env:2".to_string()),
            ("EMPTYCUT_TIMEOUT_SECS".to_string(), "20".to_string()),
        ]);

        let resolution = resolve_configuration(&cli, &env).unwrap();
        let config = &resolution.config;
        assert_eq!(config.base_url.as_str(), "http://cli:3/");
        assert_eq!(config.timeout, Duration::from_secs(20));
        assert_eq!(config.failure_policy, FailurePolicy::Clear);
    }

    #[test]
    fn test_resolution_records_sources() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("emptycut.toml");
        std::fs::write(&path, "[emptycut]\ntimeout_secs = 10\n").unwrap();

        let cli = Cli::parse_from([
            "emptycut",
            "--config",
            path.to_str().unwrap(),
            "--log-level",
            "debug",
            "fields",
        ]);
        let env = HashMap::from([
            ("EMPTYCUT_FAILURE_POLICY".to_string(), "clear".to_string()),
            ("EMPTYCUT_TIMEOUT_SECS".to_string(), "20".to_string()),
        ]);

        let resolution = resolve_configuration(&cli, &env).unwrap();
        assert_eq!(resolution.file, Some(path));
        assert_eq!(
            resolution.env_overrides,
            vec!["EMPTYCUT_TIMEOUT_SECS", "EMPTYCUT_FAILURE_POLICY"]
        );
        assert_eq!(resolution.cli_overrides, vec!["--log-level"]);
        assert_eq!(resolution.config.log_level, "debug");
        resolution.log_summary();
    }

    #[test]
    fn test_missing_explicit_config_file_fails() {
        let cli = Cli::parse_from(["emptycut", "--config", "/no/such/emptycut.toml", "fields"]);
        let err = resolve_configuration(&cli, &HashMap::new()).unwrap_err();
        assert!(matches!(err, EmptyCutError::ConfigError { .. }));
    }
}
