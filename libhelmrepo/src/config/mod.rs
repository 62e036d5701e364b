//! Application configuration.
//!
//! Settings are layered: built-in defaults, then an optional YAML file, then
//! environment variables. Command-line flags are applied on top by the CLI.

use crate::error::{HelmRepoError, Result};
use config::{Config as ConfigRs, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};


/// Overrides the config file location.
pub const CONFIG_PATH_ENV: &str = "HELM_REPO_CONFIG";

/// Overrides `network.timeout`, in seconds.
pub const TIMEOUT_ENV: &str = "HELM_REPO_TIMEOUT";

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Config {
    #[serde(default)]
    pub network: Network,
    #[serde(default)]
    pub registries: Registries,
}

impl Config {
    /// Parses a `Config` from a YAML string.
    ///
    /// This function is primarily used for testing.
    pub fn from_yaml_str(s: &str) -> Result<Self> {
        let builder = Self::defaults()?.add_source(File::from_str(s, FileFormat::Yaml));
        Self::from_builder(builder, None)
    }

    /// Loads a `Config` from an optional file path.
    ///
    /// A path that does not exist yields the defaults; a file that exists but
    /// cannot be parsed is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Self::defaults()?;

        if let Some(p) = path {
            builder = builder.add_source(File::from(p).format(FileFormat::Yaml).required(false));
        }

        Self::from_builder(builder, path)
    }

    /// Loads the config file named by `HELM_REPO_CONFIG` (else the default
    /// location) and applies `HELM_REPO_TIMEOUT`.
    pub fn load_from_env() -> Result<Self> {
        let path = env::var_os(CONFIG_PATH_ENV)
            .filter(|p| !p.is_empty())
            .map(PathBuf::from)
            .or_else(default_config_path);

        Self::load(path.as_deref())?.with_timeout_override(env::var(TIMEOUT_ENV).ok().as_deref())
    }

    /// Applies a timeout override given as a string of seconds.
    ///
    /// `None` and blank values leave the configuration unchanged.
    pub fn with_timeout_override(mut self, value: Option<&str>) -> Result<Self> {
        let Some(raw) = value.map(str::trim).filter(|v| !v.is_empty()) else {
            return Ok(self);
        };

        self.network.timeout = raw.parse::<u64>().map_err(|e| {
            HelmRepoError::config_with_source(
                format!("{} must be a whole number of seconds, got '{}'", TIMEOUT_ENV, raw),
                None,
                e,
            )
        })?;
        Ok(self)
    }

    /// Returns true if `host` is configured to be reached over plain HTTP.
    pub fn is_plain_http(&self, host: &str) -> bool {
        self.registries.plain_http.iter().any(|h| h == host)
    }

    fn defaults() -> Result<config::ConfigBuilder<config::builder::DefaultState>> {
        let defaults = ConfigRs::try_from(&Config::default()).map_err(|e| {
            HelmRepoError::config_with_source("Failed to build default configuration", None, e)
        })?;
        Ok(ConfigRs::builder().add_source(defaults))
    }

    /// Creates a `Config` from a `config::ConfigBuilder`.
    fn from_builder(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
        path: Option<&Path>,
    ) -> Result<Self> {
        builder
            .build()
            .and_then(|cfg| cfg.try_deserialize())
            .map_err(|e| {
                HelmRepoError::config_with_source(
                    "Failed to load configuration".to_string(),
                    path.map(|p| p.display().to_string()),
                    e,
                )
            })
    }
}

/// Returns `<user-config-dir>/helm-repo/config.yaml`, if a config dir exists.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("helm-repo").join("config.yaml"))
}

/// Network settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Network {
    #[serde(default = "default_network_timeout")]
    pub timeout: u64,

    #[serde(default = "default_max_idle_per_host")]
    pub max_idle_per_host: usize,
}

impl Default for Network {
    fn default() -> Self {
        Self {
            timeout: default_network_timeout(),
            max_idle_per_host: default_max_idle_per_host(),
        }
    }
}

fn default_network_timeout() -> u64 {
    30
}

fn default_max_idle_per_host() -> usize {
    10
}

/// Per-registry settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Registries {
    /// Hosts contacted over `http://` instead of `https://`
    #[serde(default)]
    pub plain_http: Vec<String>,
}
