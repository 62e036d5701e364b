//! Application context that holds resolved configuration
//!
//! The context is built following the precedence order:
//! 1. Default values
//! 2. Config file values
//! 3. Environment variables
//! 4. CLI flags
//!
//! Once built, the context is passed as read-only throughout the application.

use crate::format::ColorChoice;
use libhelmrepo::{
    Client, ClientConfig, Config, CredentialResolver, Registry, Result, Scheme, StorePaths,
};
use log::LevelFilter;

#[cfg(test)]
#[path = "context_tests.rs"]
mod tests;

/// How much diagnostic output to produce, set by repeating `-v`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum VerbosityLevel {
    #[default]
    Normal,
    Verbose,
    VeryVerbose,
    Trace,
}

impl VerbosityLevel {
    /// Maps the number of `-v` flags to a level.
    pub fn from_count(count: u8) -> Self {
        match count {
            0 => Self::Normal,
            1 => Self::Verbose,
            2 => Self::VeryVerbose,
            _ => Self::Trace,
        }
    }

    /// Log filter matching this level.
    pub fn log_filter(&self) -> LevelFilter {
        match self {
            Self::Normal => LevelFilter::Warn,
            Self::Verbose => LevelFilter::Info,
            Self::VeryVerbose => LevelFilter::Debug,
            Self::Trace => LevelFilter::Trace,
        }
    }
}

/// Flags that override configuration for a single run.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub color: ColorChoice,
    pub verbosity: VerbosityLevel,
    pub plain_http: bool,
    pub timeout: Option<u64>,
}

/// Application context with resolved configuration and runtime state
#[derive(Debug, Clone)]
pub struct AppContext {
    /// Resolved configuration
    pub config: Config,
    pub color: ColorChoice,
    pub verbosity: VerbosityLevel,
    /// Where credential stores are read from
    pub store_paths: StorePaths,
    /// Reach every host over http:// regardless of config
    pub plain_http: bool,
}

impl AppContext {
    /// Build context with precedence: defaults > config file > env vars > CLI flags
    pub fn build(overrides: CliOverrides) -> Result<Self> {
        let config = Config::load_from_env()?;
        Ok(Self::with_config(config, overrides).with_store_paths(StorePaths::from_env()))
    }

    /// Builds a context from an already loaded configuration.
    pub fn with_config(mut config: Config, overrides: CliOverrides) -> Self {
        if let Some(timeout) = overrides.timeout {
            config.network.timeout = timeout;
        }

        Self {
            config,
            color: overrides.color,
            verbosity: overrides.verbosity,
            store_paths: StorePaths::default(),
            plain_http: overrides.plain_http,
        }
    }

    /// Replaces the credential store locations.
    pub fn with_store_paths(mut self, store_paths: StorePaths) -> Self {
        self.store_paths = store_paths;
        self
    }

    /// Scheme to use for `host`.
    pub fn scheme_for(&self, host: &str) -> Scheme {
        Scheme::from_plain_http(self.plain_http || self.config.is_plain_http(host))
    }

    /// Builds the HTTP client from the network settings.
    pub fn client(&self) -> Result<Client> {
        Client::with_config(
            ClientConfig::new()
                .with_timeout(self.config.network.timeout)
                .with_max_idle_per_host(self.config.network.max_idle_per_host),
        )
    }

    /// Resolves credentials for `host` and opens a registry session.
    pub fn connect(&self, host: &str) -> Result<Registry> {
        let resolver = CredentialResolver::new(self.store_paths.clone());
        Registry::connect(self.client()?, host, self.scheme_for(host), &resolver)
    }
}
