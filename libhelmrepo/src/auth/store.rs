//! Read-only access to the on-disk credential stores.
//!
//! Two independent JSON files may hold registry credentials:
//!
//! - the Helm registry config (`$HELM_CONFIG_HOME/registry/config.json`, else
//!   `<user-config-dir>/helm/registry/config.json`), shaped
//!   `{"auths": {host: {"auth": base64("user:pass")}}}`
//! - the Docker config (`$DOCKER_CONFIG/config.json`, else
//!   `~/.docker/config.json`), which adds a default `credsStore` helper and
//!   per-host `credHelpers` overrides to the same `auths` map.
//!
//! Nothing here ever writes to either file.

use crate::auth::Credential;
use crate::error::{HelmRepoError, Result};
use base64::{Engine as _, engine::general_purpose};
use serde::Deserialize;
use std::collections::HashMap;
use std::env;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;

/// Environment variable overriding the Helm config directory.
pub const HELM_CONFIG_HOME_ENV: &str = "HELM_CONFIG_HOME";

/// Environment variable overriding the Docker config directory.
pub const DOCKER_CONFIG_ENV: &str = "DOCKER_CONFIG";

/// One host entry of an `auths` map.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct AuthEntry {
    /// Base64-encoded `username:password`
    #[serde(default)]
    pub auth: Option<String>,
}

impl AuthEntry {
    /// Decodes the inline credential of this entry.
    pub fn credential(&self) -> Result<Credential> {
        match &self.auth {
            Some(auth) => decode_auth(auth),
            None => Err(HelmRepoError::credential_decode(
                "entry has no 'auth' value",
            )),
        }
    }
}

/// The Helm registry credential file.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct HelmConfig {
    #[serde(default)]
    pub auths: HashMap<String, AuthEntry>,
}

impl HelmConfig {
    /// Loads and parses a Helm registry config file.
    pub fn load(path: &Path) -> Result<Self> {
        read_json(path)
    }
}

/// The Docker CLI config file.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct DockerConfig {
    /// Default credential helper for hosts without an override
    #[serde(rename = "credsStore", default)]
    pub creds_store: Option<String>,
    /// Per-host credential helpers
    #[serde(rename = "credHelpers", default)]
    pub cred_helpers: HashMap<String, String>,
    /// Inline credentials
    #[serde(default)]
    pub auths: HashMap<String, AuthEntry>,
}

impl DockerConfig {
    /// Loads and parses a Docker config file.
    pub fn load(path: &Path) -> Result<Self> {
        read_json(path)
    }

    /// Returns the helper to ask for `host`: a per-host override first,
    /// then the default `credsStore`. Empty names count as unset.
    ///
    /// # Examples
    ///
    /// ```
    /// use libhelmrepo::auth::DockerConfig;
    ///
    /// let config: DockerConfig = serde_json::from_str(
    ///     r#"{"credsStore":"desktop","credHelpers":{"gcr.io":"gcloud"}}"#,
    /// ).unwrap();
    /// assert_eq!(config.helper_for("gcr.io"), Some("gcloud"));
    /// assert_eq!(config.helper_for("ghcr.io"), Some("desktop"));
    /// ```
    pub fn helper_for(&self, host: &str) -> Option<&str> {
        self.cred_helpers
            .get(host)
            .map(String::as_str)
            .filter(|h| !h.is_empty())
            .or_else(|| self.creds_store.as_deref().filter(|h| !h.is_empty()))
    }
}

/// Locations of the two credential stores.
///
/// A `None` path means the location could not be determined (no home or
/// config directory); the store is then treated as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StorePaths {
    /// Path of the Helm registry `config.json`
    pub helm: Option<PathBuf>,
    /// Path of the Docker `config.json`
    pub docker: Option<PathBuf>,
}

impl StorePaths {
    /// Creates store paths from explicit file locations.
    pub fn new(helm: impl Into<PathBuf>, docker: impl Into<PathBuf>) -> Self {
        Self {
            helm: Some(helm.into()),
            docker: Some(docker.into()),
        }
    }

    /// Resolves store paths from the process environment and user directories.
    pub fn from_env() -> Self {
        Self::resolve(
            env::var_os(HELM_CONFIG_HOME_ENV),
            env::var_os(DOCKER_CONFIG_ENV),
            dirs::config_dir(),
            dirs::home_dir(),
        )
    }

    /// Resolves store paths from explicit inputs.
    ///
    /// Environment overrides win when set and non-empty; otherwise the user
    /// config directory (Helm) and home directory (Docker) are used.
    ///
    /// # Examples
    ///
    /// ```
    /// use libhelmrepo::auth::StorePaths;
    /// use std::path::PathBuf;
    ///
    /// let paths = StorePaths::resolve(
    ///     None,
    ///     Some("/etc/docker".into()),
    ///     Some(PathBuf::from("/home/me/.config")),
    ///     Some(PathBuf::from("/home/me")),
    /// );
    /// assert_eq!(paths.helm, Some(PathBuf::from("/home/me/.config/helm/registry/config.json")));
    /// assert_eq!(paths.docker, Some(PathBuf::from("/etc/docker/config.json")));
    /// ```
    pub fn resolve(
        helm_config_home: Option<OsString>,
        docker_config: Option<OsString>,
        config_dir: Option<PathBuf>,
        home_dir: Option<PathBuf>,
    ) -> Self {
        let helm = match non_empty(helm_config_home) {
            Some(dir) => Some(PathBuf::from(dir).join("registry").join("config.json")),
            None => config_dir.map(|d| d.join("helm").join("registry").join("config.json")),
        };

        let docker = match non_empty(docker_config) {
            Some(dir) => Some(PathBuf::from(dir).join("config.json")),
            None => home_dir.map(|d| d.join(".docker").join("config.json")),
        };

        Self { helm, docker }
    }
}

fn non_empty(value: Option<OsString>) -> Option<OsString> {
    value.filter(|v| !v.is_empty())
}

/// Decodes a base64 `username:password` blob.
///
/// The decoded text is split on the first `:`; a blob without one is a
/// decode failure.
///
/// # Examples
///
/// ```
/// use libhelmrepo::auth::store::decode_auth;
///
/// let cred = decode_auth("YWxpY2U6czNjcmV0").unwrap();
/// assert_eq!(cred.username, "alice");
/// assert_eq!(cred.password, "s3cret");
/// ```
pub fn decode_auth(encoded: &str) -> Result<Credential> {
    let decoded = general_purpose::STANDARD
        .decode(encoded.trim())
        .map_err(|e| HelmRepoError::credential_decode_with_source("auth is not valid base64", e))?;

    let decoded = String::from_utf8(decoded)
        .map_err(|e| HelmRepoError::credential_decode_with_source("auth is not valid UTF-8", e))?;

    let (username, password) = decoded
        .split_once(':')
        .ok_or_else(|| HelmRepoError::credential_decode("auth has no ':' separator"))?;

    Ok(Credential::new(username, password))
}

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T> {
    let contents = fs::read_to_string(path).map_err(|e| {
        HelmRepoError::config_with_source(
            "Failed to read credentials file".to_string(),
            Some(path.display().to_string()),
            e,
        )
    })?;

    serde_json::from_str(&contents).map_err(|e| {
        HelmRepoError::config_with_source(
            "Failed to parse credentials file".to_string(),
            Some(path.display().to_string()),
            e,
        )
    })
}
