//! Priority-ordered credential lookup.
//!
//! For a given host, sources are tried in a fixed order and the first match
//! wins:
//!
//! 1. Helm registry config `auths`
//! 2. Docker config `auths`
//! 3. The Docker config's helper for that host (`credHelpers` override, else
//!    `credsStore`)
//!
//! A store that is missing, unreadable or malformed, and an entry whose
//! `auth` blob does not decode, are misses, not failures. A helper that fails
//! for any reason other than "credentials not found" is fatal.

use crate::auth::helper::{CredentialHelper, ProcessCredentialHelper};
use crate::auth::store::{DockerConfig, HelmConfig, StorePaths};
use crate::auth::Credential;
use crate::error::{HelmRepoError, Result};
use log::{debug, warn};
use std::fmt;
use std::path::Path;

#[cfg(test)]
#[path = "resolver_tests.rs"]
mod tests;

/// Where a resolved credential came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialSource {
    /// Inline entry of the Helm registry config
    HelmConfig,
    /// Inline entry of the Docker config
    DockerConfig,
    /// A credential helper, by name
    Helper(String),
}

impl fmt::Display for CredentialSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HelmConfig => f.write_str("Helm registry config"),
            Self::DockerConfig => f.write_str("Docker config"),
            Self::Helper(name) => write!(f, "credential helper '{}'", name),
        }
    }
}

/// A credential together with the source that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedCredential {
    pub credential: Credential,
    pub source: CredentialSource,
}

/// Resolves registry hosts to credentials.
///
/// # Examples
///
/// ```no_run
/// use libhelmrepo::auth::{CredentialResolver, StorePaths};
///
/// # fn example() -> libhelmrepo::Result<()> {
/// let resolver = CredentialResolver::new(StorePaths::from_env());
/// let resolved = resolver.resolve("registry.example.com")?;
/// println!("using {} from {}", resolved.credential.username, resolved.source);
/// # Ok(())
/// # }
/// ```
pub struct CredentialResolver {
    paths: StorePaths,
    helper: Box<dyn CredentialHelper>,
}

impl CredentialResolver {
    /// Creates a resolver that runs helpers as subprocesses.
    pub fn new(paths: StorePaths) -> Self {
        Self::with_helper(paths, Box::new(ProcessCredentialHelper::new()))
    }

    /// Creates a resolver with a custom helper transport.
    pub fn with_helper(paths: StorePaths, helper: Box<dyn CredentialHelper>) -> Self {
        Self { paths, helper }
    }

    /// Returns the store locations this resolver reads.
    pub fn paths(&self) -> &StorePaths {
        &self.paths
    }

    /// Resolves credentials for `host`.
    ///
    /// # Errors
    ///
    /// - [`HelmRepoError::CredentialNotFound`] if no source has credentials
    /// - [`HelmRepoError::HelperInvocation`] if the selected helper fails
    pub fn resolve(&self, host: &str) -> Result<ResolvedCredential> {
        if let Some(config) = self.load_store("Helm", self.paths.helm.as_deref(), HelmConfig::load)
            && let Some(entry) = config.auths.get(host)
        {
            match entry.credential() {
                Ok(credential) => {
                    debug!("Found {} in Helm registry config", host);
                    return Ok(ResolvedCredential {
                        credential,
                        source: CredentialSource::HelmConfig,
                    });
                }
                Err(e) => warn!("Skipping Helm registry config entry for {}: {}", host, e),
            }
        }

        let Some(docker) =
            self.load_store("Docker", self.paths.docker.as_deref(), DockerConfig::load)
        else {
            return Err(HelmRepoError::credential_not_found(host));
        };

        if let Some(entry) = docker.auths.get(host) {
            match entry.credential() {
                Ok(credential) => {
                    debug!("Found {} in Docker config", host);
                    return Ok(ResolvedCredential {
                        credential,
                        source: CredentialSource::DockerConfig,
                    });
                }
                // Docker leaves empty entries behind when a helper holds the secret.
                Err(e) => debug!("Docker config entry for {} has no usable auth: {}", host, e),
            }
        }

        if let Some(helper) = docker.helper_for(host) {
            debug!("Asking credential helper '{}' for {}", helper, host);
            return match self.helper.get(helper, host)? {
                Some(credential) => Ok(ResolvedCredential {
                    credential,
                    source: CredentialSource::Helper(helper.to_string()),
                }),
                None => Err(HelmRepoError::credential_not_found(host)),
            };
        }

        Err(HelmRepoError::credential_not_found(host))
    }

    fn load_store<T>(
        &self,
        name: &str,
        path: Option<&Path>,
        load: fn(&Path) -> Result<T>,
    ) -> Option<T> {
        let path = path?;
        if !path.exists() {
            debug!("{} credential store {} does not exist", name, path.display());
            return None;
        }

        match load(path) {
            Ok(config) => Some(config),
            Err(e) => {
                warn!("Ignoring {} credential store: {}", name, e);
                None
            }
        }
    }
}
