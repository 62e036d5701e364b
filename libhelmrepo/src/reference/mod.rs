//! Artifact reference parsing.
//!
//! Command arguments name a registry host and, optionally, a repository path
//! below it: `registry.example.com/charts/app`. An `oci://` prefix, as Helm
//! prints it, is accepted and ignored.

use crate::error::{HelmRepoError, Result};
use std::fmt;
use std::str::FromStr;


/// Scheme prefix Helm uses for OCI chart locations.
pub const OCI_SCHEME: &str = "oci://";

/// A registry host with an optional repository path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactRef {
    host: String,
    path: Option<String>,
}

impl FromStr for ArtifactRef {
    type Err = HelmRepoError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let rest = trimmed.strip_prefix(OCI_SCHEME).unwrap_or(trimmed);
        let rest = rest.trim_end_matches('/');

        let (host, path) = match rest.split_once('/') {
            Some((host, path)) => (host, Some(path)),
            None => (rest, None),
        };

        if host.is_empty() {
            return Err(HelmRepoError::validation(format!(
                "Invalid artifact reference '{}': missing registry host",
                s
            )));
        }

        let path = path.filter(|p| !p.is_empty());
        if let Some(p) = path
            && p.split('/').any(str::is_empty)
        {
            return Err(HelmRepoError::validation(format!(
                "Invalid artifact reference '{}': empty path segment",
                s
            )));
        }

        Ok(Self {
            host: host.to_string(),
            path: path.map(str::to_string),
        })
    }
}

impl fmt::Display for ArtifactRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.path {
            Some(path) => write!(f, "{}/{}", self.host, path),
            None => f.write_str(&self.host),
        }
    }
}

impl ArtifactRef {
    /// Returns the registry host (with port, if any).
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns the repository path, if one was given.
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// Returns the repository path, failing if the reference is a bare host.
    pub fn require_path(&self) -> Result<&str> {
        self.path().ok_or_else(|| {
            HelmRepoError::validation(format!(
                "'{}' names a registry host only; a repository path is required",
                self.host
            ))
        })
    }
}
