//! Authentication handling for OCI registries.
//!
//! This module covers everything needed to authenticate a request against a
//! Docker Registry v2 / OCI distribution endpoint:
//!
//! - [`store`] reads the Helm and Docker credential files
//! - [`helper`] runs `docker-credential-*` helper programs
//! - [`resolver`] combines both into a single priority-ordered lookup
//! - [`challenge`] parses `WWW-Authenticate: Bearer ...` headers
//!
//! The bearer-token exchange itself lives in [`crate::client`] because it
//! shares the HTTP client with the request dispatcher.

use base64::{Engine as _, engine::general_purpose};
use std::fmt;

pub mod challenge;
pub mod helper;
pub mod resolver;
pub mod store;

pub use challenge::Challenge;
pub use helper::{CredentialHelper, ProcessCredentialHelper};
pub use resolver::{CredentialResolver, CredentialSource, ResolvedCredential};
pub use store::{DockerConfig, HelmConfig, StorePaths};


/// A username/password pair resolved for one registry host.
///
/// Held only for the duration of a command; never written back anywhere.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    /// Username for authentication
    pub username: String,
    /// Password or secret for authentication
    pub password: String,
}

impl Credential {
    /// Creates a new credential.
    ///
    /// # Examples
    ///
    /// ```
    /// use libhelmrepo::auth::Credential;
    ///
    /// let cred = Credential::new("alice", "s3cret");
    /// assert_eq!(cred.username, "alice");
    /// ```
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

// Keep secrets out of debug output and logs.
impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Value of the `Authorization` header sent with a registry request.
#[derive(Clone, PartialEq, Eq)]
pub enum Authorization {
    /// HTTP Basic authentication with username and password
    Basic(Credential),

    /// Bearer token obtained from a token endpoint
    Bearer(String),
}

impl Authorization {
    /// Creates Basic authorization from a credential.
    pub fn basic(credential: &Credential) -> Self {
        Self::Basic(credential.clone())
    }

    /// Creates Bearer authorization from a token.
    ///
    /// # Examples
    ///
    /// ```
    /// use libhelmrepo::auth::Authorization;
    ///
    /// let auth = Authorization::bearer("token123");
    /// assert_eq!(auth.to_header_value(), "Bearer token123");
    /// ```
    pub fn bearer(token: impl Into<String>) -> Self {
        Self::Bearer(token.into())
    }

    /// Returns the Authorization header value.
    ///
    /// # Examples
    ///
    /// ```
    /// use libhelmrepo::auth::{Authorization, Credential};
    ///
    /// let auth = Authorization::basic(&Credential::new("user", "pass"));
    /// assert_eq!(auth.to_header_value(), "Basic dXNlcjpwYXNz");
    /// ```
    pub fn to_header_value(&self) -> String {
        match self {
            Self::Basic(credential) => {
                let raw = format!("{}:{}", credential.username, credential.password);
                format!("Basic {}", general_purpose::STANDARD.encode(raw))
            }
            Self::Bearer(token) => format!("Bearer {}", token),
        }
    }

    /// Returns the scheme name, for diagnostics.
    pub fn scheme(&self) -> &'static str {
        match self {
            Self::Basic(_) => "Basic",
            Self::Bearer(_) => "Bearer",
        }
    }
}

impl fmt::Debug for Authorization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Basic(credential) => f.debug_tuple("Basic").field(credential).finish(),
            Self::Bearer(_) => f.debug_tuple("Bearer").field(&"<redacted>").finish(),
        }
    }
}
