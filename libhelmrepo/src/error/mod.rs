//! Error types for helm-repo
//!
//! Every failure the credential and registry layers can produce is a variant
//! of [`HelmRepoError`]. Two of them carry structured registry payloads:
//! [`RegistryError`] is the registry API's error envelope entry, and
//! [`AuthChallengeError`] is the signal that a request may be retried with a
//! bearer token.

use crate::auth::Challenge;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;


/// Registry error code for a repository or manifest that does not exist.
pub const NAME_UNKNOWN: &str = "NAME_UNKNOWN";

/// One entry of the registry API error envelope `{"errors": [...]}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistryError {
    /// Machine-readable error code (e.g. `NAME_UNKNOWN`, `UNAUTHORIZED`)
    #[serde(default)]
    pub code: String,
    /// Human-readable message
    #[serde(default)]
    pub message: String,
    /// Opaque, registry-specific detail
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<serde_json::Value>,
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.code.is_empty(), self.message.is_empty()) {
            (false, false) => write!(f, "{}: {}", self.code, self.message),
            (true, false) => f.write_str(&self.message),
            (false, true) => f.write_str(&self.code),
            (true, true) => f.write_str("unspecified registry error"),
        }
    }
}

impl std::error::Error for RegistryError {}

/// A response that asked for bearer authentication.
///
/// `error` is the first structured error of the body, if the registry sent
/// one alongside the challenge.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthChallengeError {
    pub error: Option<RegistryError>,
    pub challenge: Challenge,
}

impl fmt::Display for AuthChallengeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.error {
            Some(error) => write!(
                f,
                "{} (bearer token required from {})",
                error, self.challenge.realm
            ),
            None => write!(f, "bearer token required from {}", self.challenge.realm),
        }
    }
}

impl std::error::Error for AuthChallengeError {}

/// Main error type for helm-repo operations
#[derive(Error, Debug)]
pub enum HelmRepoError {
    /// Network-related errors (connection, timeout, unreadable body)
    #[error("Network error: {message}")]
    Network {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// No credential store or helper produced credentials for the host
    #[error("credentials not found for {host}")]
    CredentialNotFound { host: String },

    /// A stored `auth` blob could not be decoded
    #[error("Invalid stored credentials: {message}")]
    CredentialDecode {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A credential helper failed for a reason other than "not found"
    #[error("Credential helper '{helper}' failed: {message}")]
    HelperInvocation {
        helper: String,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Malformed `WWW-Authenticate` header value
    #[error("Malformed WWW-Authenticate header: {message}")]
    ChallengeParse { message: String },

    /// The token endpoint could not be reached or answered nonsense
    #[error("Error fetching token from {realm}: {message}")]
    TokenExchange {
        realm: String,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Structured error returned by the registry API
    #[error("Registry error: {0}")]
    Registry(RegistryError),

    /// The registry wants a bearer token; the request can be retried
    #[error("Authentication challenge: {0}")]
    AuthChallenge(AuthChallengeError),

    /// The registry challenged again after a bearer token was presented
    #[error("Registry rejected the bearer token issued by {realm}")]
    ChallengeRepeated { realm: String },

    /// Validation errors (bad reference, missing digest, etc.)
    #[error("Validation error: {message}")]
    Validation {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration errors (invalid config file, missing settings)
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        path: Option<String>,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

/// Result type alias for helm-repo operations
pub type Result<T> = std::result::Result<T, HelmRepoError>;

impl HelmRepoError {
    /// Creates a new network error.
    ///
    /// # Examples
    ///
    /// ```
    /// use libhelmrepo::error::HelmRepoError;
    ///
    /// let err = HelmRepoError::network("connection refused");
    /// assert!(matches!(err, HelmRepoError::Network { .. }));
    /// ```
    pub fn network<S: Into<String>>(message: S) -> Self {
        Self::Network {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a new network error with a source error.
    pub fn network_with_source<S, E>(message: S, source: E) -> Self
    where
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Network {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Creates a credential-not-found error for a host.
    pub fn credential_not_found<S: Into<String>>(host: S) -> Self {
        Self::CredentialNotFound { host: host.into() }
    }

    /// Creates a credential decode error.
    ///
    /// # Examples
    ///
    /// ```
    /// use libhelmrepo::error::HelmRepoError;
    ///
    /// let err = HelmRepoError::credential_decode("missing ':' separator");
    /// assert!(matches!(err, HelmRepoError::CredentialDecode { .. }));
    /// ```
    pub fn credential_decode<S: Into<String>>(message: S) -> Self {
        Self::CredentialDecode {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a credential decode error with a source error.
    pub fn credential_decode_with_source<S, E>(message: S, source: E) -> Self
    where
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::CredentialDecode {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Creates a helper invocation error.
    pub fn helper<H: Into<String>, S: Into<String>>(helper: H, message: S) -> Self {
        Self::HelperInvocation {
            helper: helper.into(),
            message: message.into(),
            source: None,
        }
    }

    /// Creates a helper invocation error with a source error.
    pub fn helper_with_source<H, S, E>(helper: H, message: S, source: E) -> Self
    where
        H: Into<String>,
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::HelperInvocation {
            helper: helper.into(),
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Creates a challenge parse error.
    pub fn challenge_parse<S: Into<String>>(message: S) -> Self {
        Self::ChallengeParse {
            message: message.into(),
        }
    }

    /// Creates a token exchange error.
    pub fn token_exchange<R: Into<String>, S: Into<String>>(realm: R, message: S) -> Self {
        Self::TokenExchange {
            realm: realm.into(),
            message: message.into(),
            source: None,
        }
    }

    /// Creates a token exchange error with a source error.
    pub fn token_exchange_with_source<R, S, E>(realm: R, message: S, source: E) -> Self
    where
        R: Into<String>,
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::TokenExchange {
            realm: realm.into(),
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Creates a new validation error.
    ///
    /// # Examples
    ///
    /// ```
    /// use libhelmrepo::error::HelmRepoError;
    ///
    /// let err = HelmRepoError::validation("artifact path is required");
    /// assert!(matches!(err, HelmRepoError::Validation { .. }));
    /// ```
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a new validation error with a source error.
    pub fn validation_with_source<S, E>(message: S, source: E) -> Self
    where
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Validation {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Creates a new configuration error with a source error.
    ///
    /// # Examples
    ///
    /// ```
    /// use libhelmrepo::error::HelmRepoError;
    /// use std::io;
    ///
    /// let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
    /// let err = HelmRepoError::config_with_source("failed to read config", Some("/path/to/config.yaml"), io_err);
    /// assert!(matches!(err, HelmRepoError::Config { .. }));
    /// ```
    pub fn config_with_source<S, E>(message: S, path: Option<S>, source: E) -> Self
    where
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Config {
            message: message.into(),
            path: path.map(|p| p.into()),
            source: Some(Box::new(source)),
        }
    }

    /// Returns true if this is a registry `NAME_UNKNOWN` error.
    pub fn is_name_unknown(&self) -> bool {
        matches!(self, Self::Registry(e) if e.code == NAME_UNKNOWN)
    }

    /// Returns true if this error means credentials could not be found.
    pub fn is_credential_not_found(&self) -> bool {
        matches!(self, Self::CredentialNotFound { .. })
    }
}

impl From<RegistryError> for HelmRepoError {
    fn from(error: RegistryError) -> Self {
        Self::Registry(error)
    }
}

impl From<AuthChallengeError> for HelmRepoError {
    fn from(error: AuthChallengeError) -> Self {
        Self::AuthChallenge(error)
    }
}
