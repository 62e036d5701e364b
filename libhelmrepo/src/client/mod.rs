//! HTTP client for OCI registry communication.
//!
//! This module provides a thin blocking HTTP client built on reqwest. One
//! [`Client`] is built per process and shared by the request dispatcher
//! ([`Client::dispatch`]) and the bearer-token exchange
//! ([`Client::fetch_token`]).

use crate::auth::{Authorization, Challenge};
use crate::error::{AuthChallengeError, HelmRepoError, RegistryError, Result};
use log::debug;
use reqwest::Method;
use reqwest::blocking::Client as ReqwestClient;
use reqwest::header::{AUTHORIZATION, HeaderMap, WWW_AUTHENTICATE};
use serde::{Deserialize, Deserializer};
use std::time::Duration;

mod token;


/// Response header carrying the manifest digest.
pub const DOCKER_CONTENT_DIGEST: &str = "Docker-Content-Digest";

/// Union of the response bodies of the registry endpoints in use.
///
/// Which fields are populated depends on the endpoint: `repositories` for
/// `/v2/_catalog`, `name` and `tags` for `/v2/<name>/tags/list`, and
/// `content_digest` (from the `Docker-Content-Digest` header) for manifests.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RegistryResponse {
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub repositories: Vec<String>,
    #[serde(skip)]
    pub content_digest: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub errors: Vec<RegistryError>,
}

/// Registries send `null` for an empty list (e.g. a repository whose last tag
/// was deleted).
fn null_as_empty<'de, D, T>(deserializer: D) -> std::result::Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Configuration for the HTTP client.
///
/// # Examples
///
/// ```
/// use libhelmrepo::client::ClientConfig;
///
/// let config = ClientConfig::new()
///     .with_timeout(60)
///     .with_max_idle_per_host(20);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Request timeout in seconds (default: 30)
    pub timeout_seconds: u64,
    /// Maximum idle connections per host (default: 10)
    pub max_idle_per_host: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
            max_idle_per_host: 10,
        }
    }
}

impl ClientConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the request timeout in seconds.
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout_seconds = seconds;
        self
    }

    /// Sets the maximum idle connections per host.
    pub fn with_max_idle_per_host(mut self, max: usize) -> Self {
        self.max_idle_per_host = max;
        self
    }
}

/// HTTP client for registry and token endpoint requests.
#[derive(Debug, Clone)]
pub struct Client {
    /// The underlying HTTP client
    http_client: ReqwestClient,
    config: ClientConfig,
}

impl Client {
    /// Creates a client with default configuration.
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Creates a client with custom configuration.
    ///
    /// # Examples
    ///
    /// ```
    /// use libhelmrepo::client::{Client, ClientConfig};
    ///
    /// let client = Client::with_config(ClientConfig::new().with_timeout(5)).unwrap();
    /// assert_eq!(client.config().timeout_seconds, 5);
    /// ```
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let http_client = ReqwestClient::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .pool_max_idle_per_host(config.max_idle_per_host)
            .user_agent(concat!("helm-repo/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| HelmRepoError::network_with_source("Failed to create HTTP client", e))?;

        Ok(Self {
            http_client,
            config,
        })
    }

    /// Returns the configuration this client was built with.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Issues one registry API request and classifies the response.
    ///
    /// Classification, in order:
    ///
    /// 1. A parseable Bearer `WWW-Authenticate` header fails with
    ///    [`HelmRepoError::AuthChallenge`]. The challenge takes priority over
    ///    the body: the first structured error is attached when the body
    ///    decodes and has one, and is `None` otherwise.
    /// 2. A non-empty body is decoded as [`RegistryResponse`]; a decode
    ///    failure is a network error.
    /// 3. `content_digest` is taken from `Docker-Content-Digest`.
    /// 4. A non-empty `errors` list fails with [`HelmRepoError::Registry`]
    ///    carrying the first error.
    /// 5. A non-2xx status without structured errors is a network error,
    ///    never a success.
    /// 6. Otherwise the response is returned.
    pub fn dispatch(
        &self,
        method: Method,
        url: &str,
        authorization: &Authorization,
        headers: &[(&str, &str)],
    ) -> Result<RegistryResponse> {
        debug!("{} {} ({} auth)", method, url, authorization.scheme());

        let mut request = self
            .http_client
            .request(method, url)
            .header(AUTHORIZATION, authorization.to_header_value());
        for (name, value) in headers {
            request = request.header(*name, *value);
        }

        let response = request
            .send()
            .map_err(|e| self.translate_reqwest_error(e, url))?;

        let status = response.status();
        let response_headers = response.headers().clone();
        let body = response
            .bytes()
            .map_err(|e| HelmRepoError::network_with_source("Failed to read response body", e))?;

        // A usable challenge wins over whatever the body holds; the body only
        // contributes its first structured error, if it has one.
        if let Some(challenge) = Self::bearer_challenge(&response_headers) {
            debug!("{} answered with a bearer challenge from {}", url, challenge.realm);
            let error = serde_json::from_slice::<RegistryResponse>(&body)
                .ok()
                .and_then(|r| r.errors.into_iter().next());
            return Err(AuthChallengeError { error, challenge }.into());
        }

        let mut registry_response = if body.is_empty() {
            RegistryResponse::default()
        } else {
            serde_json::from_slice::<RegistryResponse>(&body).map_err(|e| {
                HelmRepoError::network_with_source(
                    format!("Failed to parse response from {} (HTTP {})", url, status.as_u16()),
                    e,
                )
            })?
        };

        registry_response.content_digest = response_headers
            .get(DOCKER_CONTENT_DIGEST)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();

        if let Some(first) = registry_response.errors.first() {
            return Err(HelmRepoError::Registry(first.clone()));
        }

        if !status.is_success() {
            return Err(HelmRepoError::network(format!(
                "HTTP {} from {}",
                status.as_u16(),
                url
            )));
        }

        Ok(registry_response)
    }

    /// Extracts a valid Bearer challenge from response headers, if any.
    fn bearer_challenge(headers: &HeaderMap) -> Option<Challenge> {
        let value = headers.get(WWW_AUTHENTICATE)?.to_str().ok()?;
        match Challenge::parse(value) {
            Ok(challenge) => Some(challenge),
            Err(e) => {
                debug!("Ignoring unusable WWW-Authenticate header: {}", e);
                None
            }
        }
    }

    /// Translates a reqwest error into a HelmRepoError.
    fn translate_reqwest_error(&self, error: reqwest::Error, url: &str) -> HelmRepoError {
        if error.is_timeout() {
            HelmRepoError::network(format!(
                "Request to {} timed out after {} seconds",
                url, self.config.timeout_seconds
            ))
        } else if error.is_connect() {
            HelmRepoError::network_with_source(format!("Failed to connect to {}", url), error)
        } else if error.is_builder() {
            HelmRepoError::validation_with_source(format!("Invalid request URL {}", url), error)
        } else {
            HelmRepoError::network_with_source(
                format!("Network error communicating with {}", url),
                error,
            )
        }
    }
}
