//! Registry operations module.
//!
//! [`Registry`] is an authenticated session against one registry host. Every
//! operation goes through [`Registry::send`], which performs the Docker
//! Registry v2 handshake:
//!
//! 1. send the request with Basic credentials
//! 2. if the registry answers with a bearer challenge, exchange the same
//!    credentials for a token at the challenge's realm
//! 3. retry once with `Authorization: Bearer <token>`
//!
//! A second challenge on the retried request is fatal
//! ([`HelmRepoError::ChallengeRepeated`]). Tokens are not cached between
//! operations: each request carries its own scope.

use crate::auth::{Authorization, Credential, CredentialResolver};
use crate::client::{Client, RegistryResponse};
use crate::error::{HelmRepoError, Result};
use log::debug;
use oci_spec::image::MediaType;
use reqwest::Method;


/// URL scheme used to reach a registry host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Scheme {
    #[default]
    Https,
    Http,
}

impl Scheme {
    /// Picks `http` when `plain_http` is set, `https` otherwise.
    pub fn from_plain_http(plain_http: bool) -> Self {
        if plain_http { Self::Http } else { Self::Https }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Https => "https",
            Self::Http => "http",
        }
    }
}

/// Authenticated session against one registry host.
pub struct Registry {
    /// HTTP client shared with the token exchange.
    client: Client,
    /// `<scheme>://<host>`, without a trailing slash.
    base_url: String,
    credential: Credential,
}

impl Registry {
    /// Creates a session for `host` reached over `scheme`.
    ///
    /// # Examples
    ///
    /// ```
    /// use libhelmrepo::auth::Credential;
    /// use libhelmrepo::client::Client;
    /// use libhelmrepo::registry::{Registry, Scheme};
    ///
    /// let client = Client::new().unwrap();
    /// let registry = Registry::new(
    ///     client,
    ///     "localhost:5000",
    ///     Scheme::Http,
    ///     Credential::new("admin", "admin"),
    /// );
    /// assert_eq!(registry.base_url(), "http://localhost:5000");
    /// ```
    pub fn new(client: Client, host: &str, scheme: Scheme, credential: Credential) -> Self {
        Self::with_base_url(client, format!("{}://{}", scheme.as_str(), host), credential)
    }

    /// Resolves credentials for `host` and opens a session.
    ///
    /// # Errors
    ///
    /// Fails with whatever the resolver reports, typically
    /// [`HelmRepoError::CredentialNotFound`].
    pub fn connect(
        client: Client,
        host: &str,
        scheme: Scheme,
        resolver: &CredentialResolver,
    ) -> Result<Self> {
        let resolved = resolver.resolve(host)?;
        debug!(
            "Using credentials for {} from {} (user {})",
            host, resolved.source, resolved.credential.username
        );
        Ok(Self::new(client, host, scheme, resolved.credential))
    }

    /// Creates a session against an explicit base URL.
    pub fn with_base_url<S: Into<String>>(
        client: Client,
        base_url: S,
        credential: Credential,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client,
            base_url,
            credential,
        }
    }

    /// Returns the base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Lists every repository in the registry catalog, in server order.
    pub fn list_repositories(&self) -> Result<Vec<String>> {
        let url = format!("{}/v2/_catalog", self.base_url);
        Ok(self.send(Method::GET, &url, &[])?.repositories)
    }

    /// Lists the tags of repository `path`, in server order.
    pub fn list_tags(&self, path: &str) -> Result<Vec<String>> {
        let url = format!("{}/v2/{}/tags/list", self.base_url, path);
        Ok(self.send(Method::GET, &url, &[])?.tags)
    }

    /// Resolves `reference` (a tag or digest) in `path` to a manifest digest.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the registry does not send a
    /// `Docker-Content-Digest` header.
    pub fn manifest_digest(&self, path: &str, reference: &str) -> Result<String> {
        let url = format!("{}/v2/{}/manifests/{}", self.base_url, path, reference);
        let accept = MediaType::ImageManifest.to_string();
        let response = self.send(Method::GET, &url, &[("Accept", accept.as_str())])?;

        if response.content_digest.is_empty() {
            return Err(HelmRepoError::validation(format!(
                "Registry returned no digest for {}:{}",
                path, reference
            )));
        }
        Ok(response.content_digest)
    }

    /// Deletes the manifest `digest` from repository `path`.
    pub fn delete_manifest(&self, path: &str, digest: &str) -> Result<()> {
        if digest.is_empty() {
            return Err(HelmRepoError::validation("Manifest digest must not be empty"));
        }
        let url = format!("{}/v2/{}/manifests/{}", self.base_url, path, digest);
        self.send(Method::DELETE, &url, &[])?;
        Ok(())
    }

    /// Sends one request, retrying once with a bearer token on a challenge.
    pub fn send(
        &self,
        method: Method,
        url: &str,
        headers: &[(&str, &str)],
    ) -> Result<RegistryResponse> {
        let basic = Authorization::basic(&self.credential);
        let challenge = match self.client.dispatch(method.clone(), url, &basic, headers) {
            Err(HelmRepoError::AuthChallenge(challenge_error)) => challenge_error.challenge,
            other => return other,
        };

        debug!(
            "Retrying {} {} with a bearer token for scope {}",
            method, url, challenge.scope
        );
        let token = self.client.fetch_token(&challenge, &self.credential)?;
        let bearer = Authorization::bearer(token);

        match self.client.dispatch(method, url, &bearer, headers) {
            Err(HelmRepoError::AuthChallenge(repeated)) => Err(HelmRepoError::ChallengeRepeated {
                realm: repeated.challenge.realm,
            }),
            other => other,
        }
    }
}
