//! Bearer token exchange against a challenge's realm.

use super::Client;
use crate::auth::{Challenge, Credential};
use crate::error::{HelmRepoError, Result};
use log::debug;
use serde::Deserialize;

#[cfg(test)]
#[path = "token_tests.rs"]
mod tests;

/// Body returned by a token endpoint.
///
/// Docker's token protocol names the field `token`; OAuth2-style endpoints
/// use `access_token`. Either is accepted, `token` first.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(default)]
    token: Option<String>,
    #[serde(default)]
    access_token: Option<String>,
}

impl TokenResponse {
    fn into_token(self) -> Option<String> {
        self.token
            .filter(|t| !t.is_empty())
            .or(self.access_token.filter(|t| !t.is_empty()))
    }
}

impl Client {
    /// Exchanges Basic credentials for a bearer token.
    ///
    /// Sends `GET <realm>?service=<service>&scope=<scope>` with HTTP Basic
    /// authentication and reads the token from the JSON body. The status code
    /// is not inspected: a body without a token is the failure signal.
    ///
    /// # Errors
    ///
    /// Returns [`HelmRepoError::TokenExchange`] naming the realm if the
    /// request fails, the body is not JSON, or it carries no token.
    pub fn fetch_token(&self, challenge: &Challenge, credential: &Credential) -> Result<String> {
        let realm = challenge.realm.as_str();
        debug!(
            "Requesting bearer token from {} (service={}, scope={})",
            realm, challenge.service, challenge.scope
        );

        let response = self
            .http_client
            .get(realm)
            .basic_auth(&credential.username, Some(&credential.password))
            .query(&[
                ("service", challenge.service.as_str()),
                ("scope", challenge.scope.as_str()),
            ])
            .send()
            .map_err(|e| HelmRepoError::token_exchange_with_source(realm, "request failed", e))?;

        let status = response.status();
        let body = response.bytes().map_err(|e| {
            HelmRepoError::token_exchange_with_source(realm, "failed to read response body", e)
        })?;

        let parsed: TokenResponse = serde_json::from_slice(&body).map_err(|e| {
            HelmRepoError::token_exchange_with_source(
                realm,
                format!("invalid token response (HTTP {})", status.as_u16()),
                e,
            )
        })?;

        parsed.into_token().ok_or_else(|| {
            HelmRepoError::token_exchange(
                realm,
                format!("response carried no token (HTTP {})", status.as_u16()),
            )
        })
    }
}
