//! Parsing of `WWW-Authenticate: Bearer ...` challenges.

use crate::error::{HelmRepoError, Result};
use std::str::FromStr;

#[cfg(test)]
#[path = "challenge_tests.rs"]
mod tests;

const BEARER_PREFIX: &str = "Bearer ";

/// Instructions from a registry on how to obtain a bearer token.
///
/// A `Challenge` is only ever built fully populated: a header that lacks any
/// of `realm`, `service` or `scope` fails to parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Challenge {
    /// Token endpoint URL
    pub realm: String,
    /// Service the token is issued for
    pub service: String,
    /// Access being requested (e.g. `repository:charts/app:pull`)
    pub scope: String,
}

impl Challenge {
    /// Parses a `WWW-Authenticate` header value.
    ///
    /// The value must start with `Bearer ` and continue with comma-separated
    /// `key=value` pairs in any order. Values may be double-quoted; a comma
    /// inside quotes does not separate pairs. Unknown keys are ignored. A
    /// pair without `=` fails the whole header.
    ///
    /// # Examples
    ///
    /// ```
    /// use libhelmrepo::auth::Challenge;
    ///
    /// let header = r#"Bearer realm="https://auth.example/token",service="registry.example",scope="repository:foo:pull""#;
    /// let challenge = Challenge::parse(header).unwrap();
    /// assert_eq!(challenge.realm, "https://auth.example/token");
    /// assert_eq!(challenge.service, "registry.example");
    /// assert_eq!(challenge.scope, "repository:foo:pull");
    /// ```
    pub fn parse(header: &str) -> Result<Self> {
        let params = header.strip_prefix(BEARER_PREFIX).ok_or_else(|| {
            HelmRepoError::challenge_parse(format!(
                "expected a '{}' challenge, got '{}'",
                BEARER_PREFIX.trim_end(),
                header
            ))
        })?;

        if params.trim().is_empty() {
            return Err(HelmRepoError::challenge_parse(
                "challenge carries no parameters",
            ));
        }

        let mut realm = None;
        let mut service = None;
        let mut scope = None;

        for param in split_params(params) {
            let (key, value) = param.split_once('=').ok_or_else(|| {
                HelmRepoError::challenge_parse(format!(
                    "parameter '{}' has no '=' separator",
                    param.trim()
                ))
            })?;

            let value = unquote(value.trim()).to_string();
            match key.trim() {
                "realm" => realm = Some(value),
                "service" => service = Some(value),
                "scope" => scope = Some(value),
                _ => {}
            }
        }

        Ok(Self {
            realm: required("realm", realm)?,
            service: required("service", service)?,
            scope: required("scope", scope)?,
        })
    }
}

impl FromStr for Challenge {
    type Err = HelmRepoError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Splits on commas that are not inside a double-quoted value.
fn split_params(params: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut in_quotes = false;
    let mut start = 0;

    for (i, c) in params.char_indices() {
        match c {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                parts.push(&params[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&params[start..]);

    parts
}

/// Strips one leading and one trailing `"` when both are present.
fn unquote(value: &str) -> &str {
    if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        &value[1..value.len() - 1]
    } else {
        value
    }
}

fn required(key: &str, value: Option<String>) -> Result<String> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(HelmRepoError::challenge_parse(format!(
            "missing required '{}' parameter",
            key
        ))),
    }
}
