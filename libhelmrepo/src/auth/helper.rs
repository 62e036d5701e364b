//! Docker credential helper support.
//!
//! A credential helper is an external program named
//! `docker-credential-<name>` that, when run with `get`, reads a hostname on
//! stdin and prints `{"Username": ..., "Secret": ..., "ServerURL": ...}`.
//! Output starting with `credentials not found` means the helper has nothing
//! for that host.

use crate::auth::Credential;
use crate::error::{HelmRepoError, Result};
use log::debug;
use serde::Deserialize;
use std::io::{self, ErrorKind, Write};
use std::process::{Command, Stdio};

#[cfg(test)]
#[path = "helper_tests.rs"]
mod tests;

/// Default program name prefix for credential helpers.
pub const HELPER_PROGRAM_PREFIX: &str = "docker-credential-";

/// Output prefix a helper uses to report a miss.
pub const CREDENTIALS_NOT_FOUND: &str = "credentials not found";

/// Looks up credentials through a named credential helper.
///
/// Implementations return `Ok(None)` when the helper has no credentials for
/// the host and an error for any other failure.
pub trait CredentialHelper {
    fn get(&self, helper: &str, host: &str) -> Result<Option<Credential>>;
}

/// Response printed by a helper's `get` command.
#[derive(Debug, Deserialize)]
struct HelperResponse {
    #[serde(rename = "Username")]
    username: String,
    #[serde(rename = "Secret")]
    secret: String,
    #[serde(rename = "ServerURL", default)]
    _server_url: Option<String>,
}

/// Runs helper programs as subprocesses.
#[derive(Debug, Clone)]
pub struct ProcessCredentialHelper {
    program_prefix: String,
}

impl Default for ProcessCredentialHelper {
    fn default() -> Self {
        Self {
            program_prefix: HELPER_PROGRAM_PREFIX.to_string(),
        }
    }
}

impl ProcessCredentialHelper {
    /// Creates an invoker using the standard `docker-credential-` prefix.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an invoker with a custom program prefix, which may include a
    /// directory (e.g. `/usr/local/bin/docker-credential-`).
    pub fn with_prefix(program_prefix: impl Into<String>) -> Self {
        Self {
            program_prefix: program_prefix.into(),
        }
    }

    /// Returns the program that would be run for `helper`.
    pub fn program_name(&self, helper: &str) -> String {
        format!("{}{}", self.program_prefix, helper)
    }
}

impl CredentialHelper for ProcessCredentialHelper {
    fn get(&self, helper: &str, host: &str) -> Result<Option<Credential>> {
        let program = self.program_name(helper);
        debug!("Running credential helper {} for {}", program, host);

        let mut child = Command::new(&program)
            .arg("get")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                HelmRepoError::helper_with_source(helper, format!("failed to run {}", program), e)
            })?;

        // Dropping stdin closes the pipe, so the child is always reaped below.
        let written = match child.stdin.take() {
            Some(mut stdin) => stdin.write_all(host.as_bytes()),
            None => Ok(()),
        };

        let output = child.wait_with_output().map_err(|e| {
            HelmRepoError::helper_with_source(helper, format!("failed to wait for {}", program), e)
        })?;
        check_stdin_write(helper, written)?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);

        if !output.status.success() {
            if is_not_found(&stdout) || is_not_found(&stderr) {
                debug!("Credential helper {} has no entry for {}", program, host);
                return Ok(None);
            }

            let detail = if stderr.trim().is_empty() {
                stdout.trim()
            } else {
                stderr.trim()
            };
            return Err(HelmRepoError::helper(
                helper,
                format!("{} exited with {}: {}", program, output.status, detail),
            ));
        }

        let response: HelperResponse = serde_json::from_slice(&output.stdout).map_err(|e| {
            HelmRepoError::helper_with_source(helper, "helper returned malformed credentials", e)
        })?;

        Ok(Some(Credential::new(response.username, response.secret)))
    }
}

/// A helper may exit without reading stdin; its exit status says why, so a
/// broken pipe is not an error of its own.
fn check_stdin_write(helper: &str, written: io::Result<()>) -> Result<()> {
    match written {
        Err(e) if e.kind() != ErrorKind::BrokenPipe => Err(HelmRepoError::helper_with_source(
            helper,
            "failed to write hostname to helper",
            e,
        )),
        _ => Ok(()),
    }
}

fn is_not_found(output: &str) -> bool {
    output.trim_start().starts_with(CREDENTIALS_NOT_FOUND)
}
