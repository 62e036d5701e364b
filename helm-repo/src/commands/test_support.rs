//! Fixtures shared by the command tests.

use crate::context::{AppContext, CliOverrides};
use base64::{Engine as _, engine::general_purpose};
use libhelmrepo::{Config, StorePaths};
use std::fs;
use tempfile::TempDir;

/// `Authorization` header value for the fixture credentials.
pub const BASIC: &str = "Basic YWxpY2U6czNjcmV0";

/// A context whose Docker config holds `alice:s3cret` for `host`.
///
/// The returned directory must outlive the context.
pub fn context_for(host: &str) -> (TempDir, AppContext) {
    let dir = tempfile::tempdir().unwrap();
    let docker = dir.path().join("config.json");
    let auth = general_purpose::STANDARD.encode("alice:s3cret");
    fs::write(
        &docker,
        format!(r#"{{"auths":{{"{}":{{"auth":"{}"}}}}}}"#, host, auth),
    )
    .unwrap();

    let ctx = AppContext::with_config(
        Config::default(),
        CliOverrides {
            plain_http: true,
            ..CliOverrides::default()
        },
    )
    .with_store_paths(StorePaths::new(dir.path().join("helm.json"), docker));

    (dir, ctx)
}

/// `WWW-Authenticate` value pointing at the mock server's `/token`.
pub fn challenge(server: &mockito::ServerGuard, scope: &str) -> String {
    format!(
        r#"Bearer realm="{}/token",service="registry.example",scope="{}""#,
        server.url(),
        scope
    )
}
