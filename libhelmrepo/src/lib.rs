//! libhelmrepo - OCI registry access for Helm chart repositories
//!
//! This library finds registry credentials the way `helm` and `docker` store
//! them and speaks the Docker Registry v2 authentication handshake, so that
//! a command can list, inspect and delete charts pushed to an OCI registry.
//!
//! # Quick Start
//!
//! ```no_run
//! use libhelmrepo::auth::{CredentialResolver, StorePaths};
//! use libhelmrepo::client::Client;
//! use libhelmrepo::registry::{Registry, Scheme};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let resolver = CredentialResolver::new(StorePaths::from_env());
//!     let registry = Registry::connect(
//!         Client::new()?,
//!         "registry.example.com",
//!         Scheme::Https,
//!         &resolver,
//!     )?;
//!
//!     for tag in registry.list_tags("charts/app")? {
//!         println!("{}", tag);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - [`auth`] - credential stores, helpers, resolution and challenge parsing
//! - [`client`] - the HTTP client: request dispatch and token exchange
//! - [`registry`] - an authenticated session with the single bearer retry
//! - [`reference`] - `host[/path]` argument parsing
//! - [`config`] - layered configuration file
//! - [`error`] - the crate error type

#![warn(clippy::all)]

/// Returns the libhelmrepo crate version.
///
/// # Examples
///
/// ```
/// let version = libhelmrepo::version();
/// assert!(!version.is_empty());
/// ```
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod reference;
pub mod registry;

pub use auth::{Credential, CredentialResolver, StorePaths};
pub use client::{Client, ClientConfig};
pub use config::Config;
pub use error::{HelmRepoError, Result};
pub use reference::ArtifactRef;
pub use registry::{Registry, Scheme};
