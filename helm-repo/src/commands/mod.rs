use crate::context::AppContext;
use crate::format;
use libhelmrepo::ArtifactRef;
use std::fmt::Display;

/// List artifact paths
pub mod ls;

/// Delete a tag
pub mod rm;

/// List artifact tags
pub mod tags;

/// Version command handlers
pub mod version;

/// Print an error and end the process with a failure status.
pub fn fail(ctx: &AppContext, error: impl Display) -> ! {
    format::error(ctx, &error.to_string());
    std::process::exit(1);
}

/// Parse a `[oci://]host[/path]` argument or exit.
pub fn parse_reference(ctx: &AppContext, raw: &str) -> ArtifactRef {
    match raw.parse() {
        Ok(reference) => reference,
        Err(e) => fail(ctx, e),
    }
}

#[cfg(test)]
#[path = "test_support.rs"]
pub(crate) mod test_support;
