use super::{fail, parse_reference};
use crate::context::{AppContext, VerbosityLevel};
use crate::format;
use libhelmrepo::{ArtifactRef, Result};

#[cfg(test)]
#[path = "rm_tests.rs"]
mod tests;

/// Deletes `tag` from the artifact named by `reference`.
///
/// The tag is resolved to its manifest digest first and the manifest is
/// deleted by digest. Returns the deleted digest.
pub fn remove_tag(ctx: &AppContext, reference: &ArtifactRef, tag: &str) -> Result<String> {
    let path = reference.require_path()?;
    let registry = ctx.connect(reference.host())?;

    format::print(
        ctx,
        VerbosityLevel::Verbose,
        &format!("Resolving {}:{} on {}", path, tag, registry.base_url()),
    );
    let digest = registry.manifest_digest(path, tag)?;

    format::print(
        ctx,
        VerbosityLevel::Verbose,
        &format!("Deleting manifest {}", digest),
    );
    registry.delete_manifest(path, &digest)?;

    Ok(digest)
}

/// Handle the rm command
pub fn handle_rm(ctx: &AppContext, reference: &str, tag: &str) {
    let reference = parse_reference(ctx, reference);

    match remove_tag(ctx, &reference, tag) {
        Ok(digest) => println!(
            "Deleted {}:{} ({})",
            reference.path().unwrap_or_default(),
            tag,
            digest
        ),
        Err(e) if e.is_name_unknown() => fail(
            ctx,
            format!(
                "Manifest not found: {}:{}",
                reference.path().unwrap_or_default(),
                tag
            ),
        ),
        Err(e) => fail(ctx, e),
    }
}
