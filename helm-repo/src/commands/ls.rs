use super::{fail, parse_reference};
use crate::context::{AppContext, VerbosityLevel};
use crate::format;
use libhelmrepo::{ArtifactRef, Result};

#[cfg(test)]
#[path = "ls_tests.rs"]
mod tests;

/// Keeps catalog entries below `path` and strips that prefix.
///
/// Only direct children are kept unless `all` is set. Server order is kept.
pub fn filter_catalog(repositories: &[String], path: Option<&str>, all: bool) -> Vec<String> {
    let prefix = match path.map(|p| p.trim_end_matches('/')) {
        Some(p) if !p.is_empty() => format!("{}/", p),
        _ => String::new(),
    };

    repositories
        .iter()
        .filter_map(|repository| repository.strip_prefix(prefix.as_str()))
        .filter(|rest| !rest.is_empty() && (all || !rest.contains('/')))
        .map(str::to_string)
        .collect()
}

/// Lists the artifact paths under `reference`.
pub fn list_paths(ctx: &AppContext, reference: &ArtifactRef, all: bool) -> Result<Vec<String>> {
    let registry = ctx.connect(reference.host())?;
    format::print(
        ctx,
        VerbosityLevel::Verbose,
        &format!("Fetching catalog from {}", registry.base_url()),
    );

    let repositories = registry.list_repositories()?;
    format::print(
        ctx,
        VerbosityLevel::VeryVerbose,
        &format!("Catalog has {} repositories", repositories.len()),
    );

    Ok(filter_catalog(&repositories, reference.path(), all))
}

/// Handle the ls command
pub fn handle_ls(ctx: &AppContext, reference: &str, all: bool) {
    let reference = parse_reference(ctx, reference);

    match list_paths(ctx, &reference, all) {
        Ok(paths) => {
            for path in paths {
                println!("{}", path);
            }
        }
        Err(e) => fail(ctx, e),
    }
}
