use super::{fail, parse_reference};
use crate::context::{AppContext, VerbosityLevel};
use crate::format;
use libhelmrepo::{ArtifactRef, Result};

#[cfg(test)]
#[path = "tags_tests.rs"]
mod tests;

/// Lists the tags of the artifact named by `reference`, in server order.
pub fn list_tags(ctx: &AppContext, reference: &ArtifactRef) -> Result<Vec<String>> {
    let path = reference.require_path()?;
    let registry = ctx.connect(reference.host())?;
    format::print(
        ctx,
        VerbosityLevel::Verbose,
        &format!("Listing tags of {} on {}", path, registry.base_url()),
    );

    registry.list_tags(path)
}

/// Renders the output lines of the tags command.
///
/// With `print_name`, the path comes first and every tag is indented by two
/// spaces.
pub fn render_tags(path: &str, tags: &[String], print_name: bool) -> Vec<String> {
    if !print_name {
        return tags.to_vec();
    }

    std::iter::once(path.to_string())
        .chain(tags.iter().map(|tag| format!("  {}", tag)))
        .collect()
}

/// Handle the tags command
pub fn handle_tags(ctx: &AppContext, reference: &str, print_name: bool) {
    let reference = parse_reference(ctx, reference);

    match list_tags(ctx, &reference) {
        Ok(tags) => {
            let path = reference.path().unwrap_or_default();
            for line in render_tags(path, &tags, print_name) {
                println!("{}", line);
            }
        }
        Err(e) if e.is_name_unknown() => fail(
            ctx,
            format!("Manifest not found: {}", reference.path().unwrap_or_default()),
        ),
        Err(e) => fail(ctx, e),
    }
}
