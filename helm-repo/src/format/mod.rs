use crate::context::{AppContext, VerbosityLevel};
use owo_colors::OwoColorize;
use std::io::IsTerminal;

/// Control colored output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorChoice {
    #[default]
    Auto,
    Always,
    Never,
}

impl From<&str> for ColorChoice {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "always" => ColorChoice::Always,
            "never" => ColorChoice::Never,
            _ => ColorChoice::Auto,
        }
    }
}

/// Check if we should use colors in diagnostics
///
/// All decorated output goes to stderr, so that is the stream checked.
pub fn should_color(ctx: &AppContext) -> bool {
    match ctx.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => std::io::stderr().is_terminal() && std::env::var_os("NO_COLOR").is_none(),
    }
}

/// Colorize an X mark for errors if colors are enabled
pub fn error_mark(ctx: &AppContext) -> String {
    if should_color(ctx) {
        format!("{}", "✗".red().bold())
    } else {
        "✗".to_string()
    }
}

/// Print an error message to stderr
pub fn error(ctx: &AppContext, message: &str) {
    eprintln!("{} {}", error_mark(ctx), message);
}

/// Returns true if a message at `level` is shown under the context's verbosity.
///
/// `Normal` is never shown through [`print`]; regular output goes to stdout.
pub fn is_visible(ctx: &AppContext, level: VerbosityLevel) -> bool {
    level != VerbosityLevel::Normal && level <= ctx.verbosity
}

/// Print a progress line to stderr if the verbosity allows it
pub fn print(ctx: &AppContext, level: VerbosityLevel, message: &str) {
    if is_visible(ctx, level) {
        if should_color(ctx) {
            eprintln!("{}", message.dimmed());
        } else {
            eprintln!("{}", message);
        }
    }
}

#[cfg(test)]
#[path = "tests.rs"]
mod tests;
