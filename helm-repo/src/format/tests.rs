use super::*;
use crate::context::CliOverrides;
use libhelmrepo::Config;

fn ctx(color: ColorChoice, verbosity: VerbosityLevel) -> AppContext {
    AppContext::with_config(
        Config::default(),
        CliOverrides {
            color,
            verbosity,
            ..CliOverrides::default()
        },
    )
}

#[test]
fn test_color_choice_from_str() {
    assert_eq!(ColorChoice::from("always"), ColorChoice::Always);
    assert_eq!(ColorChoice::from("NEVER"), ColorChoice::Never);
    assert_eq!(ColorChoice::from("auto"), ColorChoice::Auto);
    assert_eq!(ColorChoice::from("rainbow"), ColorChoice::Auto);
}

#[test]
fn test_should_color_follows_explicit_choice() {
    assert!(should_color(&ctx(ColorChoice::Always, VerbosityLevel::Normal)));
    assert!(!should_color(&ctx(ColorChoice::Never, VerbosityLevel::Normal)));
}

#[test]
fn test_error_mark_plain() {
    let result = error_mark(&ctx(ColorChoice::Never, VerbosityLevel::Normal));
    assert_eq!(result, "✗");
}

#[test]
fn test_error_mark_colored_contains_mark() {
    let result = error_mark(&ctx(ColorChoice::Always, VerbosityLevel::Normal));
    assert!(result.contains("✗"));
    assert_ne!(result, "✗");
}

#[test]
fn test_normal_messages_are_never_printed() {
    let trace = ctx(ColorChoice::Never, VerbosityLevel::Trace);
    assert!(!is_visible(&trace, VerbosityLevel::Normal));
}

#[test]
fn test_verbosity_hierarchy() {
    let normal = ctx(ColorChoice::Never, VerbosityLevel::Normal);
    assert!(!is_visible(&normal, VerbosityLevel::Verbose));

    let verbose = ctx(ColorChoice::Never, VerbosityLevel::Verbose);
    assert!(is_visible(&verbose, VerbosityLevel::Verbose));
    assert!(!is_visible(&verbose, VerbosityLevel::VeryVerbose));

    let very = ctx(ColorChoice::Never, VerbosityLevel::VeryVerbose);
    assert!(is_visible(&very, VerbosityLevel::Verbose));
    assert!(is_visible(&very, VerbosityLevel::VeryVerbose));
    assert!(!is_visible(&very, VerbosityLevel::Trace));

    let trace = ctx(ColorChoice::Never, VerbosityLevel::Trace);
    assert!(is_visible(&trace, VerbosityLevel::Trace));
}

#[test]
fn test_print_does_not_panic() {
    let trace = ctx(ColorChoice::Never, VerbosityLevel::Trace);
    print(&trace, VerbosityLevel::Verbose, "should print");
    print(&trace, VerbosityLevel::Normal, "should not print");
}
