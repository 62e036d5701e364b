/// Get the version string for helm-repo and libhelmrepo
pub fn get_version_string() -> String {
    format!(
        "helm-repo {}\nlibhelmrepo {}",
        env!("CARGO_PKG_VERSION"),
        libhelmrepo::version()
    )
}

/// Print version information to stdout
pub fn print_version() {
    println!("{}", get_version_string());
}

#[cfg(test)]
#[path = "version_tests.rs"]
mod tests;
