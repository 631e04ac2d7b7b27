//! Version and build information.

/// Full version string including build metadata.
///
/// Format: "cdex {version} ({commit} {date})"
pub fn version() -> String {
    format!(
        "cdex {} ({} {})",
        package_version(),
        build_commit(),
        build_date()
    )
}

/// The package version (e.g., "0.2.0").
pub fn package_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// The build commit SHA, or "unknown" if not built with commit info.
pub fn build_commit() -> &'static str {
    option_env!("CDEX_COMMIT_SHA").unwrap_or("unknown")
}

/// The build date, or "unknown" if not built with date info.
pub fn build_date() -> &'static str {
    option_env!("CDEX_BUILD_DATE").unwrap_or("unknown")
}
