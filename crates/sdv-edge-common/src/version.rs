//! ---
//! sdv_section: "01-core-functionality"
//! sdv_type: "source"
//! sdv_scope: "code"
//! sdv_description: "Shared primitives and utilities for the edge simulator."
//! sdv_version: "v0.1.0"
//! sdv_owner: "tbd"
//! ---
use serde::Serialize;

/// Compile-time version metadata for CLI and logging surfaces.
///
/// Git and timestamp fields are stamped by CI through `SDV_EDGE_GIT_SHA` and
/// `SDV_EDGE_BUILD_TIMESTAMP`; local builds report `UNKNOWN` for both.
#[derive(Debug, Clone, Serialize)]
pub struct VersionInfo {
    /// Workspace semantic version.
    pub semver: String,
    /// Git commit hash captured at build time.
    pub git_sha: String,
    /// Build timestamp from the compilation environment.
    pub build_timestamp: String,
    /// Cargo profile used during compilation.
    pub profile: String,
}

impl VersionInfo {
    /// Capture the version metadata baked into this build.
    #[must_use]
    pub fn current() -> Self {
        Self {
            semver: env!("CARGO_PKG_VERSION").to_owned(),
            git_sha: option_env!("SDV_EDGE_GIT_SHA")
                .unwrap_or("UNKNOWN")
                .to_owned(),
            build_timestamp: option_env!("SDV_EDGE_BUILD_TIMESTAMP")
                .unwrap_or("UNKNOWN")
                .to_owned(),
            profile: if cfg!(debug_assertions) {
                "debug".to_owned()
            } else {
                "release".to_owned()
            },
        }
    }

    /// Short `semver (sha)` form for log lines.
    #[must_use]
    pub fn cli_string(&self) -> String {
        format!("{} ({})", self.semver, self.git_sha)
    }

    /// One-line banner for startup output.
    #[must_use]
    pub fn banner(&self) -> String {
        format!("SDV-Edge v{} (git {})", self.semver, self.git_sha)
    }

    /// Multi-line form backing the `-V` flag.
    #[must_use]
    pub fn extended(&self) -> String {
        format!(
            "{banner}\nBuilt: {built}\nProfile: {profile}",
            banner = self.banner(),
            built = self.build_timestamp,
            profile = self.profile
        )
    }
}
