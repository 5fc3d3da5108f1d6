//! Shared constants.

/// Configuration file read when none is given explicitly.
pub const DEFAULT_CONFIG_FILE: &str = "buildinfo.toml";

/// Resolved files with this suffix are never recorded as dependencies.
///
/// A sources jar resolves to the same coordinate as its main jar, so keeping
/// it would overwrite the main jar's checksums under one dependency id.
pub const SOURCES_SUFFIX: &str = "-sources.jar";
