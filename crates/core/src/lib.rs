//! bi-core: Build-info records and checksums
//!
//! This crate provides the immutable build-info record produced by an
//! extraction, the per-module artifact and dependency records it contains,
//! and the checksum provider used to fingerprint resolved files.

mod build;
mod error;
mod hash;
mod module;
mod policy;

pub use build::{Agent, BUILD_INFO_VERSION, Build, BuildInfoBuilder, BuildType, ParentBuild, STARTED_FORMAT};
pub use error::{CoreError, HashError};
pub use hash::{ChecksumProvider, Checksums, FileChecksums, compute_checksums};
pub use module::{Artifact, Dependency, Module};
pub use policy::{BuildRetention, LicenseControl, PromotionStatus, STATUS_STAGED};

/// Result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;
