//! Build-info extraction.
//!
//! Extraction walks the host graph once and produces a [`bi_core::Build`]:
//!
//! 1. [`BuildRecordAssembler`] reads the configuration and picks the projects
//!    that recorded build info.
//! 2. [`ModuleAssembler`] turns each of those projects into a module.
//! 3. [`ArtifactCollector`] maps the project's staged deploy details to
//!    artifacts, and [`DependencyResolver`] resolves, deduplicates and
//!    checksums its dependencies.
//!
//! # Failure policy
//!
//! Only a missing or malformed start time stops an extraction. A
//! configuration that fails to resolve is skipped, and a module whose
//! dependencies cannot be checksummed is still recorded with what was
//! gathered before the failure.

mod artifacts;
mod build;
mod dependencies;
mod module;

use bi_core::{CoreError, HashError};
use thiserror::Error;

pub use artifacts::ArtifactCollector;
pub use build::BuildRecordAssembler;
pub use dependencies::{DependencyAccumulator, DependencyResolver};
pub use module::ModuleAssembler;

/// Errors that abort an extraction.
#[derive(Debug, Error)]
pub enum ExtractError {
  #[error("build start time is not configured")]
  MissingStartTime,

  #[error("build start date format error: '{value}': {source}")]
  InvalidStartTime {
    value: String,
    #[source]
    source: chrono::ParseError,
  },

  #[error("failed to assemble build record: {0}")]
  Record(#[from] CoreError),
}

/// Errors confined to a single module.
#[derive(Debug, Error)]
pub enum ModuleError {
  #[error("failed to checksum dependency '{dependency}': {source}")]
  Checksum {
    dependency: String,
    #[source]
    source: HashError,
  },
}
