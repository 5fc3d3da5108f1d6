//! Error types for bi-core

use thiserror::Error;

/// Errors that can occur while computing checksums
#[derive(Debug, Error)]
pub enum HashError {
  #[error("failed to read {path}: {source}")]
  ReadFile {
    path: String,
    #[source]
    source: std::io::Error,
  },
}

/// Errors that can occur while building records
#[derive(Debug, Error)]
pub enum CoreError {
  #[error("Build record is missing required field '{0}'")]
  MissingField(&'static str),
}
