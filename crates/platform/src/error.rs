//! Error types for bi-platform

use thiserror::Error;

/// Errors that can occur in platform operations
#[derive(Debug, Error)]
pub enum PlatformError {
  #[error("Failed to get username: {0}")]
  Username(String),
}
