//! Host operating system facts for buildinfo
//!
//! This crate answers questions about the process the extraction runs in,
//! such as which OS account invoked the build.

mod error;
mod user;

pub use error::PlatformError;
pub use user::{UserIdentity, current_username};
