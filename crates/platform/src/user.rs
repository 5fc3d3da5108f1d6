//! Invoking user identity

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::PlatformError;

/// Name used when the OS refuses to tell us who we are.
const UNKNOWN_USER: &str = "unknown";

/// The OS account running the build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
  pub username: String,
}

impl UserIdentity {
  /// Look up the current OS user.
  pub fn current() -> Result<Self, PlatformError> {
    let username = whoami::fallible::username().map_err(|e| PlatformError::Username(e.to_string()))?;
    if username.trim().is_empty() {
      return Err(PlatformError::Username("empty username".to_string()));
    }
    Ok(Self { username })
  }
}

/// Name of the current OS user, or `"unknown"` when it cannot be determined.
pub fn current_username() -> String {
  match UserIdentity::current() {
    Ok(identity) => identity.username,
    Err(e) => {
      warn!(error = %e, "could not determine OS user");
      UNKNOWN_USER.to_string()
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_current_username_is_not_blank() {
    let name = current_username();
    assert!(!name.trim().is_empty());
  }

  #[test]
  fn test_identity_matches_username() {
    if let Ok(identity) = UserIdentity::current() {
      assert_eq!(identity.username, current_username());
    }
  }
}
