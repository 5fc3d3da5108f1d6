//! Shared utilities.
//!
//! Common helpers used across the crate, plus test fixtures.

/// Returns the value when it has any non-whitespace content.
pub fn non_blank(value: Option<&str>) -> Option<&str> {
  value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
pub mod testutil;

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn blank_values_are_dropped() {
    assert_eq!(non_blank(None), None);
    assert_eq!(non_blank(Some("")), None);
    assert_eq!(non_blank(Some(" \t")), None);
    assert_eq!(non_blank(Some(" x ")), Some(" x "));
  }
}
