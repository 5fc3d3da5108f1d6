//! Policy and event records copied from client configuration.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Promotion status recorded when a build is staged for release.
pub const STATUS_STAGED: &str = "staged";

/// License checks the repository should run against the build.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LicenseControl {
  pub run_checks: bool,
  pub include_published_artifacts: bool,
  pub auto_discover: bool,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub license_violations_recipients: Option<Vec<String>>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub scopes: Option<Vec<String>>,
}

impl LicenseControl {
  pub fn new(run_checks: bool) -> Self {
    Self {
      run_checks,
      ..Self::default()
    }
  }

  /// Set recipients from a comma or whitespace separated list.
  pub fn set_violation_recipients(&mut self, list: &str) {
    self.license_violations_recipients = Some(split_list(list));
  }

  /// Set scopes from a comma or whitespace separated list.
  pub fn set_scopes(&mut self, list: &str) {
    self.scopes = Some(split_list(list));
  }
}

/// How long the repository keeps this build's records and artifacts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildRetention {
  pub delete_build_artifacts: bool,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub count: Option<i64>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub minimum_build_date: Option<DateTime<Utc>>,
  #[serde(default)]
  pub builds_not_to_be_discarded: Vec<String>,
}

impl BuildRetention {
  pub fn new(delete_build_artifacts: bool) -> Self {
    Self {
      delete_build_artifacts,
      ..Self::default()
    }
  }

  pub fn add_build_not_to_be_discarded(&mut self, number: impl Into<String>) {
    self.builds_not_to_be_discarded.push(number.into());
  }
}

/// A promotion event recorded against the build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromotionStatus {
  pub status: String,
  pub comment: String,
  pub repository: String,
  pub timestamp: String,
  pub user: String,
  pub ci_user: String,
}

fn split_list(list: &str) -> Vec<String> {
  list
    .split(|c: char| c == ',' || c.is_whitespace())
    .filter(|item| !item.is_empty())
    .map(str::to_string)
    .collect()
}
