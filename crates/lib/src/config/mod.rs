//! Client configuration for build-info extraction.
//!
//! [`ClientConfig`] is a typed view over a flat [`Properties`] map using the
//! conventional build-info property names (see [`keys`]). Strings are kept as
//! written; deciding whether a blank value counts as "unset" is left to the
//! extraction. Booleans and integers are parsed here, so a malformed value is
//! reported when the configuration is loaded.

mod properties;

use std::collections::BTreeMap;

use thiserror::Error;

pub use properties::Properties;

/// Property names understood by [`ClientConfig::from_properties`].
pub mod keys {
  pub const BUILD_NAME: &str = "buildInfo.buildName";
  pub const BUILD_NUMBER: &str = "buildInfo.buildNumber";
  pub const BUILD_STARTED: &str = "buildInfo.buildStarted";
  pub const AGENT_NAME: &str = "buildInfo.agentName";
  pub const AGENT_VERSION: &str = "buildInfo.agentVersion";
  pub const PARENT_BUILD_NAME: &str = "buildInfo.parentBuildName";
  pub const PARENT_BUILD_NUMBER: &str = "buildInfo.parentBuildNumber";
  pub const PRINCIPAL: &str = "buildInfo.principal";
  pub const BUILD_URL: &str = "buildInfo.buildUrl";
  pub const VCS_REVISION: &str = "buildInfo.vcsRevision";

  pub const LICENSE_RUN_CHECKS: &str = "buildInfo.licenseControl.runChecks";
  pub const LICENSE_VIOLATION_RECIPIENTS: &str = "buildInfo.licenseControl.violationRecipients";
  pub const LICENSE_INCLUDE_PUBLISHED_ARTIFACTS: &str = "buildInfo.licenseControl.includePublishedArtifacts";
  pub const LICENSE_SCOPES: &str = "buildInfo.licenseControl.scopes";
  pub const LICENSE_AUTO_DISCOVER: &str = "buildInfo.licenseControl.autoDiscover";

  pub const DELETE_BUILD_ARTIFACTS: &str = "buildInfo.deleteBuildArtifacts";
  pub const BUILD_RETENTION_DAYS: &str = "buildInfo.buildRetentionDays";
  pub const BUILD_RETENTION_MINIMUM_DATE: &str = "buildInfo.buildRetentionMinimumDate";
  pub const BUILD_NUMBERS_NOT_TO_DELETE: &str = "buildInfo.buildNumbersNotToDelete";

  pub const RELEASE_ENABLED: &str = "buildInfo.releaseEnabled";
  pub const RELEASE_COMMENT: &str = "buildInfo.releaseComment";

  pub const PUBLISH_REPO_KEY: &str = "artifactory.publish.repoKey";
  pub const PUBLISH_USERNAME: &str = "artifactory.publish.username";

  /// Environment variables captured as build variables.
  pub const ENV_PREFIX: &str = "buildInfo.env.";
  /// Free-form build variables.
  pub const PROPERTY_PREFIX: &str = "buildInfo.property.";
}

/// Errors that can occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("failed to read configuration {path}: {source}")]
  Read {
    path: String,
    #[source]
    source: std::io::Error,
  },

  #[error("failed to parse configuration {path}: {source}")]
  Parse {
    path: String,
    #[source]
    source: toml::de::Error,
  },

  #[error("invalid value for '{key}': expected {expected}, got '{value}'")]
  InvalidValue {
    key: String,
    value: String,
    expected: &'static str,
  },

  #[error("invalid override '{0}': expected key=value")]
  InvalidOverride(String),
}

/// License checks requested for the build.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LicenseControlConfig {
  pub run_checks: bool,
  pub violation_recipients: Option<String>,
  pub include_published_artifacts: bool,
  pub scopes: Option<String>,
  pub auto_discover: bool,
}

/// Build metadata settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InfoConfig {
  pub build_name: Option<String>,
  pub build_number: Option<String>,
  /// Raw start time; parsed during extraction.
  pub build_started: Option<String>,
  pub agent_name: Option<String>,
  pub agent_version: Option<String>,
  pub parent_build_name: Option<String>,
  pub parent_build_number: Option<String>,
  pub principal: Option<String>,
  pub build_url: Option<String>,
  pub vcs_revision: Option<String>,
  pub license_control: LicenseControlConfig,
  pub delete_build_artifacts: bool,
  pub build_retention_days: Option<i64>,
  /// Minimum age in days of builds the repository may discard.
  pub build_retention_minimum_days: Option<i64>,
  pub build_numbers_not_to_delete: Vec<String>,
  pub release_enabled: bool,
  pub release_comment: Option<String>,
  pub build_variables: BTreeMap<String, String>,
}

/// Settings of the publisher that will upload the record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublisherConfig {
  pub repo_key: Option<String>,
  pub username: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientConfig {
  pub info: InfoConfig,
  pub publisher: PublisherConfig,
}

impl ClientConfig {
  pub fn from_properties(props: &Properties) -> Result<Self, ConfigError> {
    let string = |key: &str| props.get(key).map(str::to_string);

    let license_control = LicenseControlConfig {
      run_checks: parse_bool(props, keys::LICENSE_RUN_CHECKS)?,
      violation_recipients: string(keys::LICENSE_VIOLATION_RECIPIENTS),
      include_published_artifacts: parse_bool(props, keys::LICENSE_INCLUDE_PUBLISHED_ARTIFACTS)?,
      scopes: string(keys::LICENSE_SCOPES),
      auto_discover: parse_bool(props, keys::LICENSE_AUTO_DISCOVER)?,
    };

    let build_numbers_not_to_delete = props
      .get(keys::BUILD_NUMBERS_NOT_TO_DELETE)
      .map(|list| {
        list
          .split(',')
          .map(str::trim)
          .filter(|n| !n.is_empty())
          .map(str::to_string)
          .collect()
      })
      .unwrap_or_default();

    let build_variables = props
      .with_prefix(keys::ENV_PREFIX)
      .chain(props.with_prefix(keys::PROPERTY_PREFIX))
      .map(|(k, v)| (k.to_string(), v.to_string()))
      .collect();

    let info = InfoConfig {
      build_name: string(keys::BUILD_NAME),
      build_number: string(keys::BUILD_NUMBER),
      build_started: string(keys::BUILD_STARTED),
      agent_name: string(keys::AGENT_NAME),
      agent_version: string(keys::AGENT_VERSION),
      parent_build_name: string(keys::PARENT_BUILD_NAME),
      parent_build_number: string(keys::PARENT_BUILD_NUMBER),
      principal: string(keys::PRINCIPAL),
      build_url: string(keys::BUILD_URL),
      vcs_revision: string(keys::VCS_REVISION),
      license_control,
      delete_build_artifacts: parse_bool(props, keys::DELETE_BUILD_ARTIFACTS)?,
      build_retention_days: parse_int(props, keys::BUILD_RETENTION_DAYS)?,
      build_retention_minimum_days: parse_int(props, keys::BUILD_RETENTION_MINIMUM_DATE)?,
      build_numbers_not_to_delete,
      release_enabled: parse_bool(props, keys::RELEASE_ENABLED)?,
      release_comment: string(keys::RELEASE_COMMENT),
      build_variables,
    };

    let publisher = PublisherConfig {
      repo_key: string(keys::PUBLISH_REPO_KEY),
      username: string(keys::PUBLISH_USERNAME),
    };

    Ok(Self { info, publisher })
  }
}

/// Missing or blank means `false`.
fn parse_bool(props: &Properties, key: &str) -> Result<bool, ConfigError> {
  match props.get(key).map(str::trim) {
    None | Some("") => Ok(false),
    Some(v) if v.eq_ignore_ascii_case("true") => Ok(true),
    Some(v) if v.eq_ignore_ascii_case("false") => Ok(false),
    Some(v) => Err(ConfigError::InvalidValue {
      key: key.to_string(),
      value: v.to_string(),
      expected: "true or false",
    }),
  }
}

/// Missing or blank means unset.
fn parse_int(props: &Properties, key: &str) -> Result<Option<i64>, ConfigError> {
  match props.get(key).map(str::trim) {
    None | Some("") => Ok(None),
    Some(v) => v.parse().map(Some).map_err(|_| ConfigError::InvalidValue {
      key: key.to_string(),
      value: v.to_string(),
      expected: "an integer",
    }),
  }
}
