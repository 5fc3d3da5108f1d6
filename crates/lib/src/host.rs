//! Read-only view of the host build tool's project graph.
//!
//! Extraction never depends on a concrete host type. An embedding plugin
//! implements these traits over its own project model; [`crate::snapshot`]
//! implements them over a JSON description of the graph.

use std::path::PathBuf;

use bi_core::{Agent, BuildType};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A configuration could not be fully resolved.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("configuration '{configuration}' was not fully resolved: {message}")]
pub struct ResolveError {
  pub configuration: String,
  pub message: String,
}

/// A concrete file produced by resolving a dependency configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedArtifact {
  /// Backing file. `None` when the host resolved metadata only.
  #[serde(default)]
  pub file: Option<PathBuf>,
  #[serde(rename = "type")]
  pub artifact_type: String,
  /// Coordinate of the owning dependency, e.g. `com.x:lib:1.0`.
  pub dependency_id: String,
}

/// Publication metadata attached to a staged artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishArtifact {
  pub name: String,
  #[serde(rename = "type")]
  pub artifact_type: String,
  #[serde(default)]
  pub classifier: Option<String>,
}

/// An artifact staged for deployment by an earlier step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeployDetails {
  /// Path of the project that produced the artifact.
  pub project: String,
  /// Target path in the repository, e.g. `com/x/app/1.0/app-1.0.jar`.
  pub artifact_path: String,
  pub md5: String,
  pub sha1: String,
  pub publish: PublishArtifact,
}

/// A named bucket of dependency requirements (`compile`, `runtime`, ...).
pub trait HostConfiguration {
  fn name(&self) -> &str;

  /// Resolve the configuration to concrete artifacts.
  fn resolve(&self) -> Result<Vec<ResolvedArtifact>, ResolveError>;
}

/// One project of the build.
pub trait HostProject {
  type Configuration: HostConfiguration;

  /// Unique path of the project within the build, e.g. `:core`.
  fn path(&self) -> &str;

  fn name(&self) -> &str;

  fn group(&self) -> &str;

  fn version(&self) -> &str;

  /// Base name of the artifacts the project publishes.
  fn artifact_name(&self) -> &str {
    self.name()
  }

  /// Whether the project ran the build-info recording step.
  fn records_build_info(&self) -> bool;

  fn configurations(&self) -> &[Self::Configuration];
}

/// The whole build: a root project and all projects beneath it.
pub trait HostGraph {
  type Project: HostProject;

  fn root(&self) -> &Self::Project;

  /// Every project in the build, root first.
  fn projects(&self) -> Vec<&Self::Project>;

  /// Name and version of the build tool.
  fn tool(&self) -> Agent;

  fn build_type(&self) -> BuildType {
    BuildType::Generic
  }
}
