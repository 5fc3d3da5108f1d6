//! A host graph captured as a JSON document.
//!
//! The snapshot carries everything extraction reads from a live build tool:
//! the projects, their dependency configurations with resolution results,
//! and the deploy details staged for publication.
//!
//! ```json
//! {
//!   "tool": { "name": "Gradle", "version": "8.5" },
//!   "buildType": "GRADLE",
//!   "root": {
//!     "path": ":", "name": "app", "group": "com.x", "version": "1.0",
//!     "recordsBuildInfo": true,
//!     "configurations": [
//!       { "name": "compile",
//!         "artifacts": [{ "file": "libs/lib-1.0.jar", "type": "jar", "dependencyId": "com.x:lib:1.0" }] },
//!       { "name": "broken", "resolutionError": "could not reach repository" }
//!     ]
//!   },
//!   "subprojects": [],
//!   "deployDetails": []
//! }
//! ```
//!
//! Relative artifact paths are resolved against the directory of the
//! snapshot file.

use std::fs;
use std::path::Path;

use bi_core::{Agent, BuildType};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::host::{DeployDetails, HostConfiguration, HostGraph, HostProject, ResolveError, ResolvedArtifact};

/// Errors that can occur while loading a snapshot.
#[derive(Debug, Error)]
pub enum SnapshotError {
  #[error("failed to read graph snapshot {path}: {source}")]
  Read {
    path: String,
    #[source]
    source: std::io::Error,
  },

  #[error("failed to parse graph snapshot {path}: {source}")]
  Parse {
    path: String,
    #[source]
    source: serde_json::Error,
  },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigurationSnapshot {
  pub name: String,
  #[serde(default)]
  pub artifacts: Vec<ResolvedArtifact>,
  /// Set when the host could not fully resolve the configuration.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub resolution_error: Option<String>,
}

impl ConfigurationSnapshot {
  pub fn new(name: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      artifacts: Vec::new(),
      resolution_error: None,
    }
  }

  pub fn with_artifact(mut self, artifact: ResolvedArtifact) -> Self {
    self.artifacts.push(artifact);
    self
  }

  pub fn with_resolution_error(mut self, message: impl Into<String>) -> Self {
    self.resolution_error = Some(message.into());
    self
  }
}

impl HostConfiguration for ConfigurationSnapshot {
  fn name(&self) -> &str {
    &self.name
  }

  fn resolve(&self) -> Result<Vec<ResolvedArtifact>, ResolveError> {
    match &self.resolution_error {
      Some(message) => Err(ResolveError {
        configuration: self.name.clone(),
        message: message.clone(),
      }),
      None => Ok(self.artifacts.clone()),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSnapshot {
  pub path: String,
  pub name: String,
  #[serde(default)]
  pub group: String,
  #[serde(default)]
  pub version: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub artifact_name: Option<String>,
  #[serde(default)]
  pub records_build_info: bool,
  #[serde(default)]
  pub configurations: Vec<ConfigurationSnapshot>,
}

impl ProjectSnapshot {
  pub fn new(path: &str, name: &str, group: &str, version: &str) -> Self {
    Self {
      path: path.to_string(),
      name: name.to_string(),
      group: group.to_string(),
      version: version.to_string(),
      artifact_name: None,
      records_build_info: true,
      configurations: Vec::new(),
    }
  }

  pub fn with_configuration(mut self, configuration: ConfigurationSnapshot) -> Self {
    self.configurations.push(configuration);
    self
  }

  pub fn without_build_info(mut self) -> Self {
    self.records_build_info = false;
    self
  }
}

impl HostProject for ProjectSnapshot {
  type Configuration = ConfigurationSnapshot;

  fn path(&self) -> &str {
    &self.path
  }

  fn name(&self) -> &str {
    &self.name
  }

  fn group(&self) -> &str {
    &self.group
  }

  fn version(&self) -> &str {
    &self.version
  }

  fn artifact_name(&self) -> &str {
    self.artifact_name.as_deref().unwrap_or(&self.name)
  }

  fn records_build_info(&self) -> bool {
    self.records_build_info
  }

  fn configurations(&self) -> &[ConfigurationSnapshot] {
    &self.configurations
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphSnapshot {
  pub tool: Agent,
  #[serde(default)]
  pub build_type: BuildType,
  pub root: ProjectSnapshot,
  #[serde(default)]
  pub subprojects: Vec<ProjectSnapshot>,
  #[serde(default)]
  pub deploy_details: Vec<DeployDetails>,
}

impl GraphSnapshot {
  pub fn new(tool: Agent, root: ProjectSnapshot) -> Self {
    Self {
      tool,
      build_type: BuildType::Generic,
      root,
      subprojects: Vec::new(),
      deploy_details: Vec::new(),
    }
  }

  /// Load a snapshot file, resolving relative artifact paths against its directory.
  pub fn load(path: &Path) -> Result<Self, SnapshotError> {
    let content = fs::read_to_string(path).map_err(|e| SnapshotError::Read {
      path: path.display().to_string(),
      source: e,
    })?;
    let mut snapshot: GraphSnapshot = serde_json::from_str(&content).map_err(|e| SnapshotError::Parse {
      path: path.display().to_string(),
      source: e,
    })?;

    if let Some(base) = path.parent() {
      snapshot.rebase(base);
    }

    debug!(
      path = %path.display(),
      projects = snapshot.subprojects.len() + 1,
      deploy_details = snapshot.deploy_details.len(),
      "loaded graph snapshot"
    );
    Ok(snapshot)
  }

  fn rebase(&mut self, base: &Path) {
    let projects = std::iter::once(&mut self.root).chain(self.subprojects.iter_mut());
    for project in projects {
      for configuration in &mut project.configurations {
        for artifact in &mut configuration.artifacts {
          if let Some(file) = &artifact.file
            && file.is_relative()
          {
            artifact.file = Some(base.join(file));
          }
        }
      }
    }
  }
}

impl HostGraph for GraphSnapshot {
  type Project = ProjectSnapshot;

  fn root(&self) -> &ProjectSnapshot {
    &self.root
  }

  fn projects(&self) -> Vec<&ProjectSnapshot> {
    std::iter::once(&self.root).chain(self.subprojects.iter()).collect()
  }

  fn tool(&self) -> Agent {
    self.tool.clone()
  }

  fn build_type(&self) -> BuildType {
    self.build_type
  }
}
