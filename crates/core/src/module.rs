//! Per-module records: what a module produced and what it consumed.

use serde::{Deserialize, Serialize};

use crate::hash::Checksums;

/// One unit of a multi-module build.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Module {
  /// `group:name:version`
  pub id: String,
  #[serde(default)]
  pub artifacts: Vec<Artifact>,
  #[serde(default)]
  pub dependencies: Vec<Dependency>,
}

impl Module {
  pub fn new(id: impl Into<String>) -> Self {
    Self {
      id: id.into(),
      artifacts: Vec::new(),
      dependencies: Vec::new(),
    }
  }

  pub fn with_artifacts(mut self, artifacts: Vec<Artifact>) -> Self {
    self.artifacts = artifacts;
    self
  }

  pub fn with_dependencies(mut self, dependencies: Vec<Dependency>) -> Self {
    self.dependencies = dependencies;
    self
  }
}

/// A produced output of a module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
  /// File name only, without directories.
  pub name: String,
  #[serde(rename = "type")]
  pub artifact_type: String,
  pub md5: String,
  pub sha1: String,
}

/// A consumed input of a module.
///
/// `scopes` keeps the order configurations first referenced the dependency
/// and never holds the same scope twice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
  pub id: String,
  #[serde(rename = "type")]
  pub dependency_type: String,
  scopes: Vec<String>,
  pub md5: String,
  pub sha1: String,
}

impl Dependency {
  pub fn new(
    id: impl Into<String>,
    dependency_type: impl Into<String>,
    scope: impl Into<String>,
    checksums: Checksums,
  ) -> Self {
    Self {
      id: id.into(),
      dependency_type: dependency_type.into(),
      scopes: vec![scope.into()],
      md5: checksums.md5,
      sha1: checksums.sha1,
    }
  }

  pub fn scopes(&self) -> &[String] {
    &self.scopes
  }

  /// Add a scope unless already present. Returns whether it was added.
  pub fn add_scope(&mut self, scope: &str) -> bool {
    if self.scopes.iter().any(|s| s == scope) {
      return false;
    }
    self.scopes.push(scope.to_string());
    true
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn sums() -> Checksums {
    Checksums {
      md5: "m".to_string(),
      sha1: "s".to_string(),
    }
  }

  #[test]
  fn add_scope_is_idempotent() {
    let mut dep = Dependency::new("com.x:lib:1.0", "jar", "compile", sums());

    assert!(dep.add_scope("runtime"));
    assert!(!dep.add_scope("compile"));
    assert!(!dep.add_scope("runtime"));

    assert_eq!(dep.scopes(), ["compile", "runtime"]);
  }

  #[test]
  fn dependency_serializes_type_field() {
    let dep = Dependency::new("com.x:lib:1.0", "jar", "compile", sums());
    let json = serde_json::to_value(&dep).unwrap();

    assert_eq!(json["type"], "jar");
    assert_eq!(json["scopes"], serde_json::json!(["compile"]));
  }

  #[test]
  fn module_builder_methods() {
    let module = Module::new("g:a:1").with_artifacts(vec![Artifact {
      name: "a-1.jar".to_string(),
      artifact_type: "jar".to_string(),
      md5: "m".to_string(),
      sha1: "s".to_string(),
    }]);

    assert_eq!(module.id, "g:a:1");
    assert_eq!(module.artifacts.len(), 1);
    assert!(module.dependencies.is_empty());
  }
}
