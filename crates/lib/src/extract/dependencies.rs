//! Dependency resolution and deduplication.
//!
//! Every configuration of a project is resolved in turn and folded into a
//! [`DependencyAccumulator`]. A dependency is identified by its coordinate
//! alone: when several configurations (or several artifact types) resolve to
//! the same coordinate, they collapse into the first entry seen, which gains
//! the extra scopes and keeps its original type and checksums.

use std::collections::HashMap;
use std::io;

use bi_core::{ChecksumProvider, Dependency, HashError};
use tracing::{debug, trace};

use super::ModuleError;
use crate::consts::SOURCES_SUFFIX;
use crate::host::{HostConfiguration, HostProject, ResolvedArtifact};

/// Dependencies gathered so far for one module, in first-seen order.
#[derive(Debug, Default)]
pub struct DependencyAccumulator {
  entries: Vec<Dependency>,
  index: HashMap<String, usize>,
}

impl DependencyAccumulator {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn contains(&self, id: &str) -> bool {
    self.index.contains_key(id)
  }

  /// Add `scope` to an existing entry. Returns `false` if there is no entry for `id`.
  pub fn add_scope(&mut self, id: &str, scope: &str) -> bool {
    match self.index.get(id) {
      Some(&i) => {
        self.entries[i].add_scope(scope);
        true
      }
      None => false,
    }
  }

  /// Append a new entry. An entry with the same id is merged instead.
  pub fn insert(&mut self, dependency: Dependency) {
    if let Some(&i) = self.index.get(&dependency.id) {
      for scope in dependency.scopes() {
        self.entries[i].add_scope(scope);
      }
      return;
    }
    self.index.insert(dependency.id.clone(), self.entries.len());
    self.entries.push(dependency);
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  pub fn into_dependencies(self) -> Vec<Dependency> {
    self.entries
  }
}

/// Resolves a project's dependency configurations into deduplicated dependencies.
pub struct DependencyResolver<'a> {
  checksums: &'a dyn ChecksumProvider,
}

impl<'a> DependencyResolver<'a> {
  pub fn new(checksums: &'a dyn ChecksumProvider) -> Self {
    Self { checksums }
  }

  pub fn resolve<P: HostProject>(&self, project: &P) -> Result<Vec<Dependency>, ModuleError> {
    let accumulator = project
      .configurations()
      .iter()
      .try_fold(DependencyAccumulator::new(), |acc, configuration| {
        self.merge_configuration(acc, configuration)
      })?;

    debug!(
      project = project.path(),
      dependencies = accumulator.len(),
      "resolved dependencies"
    );
    Ok(accumulator.into_dependencies())
  }

  /// Fold one configuration's resolved artifacts into the accumulator.
  fn merge_configuration<C: HostConfiguration>(
    &self,
    mut acc: DependencyAccumulator,
    configuration: &C,
  ) -> Result<DependencyAccumulator, ModuleError> {
    let scope = configuration.name();
    let artifacts = match configuration.resolve() {
      Ok(artifacts) => artifacts,
      Err(e) => {
        debug!(configuration = scope, error = %e, "artifacts were not all resolved, skipping");
        return Ok(acc);
      }
    };

    for artifact in &artifacts {
      if !is_recordable(artifact) {
        continue;
      }
      if acc.add_scope(&artifact.dependency_id, scope) {
        continue;
      }

      // Only reached for recordable artifacts, which always have a file.
      let Some(file) = artifact.file.as_deref() else {
        continue;
      };
      let checksums = match self.checksums.checksums(file) {
        Ok(checksums) => checksums,
        Err(HashError::ReadFile { ref source, .. }) if source.kind() == io::ErrorKind::NotFound => {
          trace!(dependency = %artifact.dependency_id, file = %file.display(), "file vanished, skipping");
          continue;
        }
        Err(e) => {
          return Err(ModuleError::Checksum {
            dependency: artifact.dependency_id.clone(),
            source: e,
          });
        }
      };
      acc.insert(Dependency::new(
        &artifact.dependency_id,
        &artifact.artifact_type,
        scope,
        checksums,
      ));
    }

    Ok(acc)
  }
}

/// Whether a resolved artifact is backed by an existing, non-sources file.
fn is_recordable(artifact: &ResolvedArtifact) -> bool {
  let Some(file) = artifact.file.as_deref() else {
    trace!(dependency = %artifact.dependency_id, "no backing file");
    return false;
  };
  if !file.exists() {
    trace!(dependency = %artifact.dependency_id, file = %file.display(), "file missing, skipping");
    return false;
  }
  let is_sources = file
    .file_name()
    .and_then(|n| n.to_str())
    .is_some_and(|n| n.ends_with(SOURCES_SUFFIX));
  if is_sources {
    trace!(dependency = %artifact.dependency_id, file = %file.display(), "sources artifact, skipping");
  }
  !is_sources
}
