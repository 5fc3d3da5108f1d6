//! Module assembly.

use bi_core::{ChecksumProvider, Module};
use tracing::{debug, error};

use super::{ArtifactCollector, DependencyResolver};
use crate::host::{DeployDetails, HostProject};

/// Builds one module per project from its artifacts and dependencies.
pub struct ModuleAssembler<'a> {
  artifacts: ArtifactCollector<'a>,
  dependencies: DependencyResolver<'a>,
}

impl<'a> ModuleAssembler<'a> {
  pub fn new(deploy_details: &'a [DeployDetails], checksums: &'a dyn ChecksumProvider) -> Self {
    Self {
      artifacts: ArtifactCollector::new(deploy_details),
      dependencies: DependencyResolver::new(checksums),
    }
  }

  /// Never fails. If dependencies cannot be calculated the error is logged
  /// and the module keeps its artifacts with no dependencies.
  pub fn assemble<P: HostProject>(&self, project: &P) -> Module {
    let id = module_id(project);
    let module = Module::new(&id).with_artifacts(self.artifacts.collect(project));

    match self.dependencies.resolve(project) {
      Ok(dependencies) => {
        debug!(
          module = %id,
          artifacts = module.artifacts.len(),
          dependencies = dependencies.len(),
          "assembled module"
        );
        module.with_dependencies(dependencies)
      }
      Err(e) => {
        error!(module = %id, error = %e, "error during extraction");
        module
      }
    }
  }
}

/// `group:artifactName:version`
pub fn module_id<P: HostProject>(project: &P) -> String {
  format!("{}:{}:{}", project.group(), project.artifact_name(), project.version())
}
