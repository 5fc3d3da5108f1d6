//! Published artifacts of a project.

use bi_core::Artifact;

use crate::host::{DeployDetails, HostProject};
use crate::util::non_blank;

/// Maps staged deploy details to the artifacts of one project.
pub struct ArtifactCollector<'a> {
  deploy_details: &'a [DeployDetails],
}

impl<'a> ArtifactCollector<'a> {
  pub fn new(deploy_details: &'a [DeployDetails]) -> Self {
    Self { deploy_details }
  }

  /// One artifact per deploy-details entry staged by `project`. Checksums are
  /// taken from the deploy details as-is.
  pub fn collect<P: HostProject>(&self, project: &P) -> Vec<Artifact> {
    self
      .deploy_details
      .iter()
      .filter(|details| details.project == project.path())
      .map(to_artifact)
      .collect()
  }
}

fn to_artifact(details: &DeployDetails) -> Artifact {
  let name = details
    .artifact_path
    .rsplit('/')
    .next()
    .unwrap_or(&details.artifact_path);
  let publish = &details.publish;
  let artifact_type = match non_blank(publish.classifier.as_deref()) {
    Some(classifier) => format!("{}-{}", publish.artifact_type, classifier),
    None => publish.artifact_type.clone(),
  };

  Artifact {
    name: name.to_string(),
    artifact_type,
    md5: details.md5.clone(),
    sha1: details.sha1.clone(),
  }
}
