//! The root build-info record and its builder.
//!
//! A [`Build`] is only produced by [`BuildInfoBuilder::build`] and exposes
//! read accessors. The one change allowed afterwards is
//! [`Build::with_parent_build_id`], which consumes the record and returns the
//! patched copy.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::module::Module;
use crate::policy::{BuildRetention, LicenseControl, PromotionStatus};

/// Version of the build-info document layout.
pub const BUILD_INFO_VERSION: &str = "1.0.1";

/// `chrono` format of the `started` timestamp, e.g. `2024-03-01T10:15:30.000+0000`.
pub const STARTED_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f%z";

/// Build tool family that produced the record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BuildType {
  Gradle,
  Maven,
  Ant,
  Ivy,
  #[default]
  Generic,
}

impl BuildType {
  pub const fn as_str(&self) -> &'static str {
    match self {
      BuildType::Gradle => "GRADLE",
      BuildType::Maven => "MAVEN",
      BuildType::Ant => "ANT",
      BuildType::Ivy => "IVY",
      BuildType::Generic => "GENERIC",
    }
  }
}

impl fmt::Display for BuildType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

/// Name and version of a tool (the build tool itself, or a CI agent).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agent {
  pub name: String,
  pub version: String,
}

impl Agent {
  pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      version: version.into(),
    }
  }
}

/// Reference to the build that triggered this one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParentBuild {
  pub name: String,
  pub number: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Build {
  version: String,
  name: String,
  number: String,
  #[serde(rename = "type")]
  build_type: BuildType,
  started: String,
  duration_millis: i64,
  #[serde(skip_serializing_if = "Option::is_none")]
  build_agent: Option<Agent>,
  #[serde(skip_serializing_if = "Option::is_none")]
  agent: Option<Agent>,
  principal: String,
  artifactory_principal: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  url: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  vcs_revision: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  parent_name: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  parent_number: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  parent_build_id: Option<String>,
  license_control: LicenseControl,
  build_retention: BuildRetention,
  #[serde(default)]
  statuses: Vec<PromotionStatus>,
  #[serde(default)]
  properties: BTreeMap<String, String>,
  #[serde(default)]
  modules: Vec<Module>,
}

impl Build {
  pub fn version(&self) -> &str {
    &self.version
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn number(&self) -> &str {
    &self.number
  }

  pub fn build_type(&self) -> BuildType {
    self.build_type
  }

  pub fn started(&self) -> &str {
    &self.started
  }

  pub fn duration_millis(&self) -> i64 {
    self.duration_millis
  }

  pub fn build_agent(&self) -> Option<&Agent> {
    self.build_agent.as_ref()
  }

  pub fn agent(&self) -> Option<&Agent> {
    self.agent.as_ref()
  }

  pub fn principal(&self) -> &str {
    &self.principal
  }

  pub fn artifactory_principal(&self) -> &str {
    &self.artifactory_principal
  }

  pub fn url(&self) -> Option<&str> {
    self.url.as_deref()
  }

  pub fn vcs_revision(&self) -> Option<&str> {
    self.vcs_revision.as_deref()
  }

  pub fn parent(&self) -> Option<ParentBuild> {
    match (&self.parent_name, &self.parent_number) {
      (Some(name), Some(number)) => Some(ParentBuild {
        name: name.clone(),
        number: number.clone(),
      }),
      _ => None,
    }
  }

  pub fn parent_build_id(&self) -> Option<&str> {
    self.parent_build_id.as_deref()
  }

  pub fn license_control(&self) -> &LicenseControl {
    &self.license_control
  }

  pub fn build_retention(&self) -> &BuildRetention {
    &self.build_retention
  }

  pub fn statuses(&self) -> &[PromotionStatus] {
    &self.statuses
  }

  pub fn properties(&self) -> &BTreeMap<String, String> {
    &self.properties
  }

  pub fn modules(&self) -> &[Module] {
    &self.modules
  }

  /// Stamp the legacy `parentBuildId` field.
  ///
  /// Older repository servers read the parent build name from this field
  /// instead of `parentName`.
  pub fn with_parent_build_id(mut self, id: impl Into<String>) -> Self {
    self.parent_build_id = Some(id.into());
    self
  }
}

/// Accumulates build fields and produces an immutable [`Build`].
#[derive(Debug, Clone, Default)]
pub struct BuildInfoBuilder {
  name: String,
  number: Option<String>,
  build_type: BuildType,
  started: Option<String>,
  duration_millis: i64,
  build_agent: Option<Agent>,
  agent: Option<Agent>,
  principal: String,
  artifactory_principal: String,
  url: Option<String>,
  vcs_revision: Option<String>,
  parent: Option<ParentBuild>,
  license_control: LicenseControl,
  build_retention: BuildRetention,
  statuses: Vec<PromotionStatus>,
  properties: BTreeMap<String, String>,
  modules: Vec<Module>,
}

impl BuildInfoBuilder {
  pub fn new(name: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      ..Self::default()
    }
  }

  pub fn number(mut self, number: impl Into<String>) -> Self {
    self.number = Some(number.into());
    self
  }

  pub fn build_type(mut self, build_type: BuildType) -> Self {
    self.build_type = build_type;
    self
  }

  pub fn started(mut self, started: impl Into<String>) -> Self {
    self.started = Some(started.into());
    self
  }

  pub fn duration_millis(mut self, millis: i64) -> Self {
    self.duration_millis = millis;
    self
  }

  pub fn build_agent(mut self, agent: Agent) -> Self {
    self.build_agent = Some(agent);
    self
  }

  pub fn agent(mut self, agent: Agent) -> Self {
    self.agent = Some(agent);
    self
  }

  pub fn principal(mut self, principal: impl Into<String>) -> Self {
    self.principal = principal.into();
    self
  }

  pub fn artifactory_principal(mut self, principal: impl Into<String>) -> Self {
    self.artifactory_principal = principal.into();
    self
  }

  pub fn url(mut self, url: impl Into<String>) -> Self {
    self.url = Some(url.into());
    self
  }

  pub fn vcs_revision(mut self, revision: impl Into<String>) -> Self {
    self.vcs_revision = Some(revision.into());
    self
  }

  pub fn parent(mut self, parent: ParentBuild) -> Self {
    self.parent = Some(parent);
    self
  }

  pub fn license_control(mut self, license_control: LicenseControl) -> Self {
    self.license_control = license_control;
    self
  }

  pub fn build_retention(mut self, build_retention: BuildRetention) -> Self {
    self.build_retention = build_retention;
    self
  }

  pub fn add_status(mut self, status: PromotionStatus) -> Self {
    self.statuses.push(status);
    self
  }

  pub fn properties(mut self, properties: BTreeMap<String, String>) -> Self {
    self.properties = properties;
    self
  }

  pub fn add_module(mut self, module: Module) -> Self {
    self.modules.push(module);
    self
  }

  pub fn module_count(&self) -> usize {
    self.modules.len()
  }

  pub fn build(self) -> crate::Result<Build> {
    let number = self.number.ok_or(CoreError::MissingField("number"))?;
    let started = self.started.ok_or(CoreError::MissingField("started"))?;
    let (parent_name, parent_number) = match self.parent {
      Some(parent) => (Some(parent.name), Some(parent.number)),
      None => (None, None),
    };

    Ok(Build {
      version: BUILD_INFO_VERSION.to_string(),
      name: self.name,
      number,
      build_type: self.build_type,
      started,
      duration_millis: self.duration_millis,
      build_agent: self.build_agent,
      agent: self.agent,
      principal: self.principal,
      artifactory_principal: self.artifactory_principal,
      url: self.url,
      vcs_revision: self.vcs_revision,
      parent_name,
      parent_number,
      parent_build_id: None,
      license_control: self.license_control,
      build_retention: self.build_retention,
      statuses: self.statuses,
      properties: self.properties,
      modules: self.modules,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn minimal() -> BuildInfoBuilder {
    BuildInfoBuilder::new("app")
      .number("42")
      .started("2024-03-01T10:15:30.000+0000")
  }

  #[test]
  fn build_requires_number_and_started() {
    let err = BuildInfoBuilder::new("app").started("x").build().unwrap_err();
    assert!(matches!(err, CoreError::MissingField("number")));

    let err = BuildInfoBuilder::new("app").number("1").build().unwrap_err();
    assert!(matches!(err, CoreError::MissingField("started")));
  }

  #[test]
  fn optional_fields_are_omitted_from_json() {
    let build = minimal().build().unwrap();
    let json = serde_json::to_value(&build).unwrap();

    assert_eq!(json["name"], "app");
    assert_eq!(json["type"], "GENERIC");
    assert_eq!(json["version"], BUILD_INFO_VERSION);
    for key in ["url", "vcsRevision", "agent", "parentName", "parentNumber", "parentBuildId"] {
      assert!(json.get(key).is_none(), "{key} should be omitted");
    }
  }

  #[test]
  fn parent_build_id_is_a_patch() {
    let build = minimal()
      .parent(ParentBuild {
        name: "upstream".to_string(),
        number: "7".to_string(),
      })
      .build()
      .unwrap();
    assert!(build.parent_build_id().is_none());

    let patched = build.with_parent_build_id("upstream");
    assert_eq!(patched.parent_build_id(), Some("upstream"));
    assert_eq!(patched.parent().map(|p| p.number), Some("7".to_string()));
  }

  #[test]
  fn modules_and_statuses_keep_order() {
    let build = minimal()
      .add_module(Module::new("g:a:1"))
      .add_module(Module::new("g:b:1"))
      .build()
      .unwrap();

    let ids: Vec<_> = build.modules().iter().map(|m| m.id.as_str()).collect();
    assert_eq!(ids, ["g:a:1", "g:b:1"]);
    assert!(build.statuses().is_empty());
  }

  #[test]
  fn build_type_serializes_uppercase() {
    assert_eq!(serde_json::to_value(BuildType::Gradle).unwrap(), "GRADLE");
    assert_eq!(BuildType::Maven.to_string(), "MAVEN");
  }
}
