//! Build record assembly.

use bi_core::{
  Agent, Build, BuildInfoBuilder, BuildRetention, ChecksumProvider, LicenseControl, ParentBuild, PromotionStatus,
  STARTED_FORMAT, STATUS_STAGED,
};
use bi_platform::current_username;
use chrono::{DateTime, FixedOffset, TimeDelta, Utc};
use tracing::{debug, info, warn};

use super::{ExtractError, ModuleAssembler};
use crate::config::{ClientConfig, InfoConfig};
use crate::host::{DeployDetails, HostGraph, HostProject};
use crate::util::non_blank;

/// Assembles the build record for a whole host graph.
pub struct BuildRecordAssembler<'a> {
  config: &'a ClientConfig,
  deploy_details: &'a [DeployDetails],
  modules: ModuleAssembler<'a>,
}

impl<'a> BuildRecordAssembler<'a> {
  pub fn new(
    config: &'a ClientConfig,
    deploy_details: &'a [DeployDetails],
    checksums: &'a dyn ChecksumProvider,
  ) -> Self {
    Self {
      config,
      deploy_details,
      modules: ModuleAssembler::new(deploy_details, checksums),
    }
  }

  /// Assemble the record as of the current time.
  pub fn assemble<G: HostGraph>(&self, graph: &G) -> Result<Build, ExtractError> {
    self.assemble_at(graph, Utc::now())
  }

  /// Assemble the record as of `now`.
  ///
  /// `now` drives the duration, the fallback build number and the retention
  /// cutoff date.
  pub fn assemble_at<G: HostGraph>(&self, graph: &G, now: DateTime<Utc>) -> Result<Build, ExtractError> {
    let info = &self.config.info;
    let (started_raw, started) = parse_started(info)?;

    let name = non_blank(info.build_name.as_deref()).unwrap_or(graph.root().name());
    let number = match non_blank(info.build_number.as_deref()) {
      Some(number) => number.to_string(),
      None => now.timestamp_millis().to_string(),
    };

    let mut builder = BuildInfoBuilder::new(name)
      .number(&number)
      .build_type(graph.build_type())
      .started(started_raw)
      .duration_millis(now.signed_duration_since(started).num_milliseconds())
      .build_agent(graph.tool());

    if let (Some(agent_name), Some(agent_version)) =
      (non_blank(info.agent_name.as_deref()), non_blank(info.agent_version.as_deref()))
    {
      builder = builder.agent(Agent::new(agent_name, agent_version));
    }

    for project in graph.projects() {
      if !project.records_build_info() {
        continue;
      }
      if project.configurations().is_empty() {
        if self.deploy_details.iter().any(|d| d.project == project.path()) {
          warn!(project = project.path(), "project staged artifacts but has no configurations, not recording module");
        } else {
          debug!(project = project.path(), "no dependency configurations, not recording module");
        }
        continue;
      }
      builder = builder.add_module(self.modules.assemble(project));
    }

    let parent = match (
      non_blank(info.parent_build_name.as_deref()),
      non_blank(info.parent_build_number.as_deref()),
    ) {
      (Some(name), Some(number)) => Some(ParentBuild {
        name: name.to_string(),
        number: number.to_string(),
      }),
      _ => None,
    };
    if let Some(parent) = &parent {
      builder = builder.parent(parent.clone());
    }

    let principal = non_blank(info.principal.as_deref())
      .map(str::to_string)
      .unwrap_or_else(current_username);
    let artifactory_principal = non_blank(self.config.publisher.username.as_deref())
      .map(str::to_string)
      .unwrap_or_else(current_username);
    builder = builder
      .principal(&principal)
      .artifactory_principal(&artifactory_principal);

    if let Some(url) = non_blank(info.build_url.as_deref()) {
      builder = builder.url(url);
    }
    if let Some(revision) = non_blank(info.vcs_revision.as_deref()) {
      builder = builder.vcs_revision(revision);
    }

    builder = builder
      .license_control(license_control(info))
      .build_retention(build_retention(info, now));

    if info.release_enabled {
      let repository = self.config.publisher.repo_key.clone().unwrap_or_default();
      if repository.trim().is_empty() {
        warn!("release is enabled but no staging repository is configured");
      }
      builder = builder.add_status(PromotionStatus {
        status: STATUS_STAGED.to_string(),
        comment: info.release_comment.clone().unwrap_or_default(),
        repository,
        timestamp: started_raw.to_string(),
        user: artifactory_principal.clone(),
        ci_user: principal.clone(),
      });
    }

    let module_count = builder.module_count();
    let build = builder.properties(info.build_variables.clone()).build()?;

    info!(
      name = build.name(),
      number = build.number(),
      modules = module_count,
      "assembled build info"
    );

    // Older servers read the parent build name from parentBuildId.
    Ok(match parent {
      Some(parent) => build.with_parent_build_id(parent.name),
      None => build,
    })
  }
}

/// Parse the configured start time. Returns the raw string alongside the date.
fn parse_started(info: &InfoConfig) -> Result<(&str, DateTime<FixedOffset>), ExtractError> {
  let raw = info.build_started.as_deref().ok_or(ExtractError::MissingStartTime)?;
  let started = DateTime::parse_from_str(raw, STARTED_FORMAT).map_err(|e| ExtractError::InvalidStartTime {
    value: raw.to_string(),
    source: e,
  })?;
  Ok((raw, started))
}

fn license_control(info: &InfoConfig) -> LicenseControl {
  let config = &info.license_control;
  let mut lc = LicenseControl::new(config.run_checks);
  if let Some(recipients) = non_blank(config.violation_recipients.as_deref()) {
    lc.set_violation_recipients(recipients);
  }
  lc.include_published_artifacts = config.include_published_artifacts;
  if let Some(scopes) = non_blank(config.scopes.as_deref()) {
    lc.set_scopes(scopes);
  }
  lc.auto_discover = config.auto_discover;
  lc
}

fn build_retention(info: &InfoConfig, now: DateTime<Utc>) -> BuildRetention {
  let mut retention = BuildRetention::new(info.delete_build_artifacts);
  retention.count = info.build_retention_days;

  if let Some(days) = info.build_retention_minimum_days
    && days >= 0
  {
    retention.minimum_build_date = TimeDelta::try_days(days).and_then(|d| now.checked_sub_signed(d));
    if retention.minimum_build_date.is_none() {
      warn!(days, "minimum retention days out of range, ignoring");
    }
  }

  for number in &info.build_numbers_not_to_delete {
    retention.add_build_not_to_be_discarded(number);
  }
  retention
}
