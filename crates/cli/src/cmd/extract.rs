//! Implementation of the `buildinfo extract` command.
//!
//! Loads a graph snapshot and the client configuration, assembles the build
//! record and writes it as pretty JSON.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::debug;

use bi_core::{Build, FileChecksums};
use buildinfo_lib::BuildRecordAssembler;
use buildinfo_lib::config::{ClientConfig, Properties};
use buildinfo_lib::consts::DEFAULT_CONFIG_FILE;
use buildinfo_lib::snapshot::GraphSnapshot;

use crate::output::{OutputFormat, print_json, print_stat, print_success};

pub struct ExtractArgs {
  pub graph: PathBuf,
  pub config: Option<PathBuf>,
  pub defines: Vec<String>,
  pub include_env: bool,
  pub output: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ExtractSummary<'a> {
  name: &'a str,
  number: &'a str,
  modules: usize,
  artifacts: usize,
  dependencies: usize,
  output: &'a Path,
}

pub fn cmd_extract(args: ExtractArgs, format: OutputFormat) -> Result<()> {
  let props = load_properties(&args)?;
  let config = ClientConfig::from_properties(&props).context("Invalid build-info configuration")?;

  let graph = GraphSnapshot::load(&args.graph)
    .with_context(|| format!("Failed to load graph snapshot: {}", args.graph.display()))?;

  let build = BuildRecordAssembler::new(&config, &graph.deploy_details, &FileChecksums)
    .assemble(&graph)
    .context("Failed to extract build info")?;

  let Some(output) = args.output else {
    return print_json(&build);
  };

  let json = serde_json::to_string_pretty(&build).context("Failed to serialize build info")?;
  fs::write(&output, json).with_context(|| format!("Failed to write build info: {}", output.display()))?;

  let summary = summarize(&build, &output);
  if format.is_json() {
    print_json(&summary)?;
  } else {
    print_success(&format!("Build info written to {}", output.display()));
    print_stat("Build", &format!("{} #{}", summary.name, summary.number));
    print_stat("Modules", &summary.modules.to_string());
    print_stat("Artifacts", &summary.artifacts.to_string());
    print_stat("Dependencies", &summary.dependencies.to_string());
    let millis = u64::try_from(build.duration_millis()).unwrap_or_default();
    print_stat(
      "Duration",
      &humantime::format_duration(Duration::from_millis(millis)).to_string(),
    );
  }

  Ok(())
}

/// Configuration file, then `-D` overrides, then the process environment.
fn load_properties(args: &ExtractArgs) -> Result<Properties> {
  let mut props = match &args.config {
    Some(path) => {
      Properties::load(path).with_context(|| format!("Failed to load config: {}", path.display()))?
    }
    None => {
      let default = Path::new(DEFAULT_CONFIG_FILE);
      if default.exists() {
        Properties::load(default).with_context(|| format!("Failed to load config: {}", DEFAULT_CONFIG_FILE))?
      } else {
        debug!("no configuration file, using overrides only");
        Properties::new()
      }
    }
  };

  for define in &args.defines {
    props
      .apply_override(define)
      .with_context(|| format!("Invalid override: {}", define))?;
  }

  if args.include_env {
    props.extend_env(std::env::vars());
  }

  Ok(props)
}

fn summarize<'a>(build: &'a Build, output: &'a Path) -> ExtractSummary<'a> {
  let modules = build.modules();
  ExtractSummary {
    name: build.name(),
    number: build.number(),
    modules: modules.len(),
    artifacts: modules.iter().map(|m| m.artifacts.len()).sum(),
    dependencies: modules.iter().map(|m| m.dependencies.len()).sum(),
    output,
  }
}
