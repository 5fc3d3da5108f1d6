//! Flat key/value property sources.
//!
//! Properties come from a TOML file, whose nested tables flatten into dotted
//! keys, followed by `key=value` overrides. Later sources win.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use tracing::debug;

use super::ConfigError;
use super::keys::ENV_PREFIX;

/// An ordered map of configuration properties.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Properties(BTreeMap<String, String>);

impl Properties {
  pub fn new() -> Self {
    Self(BTreeMap::new())
  }

  /// Load properties from a TOML file.
  pub fn load(path: &Path) -> Result<Self, ConfigError> {
    let content = fs::read_to_string(path).map_err(|e| ConfigError::Read {
      path: path.display().to_string(),
      source: e,
    })?;
    let props = Self::from_toml_str(&content).map_err(|e| match e {
      ConfigError::Parse { source, .. } => ConfigError::Parse {
        path: path.display().to_string(),
        source,
      },
      other => other,
    })?;
    debug!(path = %path.display(), count = props.len(), "loaded configuration");
    Ok(props)
  }

  /// Parse TOML content, flattening nested tables into dotted keys.
  ///
  /// ```toml
  /// [buildInfo.licenseControl]
  /// runChecks = true
  /// ```
  ///
  /// becomes `buildInfo.licenseControl.runChecks = "true"`. Arrays are joined
  /// with commas.
  pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
    let table: toml::Table = content.parse().map_err(|e| ConfigError::Parse {
      path: "<inline>".to_string(),
      source: e,
    })?;
    let mut props = Self::new();
    flatten_table("", &table, &mut props.0);
    Ok(props)
  }

  pub fn get(&self, key: &str) -> Option<&str> {
    self.0.get(key).map(String::as_str)
  }

  pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
    self.0.insert(key.into(), value.into());
  }

  /// Apply a `key=value` override.
  pub fn apply_override(&mut self, assignment: &str) -> Result<(), ConfigError> {
    let (key, value) = assignment
      .split_once('=')
      .ok_or_else(|| ConfigError::InvalidOverride(assignment.to_string()))?;
    let key = key.trim();
    if key.is_empty() {
      return Err(ConfigError::InvalidOverride(assignment.to_string()));
    }
    self.set(key, value);
    Ok(())
  }

  /// Record environment variables as `buildInfo.env.<NAME>` build variables.
  pub fn extend_env<I>(&mut self, vars: I)
  where
    I: IntoIterator<Item = (String, String)>,
  {
    for (name, value) in vars {
      self.0.insert(format!("{ENV_PREFIX}{name}"), value);
    }
  }

  /// All properties whose key starts with `prefix`, with full keys.
  pub fn with_prefix<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = (&'a str, &'a str)> + 'a {
    self
      .0
      .range(prefix.to_string()..)
      .take_while(move |(k, _)| k.starts_with(prefix))
      .map(|(k, v)| (k.as_str(), v.as_str()))
  }

  pub fn len(&self) -> usize {
    self.0.len()
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }
}

impl FromIterator<(String, String)> for Properties {
  fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
    Self(iter.into_iter().collect())
  }
}

fn flatten_table(prefix: &str, table: &toml::Table, out: &mut BTreeMap<String, String>) {
  for (key, value) in table {
    let full_key = if prefix.is_empty() {
      key.clone()
    } else {
      format!("{prefix}.{key}")
    };
    match value {
      toml::Value::Table(nested) => flatten_table(&full_key, nested, out),
      other => {
        out.insert(full_key, scalar_to_string(other));
      }
    }
  }
}

fn scalar_to_string(value: &toml::Value) -> String {
  match value {
    toml::Value::String(s) => s.clone(),
    toml::Value::Array(items) => items.iter().map(scalar_to_string).collect::<Vec<_>>().join(","),
    other => other.to_string(),
  }
}
