//! Test utilities for buildinfo-lib.
//!
//! Helpers for laying out resolved jars on disk and for observing how often
//! checksums are computed.

use std::cell::RefCell;
use std::path::{Path, PathBuf};

use bi_core::{ChecksumProvider, Checksums, FileChecksums, HashError};

use crate::host::ResolvedArtifact;

/// Write a small jar-like file whose content is its own name.
pub fn write_jar(dir: &Path, file_name: &str) -> PathBuf {
  let path = dir.join(file_name);
  std::fs::write(&path, file_name).unwrap();
  path
}

/// A resolved jar backed by `dir/file_name`. The file is not created.
pub fn jar(dir: &Path, file_name: &str, coordinate: &str) -> ResolvedArtifact {
  ResolvedArtifact {
    file: Some(dir.join(file_name)),
    artifact_type: "jar".to_string(),
    dependency_id: coordinate.to_string(),
  }
}

/// Delegates to [`FileChecksums`] and records every path it was asked about.
#[derive(Debug, Default)]
pub struct CountingChecksums {
  calls: RefCell<Vec<PathBuf>>,
}

impl CountingChecksums {
  pub fn calls(&self) -> Vec<PathBuf> {
    self.calls.borrow().clone()
  }

  pub fn calls_for(&self, path: &Path) -> usize {
    self.calls.borrow().iter().filter(|p| p.as_path() == path).count()
  }
}

impl ChecksumProvider for CountingChecksums {
  fn checksums(&self, path: &Path) -> Result<Checksums, HashError> {
    self.calls.borrow_mut().push(path.to_path_buf());
    FileChecksums.checksums(path)
  }
}

/// Always fails, as if every file became unreadable after resolution.
#[derive(Debug, Default)]
pub struct FailingChecksums;

impl ChecksumProvider for FailingChecksums {
  fn checksums(&self, path: &Path) -> Result<Checksums, HashError> {
    Err(HashError::ReadFile {
      path: path.display().to_string(),
      source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
    })
  }
}

/// Reports one file as gone, as if it was deleted after resolution.
#[derive(Debug)]
pub struct VanishingChecksums {
  vanished: PathBuf,
}

impl VanishingChecksums {
  pub fn new(vanished: &Path) -> Self {
    Self {
      vanished: vanished.to_path_buf(),
    }
  }
}

impl ChecksumProvider for VanishingChecksums {
  fn checksums(&self, path: &Path) -> Result<Checksums, HashError> {
    if path == self.vanished {
      return Err(HashError::ReadFile {
        path: path.display().to_string(),
        source: std::io::Error::new(std::io::ErrorKind::NotFound, "entity not found"),
      });
    }
    FileChecksums.checksums(path)
  }
}
