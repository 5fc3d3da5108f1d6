//! Content checksums for build artifacts and dependencies.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use md5::Md5;
use serde::{Deserialize, Serialize};
use sha1::{Digest, Sha1};

use crate::error::HashError;

/// MD5 and SHA-1 digests of a file, as lowercase hex strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Checksums {
  pub md5: String,
  pub sha1: String,
}

/// Computes content checksums for a file on disk.
///
/// The dependency resolver calls this once per distinct resolved file, so an
/// implementation is free to be expensive.
pub trait ChecksumProvider {
  fn checksums(&self, path: &Path) -> Result<Checksums, HashError>;
}

/// Reads the file once and feeds both digests from the same buffer.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileChecksums;

impl ChecksumProvider for FileChecksums {
  fn checksums(&self, path: &Path) -> Result<Checksums, HashError> {
    compute_checksums(path)
  }
}

/// Compute MD5 and SHA-1 of file contents.
pub fn compute_checksums(path: &Path) -> Result<Checksums, HashError> {
  let read_err = |e: std::io::Error| HashError::ReadFile {
    path: path.display().to_string(),
    source: e,
  };

  let file = File::open(path).map_err(read_err)?;
  let mut reader = BufReader::new(file);
  let mut md5 = Md5::new();
  let mut sha1 = Sha1::new();

  let mut buffer = [0u8; 8192];
  loop {
    let bytes_read = reader.read(&mut buffer).map_err(read_err)?;
    if bytes_read == 0 {
      break;
    }
    md5.update(&buffer[..bytes_read]);
    sha1.update(&buffer[..bytes_read]);
  }

  Ok(Checksums {
    md5: hex::encode(md5.finalize()),
    sha1: hex::encode(sha1.finalize()),
  })
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::io::Write;
  use tempfile::NamedTempFile;

  #[test]
  fn test_compute_checksums() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(b"hello world").unwrap();
    file.flush().unwrap();

    let sums = compute_checksums(file.path()).unwrap();
    assert_eq!(sums.md5, "5eb63bbbe01eeed093cb22bb8f5acdc3");
    assert_eq!(sums.sha1, "2aae6c35c94fcfb415dbe95f408b9ce91ee846ed");
  }

  #[test]
  fn test_empty_file() {
    let file = NamedTempFile::new().unwrap();

    let sums = FileChecksums.checksums(file.path()).unwrap();
    assert_eq!(sums.md5, "d41d8cd98f00b204e9800998ecf8427e");
    assert_eq!(sums.sha1, "da39a3ee5e6b4b0d3255bfef95601890afd80709");
  }

  #[test]
  fn test_larger_than_buffer() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(&vec![b'a'; 20_000]).unwrap();
    file.flush().unwrap();

    let streamed = compute_checksums(file.path()).unwrap();
    let mut sha1 = Sha1::new();
    sha1.update(vec![b'a'; 20_000]);
    assert_eq!(streamed.sha1, hex::encode(sha1.finalize()));
  }

  #[test]
  fn test_missing_file_reports_path() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("gone.jar");

    let err = compute_checksums(&missing).unwrap_err();
    assert!(err.to_string().contains("gone.jar"));
  }
}
