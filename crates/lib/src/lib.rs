//! buildinfo-lib: build-info extraction over a host build graph.
//!
//! - [`host`]: the read-only capability traits a build tool implements
//! - [`config`]: client configuration from flat build-info properties
//! - [`extract`]: dependency, artifact, module and build record assembly
//! - [`snapshot`]: a serde-backed host graph loaded from JSON

pub mod config;
pub mod consts;
pub mod extract;
pub mod host;
pub mod snapshot;
pub mod util;

pub use extract::{BuildRecordAssembler, ExtractError, ModuleError};
