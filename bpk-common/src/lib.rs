// bpk-common/src/lib.rs
pub mod config;
pub mod error;
pub mod model;
pub mod pipeline;

// Re-export key types
pub use config::{Config, ConfigOverrides};
pub use error::{BpkError, ErrorKind, Result};
pub use model::{Dependency, ProjectManifest, ResolvedFile};
pub use pipeline::ResolveEvent;
