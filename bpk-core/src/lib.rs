// bpk-core/src/lib.rs

pub mod install;
pub mod locate;
pub mod orchestrator;
pub mod resolve;
pub mod subset;

// Re-export key types for easier use by the CLI crate
pub use locate::{locate_entry, CascadeStep, LocatedEntry};
pub use orchestrator::{ResolutionOrchestrator, RunSummary};
pub use resolve::resolve_dependency;
pub use subset::{EntryFileSubset, SubsetHook, SubsetRegistry};
