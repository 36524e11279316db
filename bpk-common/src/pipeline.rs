// bpk-common/src/pipeline.rs
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::BpkError;

/// Progress and diagnostics emitted while a resolution run is in flight.
/// Errors are carried as strings so events stay cheap to broadcast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResolveEvent {
    CommandStarted {
        command: String,
    },
    CommandLog {
        stream: LogStream,
        line: String,
    },
    RunStarted {
        total_dependencies: usize,
    },
    DependencyResolved {
        name: String,
        path: PathBuf,
    },
    DependencyFailed {
        name: String,
        error: String,
    },
    RunFailed {
        error: String,
    },
    RunFinished {
        emitted: usize,
        failed: usize,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogStream {
    Stdout,
    Stderr,
}

impl ResolveEvent {
    pub fn dependency_failed(name: &str, error: &BpkError) -> Self {
        ResolveEvent::DependencyFailed {
            name: name.to_string(),
            error: error.to_string(),
        }
    }

    pub fn run_failed(error: &BpkError) -> Self {
        ResolveEvent::RunFailed {
            error: error.to_string(),
        }
    }

    /// Whether the event is a diagnostic the user should see as an error.
    pub fn is_error(&self) -> bool {
        matches!(
            self,
            ResolveEvent::DependencyFailed { .. } | ResolveEvent::RunFailed { .. }
        )
    }
}
