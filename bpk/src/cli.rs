// bpk/src/cli.rs
//! Defines the command-line argument structure using clap.
use std::path::PathBuf;
use std::sync::Arc;

use bpk_common::config::{Config, ConfigOverrides};
use bpk_common::error::{BpkError, Result};
use bpk_common::model::ResolvedFile;
use bpk_core::{EntryFileSubset, ResolutionOrchestrator, RunSummary, SubsetRegistry};
use clap::{ArgAction, Args, Parser, Subcommand};
use tokio::sync::broadcast;
use tracing::debug;

pub mod bundle;
pub mod list;
pub mod locate;
pub mod status;

use crate::cli::bundle::Bundle;
use crate::cli::list::List;
use crate::cli::locate::Locate;

const EVENT_CHANNEL_SIZE: usize = 100;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None, name = "bpk", bin_name = "bpk")]
#[command(propagate_version = true)]
pub struct CliArgs {
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Also write logs to a daily rolling file in this directory (with -v)
    #[arg(long, global = true, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,

    #[command(flatten)]
    pub project: ProjectArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Args, Debug, Clone, Default)]
pub struct ProjectArgs {
    /// Project root containing bower.json [default: current directory]
    #[arg(long, global = true, value_name = "DIR")]
    pub cwd: Option<PathBuf>,

    /// Components directory relative to the project root [default: from .bowerrc, else ./bower_components]
    #[arg(long, global = true, value_name = "DIR")]
    pub directory: Option<PathBuf>,

    /// Bower command to run before resolving
    #[arg(long = "command", global = true, value_name = "COMMAND", default_value = "update")]
    pub install_command: String,

    /// Resolve against the components directory as it is, without running bower
    #[arg(long, global = true)]
    pub skip_install: bool,

    /// Extra argument passed through to the bower command (repeatable)
    #[arg(long = "bower-arg", global = true, value_name = "ARG", allow_hyphen_values = true)]
    pub bower_args: Vec<String>,

    /// Dependency whose subset config names its entry file directly (repeatable)
    #[arg(long = "subset", global = true, value_name = "NAME")]
    pub subsets: Vec<String>,
}

impl ProjectArgs {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            cwd: self.cwd.clone(),
            directory: self.directory.clone(),
            command: Some(self.install_command.clone()),
            extra_args: self.bower_args.clone(),
            skip_install: self.skip_install,
        }
    }

    pub fn registry(&self) -> SubsetRegistry {
        let mut registry = SubsetRegistry::new();
        for name in &self.subsets {
            registry.register(name.clone(), Arc::new(EntryFileSubset));
        }
        registry
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the resolved entry file of every dependency, in declaration order
    List(List),
    /// Concatenate the resolved entry files into one script
    Bundle(Bundle),
    /// Show which file the naming heuristics pick for one dependency
    Locate(Locate),
}

impl Command {
    pub async fn run(&self, config: &Config, registry: Arc<SubsetRegistry>) -> Result<()> {
        match self {
            Self::List(command) => command.run(config, registry).await,
            Self::Bundle(command) => command.run(config, registry).await,
            Self::Locate(command) => command.run(config).await,
        }
    }
}

/// Runs a full resolution, handing each file to `on_file` as it is emitted.
/// Diagnostics are printed by [`status::handle_events`] while it runs.
pub(crate) async fn run_resolution<F>(
    config: &Config,
    registry: Arc<SubsetRegistry>,
    mut on_file: F,
) -> Result<RunSummary>
where
    F: FnMut(ResolvedFile) -> Result<()>,
{
    let (event_tx, event_rx) = broadcast::channel(EVENT_CHANNEL_SIZE);
    let status_handle = tokio::spawn(status::handle_events(event_rx));

    let orchestrator = ResolutionOrchestrator::new(config.clone(), registry, event_tx);
    let (mut output_rx, run_handle) = orchestrator.spawn();

    let mut sink_result = Ok(());
    while let Some(file) = output_rx.recv().await {
        if sink_result.is_ok() {
            sink_result = on_file(file);
        }
    }

    let run_result = run_handle
        .await
        .map_err(|e| BpkError::Generic(format!("Resolution task failed: {e}")))?;
    if let Err(e) = status_handle.await {
        debug!("Status task join error: {}", e);
    }

    let summary = run_result?;
    sink_result?;
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subset_flags_register_entry_file_hooks() {
        let args = CliArgs::parse_from([
            "bpk",
            "--subset",
            "bootstrap",
            "--subset",
            "jquery-ui",
            "list",
        ]);
        let registry = args.project.registry();
        assert!(registry.contains("bootstrap"));
        assert!(registry.contains("jquery-ui"));
        assert!(!registry.contains("jquery"));
    }

    #[test]
    fn project_flags_become_overrides() {
        let args = CliArgs::parse_from([
            "bpk",
            "bundle",
            "--cwd",
            "/srv/app",
            "--command",
            "install",
            "--bower-arg",
            "--production",
        ]);
        let overrides = args.project.overrides();
        assert_eq!(overrides.cwd, Some(PathBuf::from("/srv/app")));
        assert_eq!(overrides.command.as_deref(), Some("install"));
        assert_eq!(overrides.extra_args, vec!["--production".to_string()]);
        assert!(!overrides.skip_install);
    }
}
