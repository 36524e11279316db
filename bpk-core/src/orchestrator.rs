// bpk-core/src/orchestrator.rs
use std::sync::Arc;

use bpk_aio::json_io::read_json_async;
use bpk_common::config::Config;
use bpk_common::error::{BpkError, Result};
use bpk_common::model::{ProjectManifest, ResolvedFile};
use bpk_common::pipeline::ResolveEvent;
use futures::future::join_all;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tracing::{debug, instrument, warn};

use crate::install::run_install_command;
use crate::resolve::resolve_and_report;
use crate::subset::SubsetRegistry;

const OUTPUT_CHANNEL_SIZE: usize = 100;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub declared: usize,
    pub emitted: usize,
    pub failed: usize,
}

/// Drives one resolution run: optional install command, project manifest,
/// every dependency at once, then ordered emission.
#[derive(Debug, Clone)]
pub struct ResolutionOrchestrator {
    config: Config,
    registry: Arc<SubsetRegistry>,
    event_tx: broadcast::Sender<ResolveEvent>,
}

impl ResolutionOrchestrator {
    pub fn new(
        config: Config,
        registry: Arc<SubsetRegistry>,
        event_tx: broadcast::Sender<ResolveEvent>,
    ) -> Self {
        Self {
            config,
            registry,
            event_tx,
        }
    }

    /// Starts the run on its own task and hands back the output sequence.
    /// The receiver yields files in declaration order and ends when the run
    /// is over, whatever its outcome.
    pub fn spawn(self) -> (mpsc::Receiver<ResolvedFile>, JoinHandle<Result<RunSummary>>) {
        let (output_tx, output_rx) = mpsc::channel(OUTPUT_CHANNEL_SIZE);
        let handle = tokio::spawn(async move { self.run(output_tx).await });
        (output_rx, handle)
    }

    /// Runs the install command, then resolves. An install failure ends the
    /// run with nothing emitted.
    pub async fn run(self, output_tx: mpsc::Sender<ResolvedFile>) -> Result<RunSummary> {
        if let Err(e) = run_install_command(&self.config, &self.event_tx).await {
            debug!("Install command failed: {}", e);
            self.event_tx.send(ResolveEvent::run_failed(&e)).ok();
            return Err(e);
        }
        self.resolve_all(output_tx).await
    }

    /// Resolves every declared dependency and writes the successes to
    /// `output_tx` in declaration order. The sender is dropped on return,
    /// which closes the output.
    #[instrument(skip_all, fields(cwd = %self.config.cwd().display()))]
    pub async fn resolve_all(&self, output_tx: mpsc::Sender<ResolvedFile>) -> Result<RunSummary> {
        let manifest_path = self.config.project_manifest_path();
        let manifest: ProjectManifest = match read_json_async(&manifest_path).await {
            Ok(manifest) => manifest,
            Err(e) => {
                let err = BpkError::ManifestError(e.to_string());
                debug!("Fatal manifest error: {}", err);
                self.event_tx.send(ResolveEvent::run_failed(&err)).ok();
                return Err(err);
            }
        };

        let dependencies = manifest.dependencies();
        let base_dir = self.config.base_dir();
        debug!(
            "Resolving {} dependencies from {}",
            dependencies.len(),
            base_dir.display()
        );
        self.event_tx
            .send(ResolveEvent::RunStarted {
                total_dependencies: dependencies.len(),
            })
            .ok();

        // All resolutions are polled together on this task; join_all keeps
        // the input order, so results line up with `dependencies`.
        let attempts = dependencies.iter().map(|dependency| {
            resolve_and_report(
                &base_dir,
                &dependency.name,
                manifest.subset_config(&dependency.name),
                &self.registry,
                &self.event_tx,
            )
        });
        let results = join_all(attempts).await;

        let mut summary = RunSummary {
            declared: dependencies.len(),
            ..Default::default()
        };
        for (dependency, result) in dependencies.iter().zip(results) {
            let Some(file) = result else {
                summary.failed += 1;
                continue;
            };
            self.event_tx
                .send(ResolveEvent::DependencyResolved {
                    name: dependency.name.clone(),
                    path: file.absolute_path.clone(),
                })
                .ok();
            if output_tx.send(file).await.is_err() {
                warn!("Output receiver dropped, stopping emission");
                break;
            }
            summary.emitted += 1;
        }

        self.event_tx
            .send(ResolveEvent::RunFinished {
                emitted: summary.emitted,
                failed: summary.failed,
            })
            .ok();
        debug!("Resolution finished: {:?}", summary);
        Ok(summary)
    }
}
