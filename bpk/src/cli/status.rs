// bpk/src/cli/status.rs
use bpk_common::pipeline::{LogStream, ResolveEvent};
use colored::*;
use tokio::sync::broadcast;
use tracing::debug;

const LABEL: &str = "bpk";

/// Prints run events to stderr until every sender is gone.
pub async fn handle_events(mut event_rx: broadcast::Receiver<ResolveEvent>) {
    loop {
        match event_rx.recv().await {
            Ok(event) => print_event(&event),
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                debug!("Status display lagged, skipped {} events", skipped);
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}

fn print_event(event: &ResolveEvent) {
    match event {
        ResolveEvent::CommandStarted { command } => {
            eprintln!("{} {}", "==>".bold().blue(), command.bold());
        }
        ResolveEvent::CommandLog { stream, line } => {
            let marker = match stream {
                LogStream::Stdout => "bower".cyan(),
                LogStream::Stderr => "bower".yellow(),
            };
            eprintln!("{marker} {line}");
        }
        ResolveEvent::RunStarted { total_dependencies } => {
            debug!("Resolving {} dependencies", total_dependencies);
        }
        ResolveEvent::DependencyResolved { name, path } => {
            debug!("{} -> {}", name, path.display());
        }
        ResolveEvent::DependencyFailed { name, error } => {
            eprintln!("{}: {} {}", LABEL.red().bold(), name.cyan(), error);
        }
        ResolveEvent::RunFailed { error } => {
            eprintln!("{}: {}", LABEL.red().bold(), error);
        }
        ResolveEvent::RunFinished { emitted, failed } => {
            if *failed > 0 {
                eprintln!(
                    "{} {} resolved, {} failed",
                    "==>".bold().blue(),
                    emitted.to_string().green(),
                    failed.to_string().red()
                );
            } else {
                debug!("{} dependencies resolved", emitted);
            }
        }
    }
}
