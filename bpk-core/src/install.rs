// bpk-core/src/install.rs
//! Runs the package manager (`bower update` by default) before resolution so
//! the components directory is populated.
use bpk_aio::process::run_command_async;
use bpk_common::config::Config;
use bpk_common::error::{BpkError, Result};
use bpk_common::pipeline::{LogStream, ResolveEvent};
use tokio::sync::broadcast;
use tracing::{debug, info, instrument};

#[instrument(skip_all, fields(program = %config.program, command = ?config.command))]
pub async fn run_install_command(
    config: &Config,
    event_tx: &broadcast::Sender<ResolveEvent>,
) -> Result<()> {
    let Some(command) = config.command.as_deref() else {
        debug!("Install command disabled, using components directory as-is");
        return Ok(());
    };

    let mut args = Vec::with_capacity(config.extra_args.len() + 1);
    args.push(command.to_string());
    args.extend(config.extra_args.iter().cloned());

    event_tx
        .send(ResolveEvent::CommandStarted {
            command: format!("{} {}", config.program, args.join(" ")),
        })
        .ok();

    let output = run_command_async(&config.program, &args, config.cwd()).await?;

    for (stream, bytes) in [
        (LogStream::Stdout, &output.stdout),
        (LogStream::Stderr, &output.stderr),
    ] {
        for line in String::from_utf8_lossy(bytes).lines() {
            if line.trim().is_empty() {
                continue;
            }
            info!("{} {}", config.program, line);
            event_tx
                .send(ResolveEvent::CommandLog {
                    stream,
                    line: line.to_string(),
                })
                .ok();
        }
    }

    if !output.status.success() {
        return Err(BpkError::CommandExecError(format!(
            "'{} {}' exited with {}",
            config.program, command, output.status
        )));
    }
    Ok(())
}

#[cfg(all(test, unix))]
mod tests {
    use std::path::PathBuf;

    use bpk_common::ErrorKind;
    use tempfile::tempdir;

    use super::*;

    fn config_with(cwd: PathBuf, program: &str, command: Option<&str>, extra: &[&str]) -> Config {
        Config {
            cwd,
            directory: PathBuf::from("bower_components"),
            command: command.map(str::to_string),
            program: program.to_string(),
            extra_args: extra.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[tokio::test]
    async fn skipped_when_no_command() {
        let dir = tempdir().unwrap();
        let (event_tx, _rx) = broadcast::channel(8);
        let config = config_with(dir.path().to_path_buf(), "does-not-exist", None, &[]);
        run_install_command(&config, &event_tx).await.unwrap();
    }

    #[tokio::test]
    async fn forwards_output_lines() {
        let dir = tempdir().unwrap();
        let (event_tx, mut event_rx) = broadcast::channel(8);
        // `echo update --quiet` stands in for the package manager.
        let config = config_with(dir.path().to_path_buf(), "echo", Some("update"), &["--quiet"]);
        run_install_command(&config, &event_tx).await.unwrap();

        assert!(matches!(
            event_rx.recv().await.unwrap(),
            ResolveEvent::CommandStarted { .. }
        ));
        assert_eq!(
            event_rx.recv().await.unwrap(),
            ResolveEvent::CommandLog {
                stream: LogStream::Stdout,
                line: "update --quiet".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn non_zero_exit_is_command_error() {
        let dir = tempdir().unwrap();
        let (event_tx, _rx) = broadcast::channel(8);
        let config = config_with(dir.path().to_path_buf(), "false", Some("update"), &[]);
        let err = run_install_command(&config, &event_tx).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Command);
    }
}
