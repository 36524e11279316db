// bpk-aio/src/process.rs
use std::path::Path;
use std::process::Output;
use std::process::Stdio;

use bpk_common::error::{BpkError, Result};
use tokio::process::Command;
use tracing::debug;

/// Asynchronously runs an external command and captures its output.
///
/// Only a failure to spawn is an error here; the caller decides what a
/// non-zero exit status means.
pub async fn run_command_async(program: &str, args: &[String], cwd: &Path) -> Result<Output> {
    debug!(
        "Async Running command: {} {:?} (cwd: {})",
        program,
        args,
        cwd.display()
    );

    let mut cmd = Command::new(program);
    cmd.args(args);
    cmd.current_dir(cwd);
    cmd.kill_on_drop(true);
    cmd.stdout(Stdio::piped());
    cmd.stderr(Stdio::piped());
    cmd.stdin(Stdio::null()); // Prevent hanging on stdin

    match cmd.output().await {
        Ok(output) => {
            if output.status.success() {
                debug!("Async Command finished successfully.");
            } else {
                debug!("Async Command failed with status: {}", output.status);
            }
            Ok(output)
        }
        Err(e) => {
            debug!("Async Failed to execute command {}: {}", program, e);
            Err(BpkError::CommandExecError(format!("{program}: {e}")))
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use bpk_common::ErrorKind;
    use tempfile::tempdir;

    use super::*;

    #[tokio::test]
    async fn captures_stdout() {
        let dir = tempdir().unwrap();
        let output = run_command_async("sh", &["-c".into(), "echo hello".into()], dir.path())
            .await
            .unwrap();
        assert!(output.status.success());
        assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "hello");
    }

    #[tokio::test]
    async fn missing_program_is_command_error() {
        let dir = tempdir().unwrap();
        let err = run_command_async("bpk-definitely-not-a-program", &[], dir.path())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Command);
    }
}
