// bpk-common/src/config.rs
use std::env;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, warn};

use super::error::{BpkError, Result};

const DEFAULT_COMPONENTS_DIR: &str = "./bower_components";
const DEFAULT_COMMAND: &str = "update";
const DEFAULT_PROGRAM: &str = "bower";
const BOWERRC_FILENAME: &str = ".bowerrc";
const PROJECT_MANIFEST_FILENAME: &str = "bower.json";

/// Values supplied by the caller (usually CLI flags). Anything left as `None`
/// is filled in by [`Config::load`].
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub cwd: Option<PathBuf>,
    pub directory: Option<PathBuf>,
    pub command: Option<String>,
    pub extra_args: Vec<String>,
    pub skip_install: bool,
}

/// The subset of `.bowerrc` we care about.
#[derive(Debug, Default, Deserialize)]
struct BowerRc {
    directory: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub cwd: PathBuf,
    /// Install directory, relative to `cwd` unless absolute.
    pub directory: PathBuf,
    /// Package manager command to run before resolving; `None` skips it.
    pub command: Option<String>,
    pub program: String,
    pub extra_args: Vec<String>,
}

impl Config {
    pub fn load(overrides: ConfigOverrides) -> Result<Self> {
        debug!("Loading bowerpick configuration");

        let cwd = match overrides.cwd {
            Some(cwd) => cwd,
            None => env::current_dir().map_err(|e| {
                BpkError::Config(format!("Could not determine working directory: {e}"))
            })?,
        };
        debug!("Project root: {}", cwd.display());

        let directory = match overrides.directory {
            Some(dir) => dir,
            None => read_bowerrc_directory(&cwd)?
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_COMPONENTS_DIR)),
        };
        debug!("Components directory: {}", directory.display());

        let command = if overrides.skip_install {
            None
        } else {
            Some(
                overrides
                    .command
                    .unwrap_or_else(|| DEFAULT_COMMAND.to_string()),
            )
        };

        let program = env::var("BPK_BOWER_BIN")
            .ok()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_PROGRAM.to_string());

        debug!("Configuration loaded successfully.");
        Ok(Self {
            cwd,
            directory,
            command,
            program,
            extra_args: overrides.extra_args,
        })
    }

    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Absolute directory holding every installed dependency.
    pub fn base_dir(&self) -> PathBuf {
        self.cwd.join(&self.directory)
    }

    pub fn project_manifest_path(&self) -> PathBuf {
        self.cwd.join(PROJECT_MANIFEST_FILENAME)
    }

    pub fn bowerrc_path(&self) -> PathBuf {
        self.cwd.join(BOWERRC_FILENAME)
    }
}

/// Reads the `directory` entry of `<cwd>/.bowerrc`. An rc file that is not
/// valid JSON counts as empty.
fn read_bowerrc_directory(cwd: &Path) -> Result<Option<String>> {
    let rc_path = cwd.join(BOWERRC_FILENAME);
    if !rc_path.exists() {
        return Ok(None);
    }
    let raw = std::fs::read(&rc_path).map_err(|e| {
        BpkError::Config(format!("Failed to read {}: {e}", rc_path.display()))
    })?;
    match serde_json::from_slice::<BowerRc>(&raw) {
        Ok(rc) => Ok(rc.directory.filter(|d| !d.is_empty())),
        Err(e) => {
            warn!("Ignoring unparseable {}: {}", rc_path.display(), e);
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::*;

    fn overrides_for(cwd: &Path) -> ConfigOverrides {
        ConfigOverrides {
            cwd: Some(cwd.to_path_buf()),
            ..Default::default()
        }
    }

    #[test]
    fn defaults_without_bowerrc() {
        let dir = tempdir().unwrap();
        let config = Config::load(overrides_for(dir.path())).unwrap();
        assert_eq!(config.directory, PathBuf::from("./bower_components"));
        assert_eq!(config.command.as_deref(), Some("update"));
        assert_eq!(config.base_dir(), dir.path().join("./bower_components"));
        assert_eq!(config.project_manifest_path(), dir.path().join("bower.json"));
    }

    #[test]
    fn bowerrc_directory_is_used() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(".bowerrc"), r#"{"directory": "vendor/js"}"#).unwrap();
        let config = Config::load(overrides_for(dir.path())).unwrap();
        assert_eq!(config.directory, PathBuf::from("vendor/js"));
    }

    #[test]
    fn unparseable_bowerrc_falls_back_to_default() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(".bowerrc"), "directory = nope").unwrap();
        let config = Config::load(overrides_for(dir.path())).unwrap();
        assert_eq!(config.directory, PathBuf::from("./bower_components"));
    }

    #[test]
    fn explicit_directory_wins_over_bowerrc() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(".bowerrc"), r#"{"directory": "vendor/js"}"#).unwrap();
        let config = Config::load(ConfigOverrides {
            directory: Some(PathBuf::from("lib")),
            ..overrides_for(dir.path())
        })
        .unwrap();
        assert_eq!(config.directory, PathBuf::from("lib"));
    }

    #[test]
    fn skip_install_clears_command() {
        let dir = tempdir().unwrap();
        let config = Config::load(ConfigOverrides {
            command: Some("install".into()),
            skip_install: true,
            ..overrides_for(dir.path())
        })
        .unwrap();
        assert!(config.command.is_none());
    }
}
