// bpk-core/src/resolve.rs
//! Resolution of a single dependency to its entry file.
use std::path::{Path, PathBuf};

use bpk_aio::fs::{path_exists_async, read_to_bytes_async};
use bpk_aio::json_io::read_json_async;
use bpk_common::error::Result;
use bpk_common::model::{MainField, PackageManifest, ResolvedFile};
use bpk_common::pipeline::ResolveEvent;
use glob::Pattern;
use serde_json::Value;
use tokio::sync::broadcast;
use tracing::{debug, instrument};

use crate::locate::locate_entry;
use crate::subset::SubsetRegistry;

const MANIFEST_FILENAME: &str = "bower.json";
const INTERNAL_MANIFEST_FILENAME: &str = ".bower.json";
const JS_PATTERN: &str = "*.js";

/// Resolves `name` to its entry file and reads it.
///
/// With a subset config the registered hook alone decides the path.
/// Otherwise the dependency's manifest `main` is used when it names a
/// JavaScript file, and the naming cascade in [`crate::locate`] covers the
/// rest.
#[instrument(skip(base_dir, subset_config, registry), fields(subset = subset_config.is_some()))]
pub async fn resolve_dependency(
    base_dir: &Path,
    name: &str,
    subset_config: Option<&Value>,
    registry: &SubsetRegistry,
) -> Result<ResolvedFile> {
    let path = resolve_entry_path(base_dir, name, subset_config, registry).await?;
    debug!("Reading entry file for {}: {}", name, path.display());
    let content = read_to_bytes_async(&path).await?;
    Ok(ResolvedFile {
        dependency_name: name.to_string(),
        absolute_path: path,
        content,
    })
}

/// Like [`resolve_dependency`], but reports a failure on `event_tx` instead
/// of returning it.
pub async fn resolve_and_report(
    base_dir: &Path,
    name: &str,
    subset_config: Option<&Value>,
    registry: &SubsetRegistry,
    event_tx: &broadcast::Sender<ResolveEvent>,
) -> Option<ResolvedFile> {
    match resolve_dependency(base_dir, name, subset_config, registry).await {
        Ok(file) => Some(file),
        Err(e) => {
            debug!("Failed to resolve {}: {}", name, e);
            event_tx.send(ResolveEvent::dependency_failed(name, &e)).ok();
            None
        }
    }
}

async fn resolve_entry_path(
    base_dir: &Path,
    name: &str,
    subset_config: Option<&Value>,
    registry: &SubsetRegistry,
) -> Result<PathBuf> {
    let dependency_dir = base_dir.join(name);

    if let Some(config) = subset_config {
        let hook = registry.get(name)?;
        debug!("Using subset hook for {}", name);
        return hook.resolve_path(&dependency_dir, config).await;
    }

    let Some(manifest_path) = find_manifest(&dependency_dir).await else {
        debug!("No manifest for {}, searching by name", name);
        return Ok(locate_entry(name, base_dir).await?.path);
    };

    let manifest: PackageManifest = read_json_async(&manifest_path).await?;
    match select_main(manifest.main.as_ref())? {
        Some(main) => Ok(dependency_dir.join(main.trim_start_matches('/'))),
        None => {
            debug!(
                "{} has no usable main entry, searching by name",
                manifest_path.display()
            );
            Ok(locate_entry(name, base_dir).await?.path)
        }
    }
}

/// `bower.json` if present, else `.bower.json`, else nothing.
async fn find_manifest(dependency_dir: &Path) -> Option<PathBuf> {
    for file_name in [MANIFEST_FILENAME, INTERNAL_MANIFEST_FILENAME] {
        let candidate = dependency_dir.join(file_name);
        if path_exists_async(&candidate).await {
            return Some(candidate);
        }
    }
    None
}

/// Picks the entry named by a manifest's `main`.
///
/// For a list, only the first JavaScript entry is used; packages that list
/// several scripts get just the first one.
pub fn select_main(main: Option<&MainField>) -> Result<Option<&str>> {
    match main {
        None => Ok(None),
        Some(MainField::Single(entry)) => Ok(Some(entry.as_str()).filter(|e| !e.is_empty())),
        Some(MainField::Many(entries)) => {
            let js = Pattern::new(JS_PATTERN)?;
            Ok(entries
                .iter()
                .map(String::as_str)
                .find(|entry| js.matches(base_name(entry))))
        }
    }
}

fn base_name(entry: &str) -> &str {
    entry.rsplit('/').next().unwrap_or(entry)
}
