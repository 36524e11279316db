// bpk-aio/src/fs.rs
//! Filesystem primitives used by the resolver. Reads are async (tokio);
//! the one write path is synchronous and atomic.
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use bpk_common::error::{BpkError, Result};
use tempfile::NamedTempFile;
use tokio::fs;
use tracing::{debug, error, warn};

/// Reads the entire contents of a file into a byte vector.
pub async fn read_to_bytes_async(path: &Path) -> Result<Vec<u8>> {
    debug!("Async Reading file to bytes: {}", path.display());
    fs::read(path).await.map_err(|e| {
        debug!("Failed read file {}: {}", path.display(), e);
        BpkError::IoError(format!("{}: {}", path.display(), e))
    })
}

/// Checks if a path exists (resolving symlinks). Any error reads as "absent".
pub async fn path_exists_async(path: &Path) -> bool {
    fs::metadata(path).await.is_ok()
}

/// Lists the names of the non-directory entries directly inside `dir_path`,
/// in the order the OS returns them. Entries that fail to read are skipped.
pub async fn list_directory_files_async(dir_path: &Path) -> Result<Vec<String>> {
    debug!("Listing directory entries for: {}", dir_path.display());
    let mut read_dir = fs::read_dir(dir_path).await.map_err(|e| {
        debug!("Failed to read directory {}: {}", dir_path.display(), e);
        BpkError::IoError(format!("{}: {}", dir_path.display(), e))
    })?;

    let mut names = Vec::new();
    loop {
        let entry = match read_dir.next_entry().await {
            Ok(Some(entry)) => entry,
            Ok(None) => break,
            Err(e) => {
                warn!("Error reading entry in {}: {}", dir_path.display(), e);
                break;
            }
        };
        match entry.file_type().await {
            Ok(file_type) if file_type.is_dir() => {}
            Ok(_) => names.push(entry.file_name().to_string_lossy().into_owned()),
            Err(e) => {
                warn!(
                    "Failed to get file type for {} in {}: {}",
                    entry.path().display(),
                    dir_path.display(),
                    e
                );
            }
        }
    }
    Ok(names)
}

/// Atomically writes data to a file using a temporary file in the same
/// directory.
pub fn atomic_write_file(original_path: &Path, content: &[u8]) -> Result<()> {
    let dir = match original_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;

    let mut temp_file = NamedTempFile::new_in(dir)?;
    let temp_path = temp_file.path().to_path_buf();

    debug!(
        "Atomically writing {} bytes to {} via temp file {}",
        content.len(),
        original_path.display(),
        temp_path.display()
    );

    temp_file.write_all(content)?;
    temp_file.flush()?;
    temp_file.as_file().sync_all()?;

    temp_file.persist(original_path).map_err(|e| {
        error!(
            "Failed to persist temporary file {} over {}: {}",
            temp_path.display(),
            original_path.display(),
            e.error
        );
        BpkError::Io(Arc::new(e.error))
    })?;

    Ok(())
}
