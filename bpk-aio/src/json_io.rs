// bpk-aio/src/json_io.rs
use std::path::Path;

use bpk_common::error::{BpkError, Result};
use serde::de::DeserializeOwned;
use tracing::debug;

/// Asynchronously reads and deserializes data from a JSON file.
///
/// An unreadable file yields `IoError`; content that does not deserialize
/// into `T` yields `ParseError` naming the file.
pub async fn read_json_async<T: DeserializeOwned>(path: &Path) -> Result<T> {
    debug!("Async Reading JSON from: {}", path.display());
    let json_bytes = crate::fs::read_to_bytes_async(path).await?;

    serde_json::from_slice(&json_bytes)
        .map_err(|e| BpkError::ParseError(path.display().to_string(), e.to_string()))
}

#[cfg(test)]
mod tests {
    use std::fs;

    use bpk_common::model::PackageManifest;
    use bpk_common::ErrorKind;
    use tempfile::tempdir;

    use super::*;

    #[tokio::test]
    async fn parses_manifest() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bower.json");
        fs::write(&path, r#"{"main": "dist/jquery.js"}"#).unwrap();
        let manifest: PackageManifest = read_json_async(&path).await.unwrap();
        assert!(manifest.main.is_some());
    }

    #[tokio::test]
    async fn invalid_json_is_parse_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bower.json");
        fs::write(&path, "{ main: ").unwrap();
        let err = read_json_async::<PackageManifest>(&path).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Parse);
    }
}
