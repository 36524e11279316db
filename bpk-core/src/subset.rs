// bpk-core/src/subset.rs
//! Per-dependency overrides of entry file resolution.
//!
//! A project opts a dependency into a subset by adding an entry under
//! `dependencies-subset` in its `bower.json`. The value is opaque to us and is
//! handed to whichever [`SubsetHook`] is registered under the dependency's
//! name.
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use bpk_common::error::{BpkError, Result};
use futures::future::{self, BoxFuture, FutureExt};
use serde_json::Value;
use tracing::debug;

pub trait SubsetHook: Send + Sync {
    /// Returns the absolute path of the file to use for the dependency
    /// installed at `dependency_dir`.
    fn resolve_path<'a>(
        &'a self,
        dependency_dir: &'a Path,
        config: &'a Value,
    ) -> BoxFuture<'a, Result<PathBuf>>;
}

#[derive(Clone, Default)]
pub struct SubsetRegistry {
    hooks: HashMap<String, Arc<dyn SubsetHook>>,
}

impl SubsetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, name: impl Into<String>, hook: Arc<dyn SubsetHook>) {
        let name = name.into();
        debug!("Registering subset hook for {}", name);
        self.hooks.insert(name, hook);
    }

    pub fn with_hook(mut self, name: impl Into<String>, hook: Arc<dyn SubsetHook>) -> Self {
        self.register(name, hook);
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.hooks.contains_key(name)
    }

    /// Looks up the hook for `name`. A missing hook is a `SubsetLoadError`.
    pub fn get(&self, name: &str) -> Result<Arc<dyn SubsetHook>> {
        self.hooks.get(name).cloned().ok_or_else(|| {
            BpkError::SubsetLoadError(format!("no subset registered for '{name}'"))
        })
    }
}

impl fmt::Debug for SubsetRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.hooks.keys().collect();
        names.sort();
        f.debug_struct("SubsetRegistry").field("hooks", &names).finish()
    }
}

/// Points at one file inside the dependency, named by the subset config:
/// either `"dist/part.js"` or `{ "file": "dist/part.js" }`.
#[derive(Debug, Clone, Copy, Default)]
pub struct EntryFileSubset;

impl EntryFileSubset {
    fn file_from_config(config: &Value) -> Result<&str> {
        let file = match config {
            Value::String(file) => Some(file.as_str()),
            Value::Object(map) => map.get("file").and_then(Value::as_str),
            _ => None,
        };
        file.filter(|f| !f.is_empty()).ok_or_else(|| {
            BpkError::SubsetLoadError(format!(
                "expected a file path or {{\"file\": ...}} in subset config, got {config}"
            ))
        })
    }
}

impl SubsetHook for EntryFileSubset {
    fn resolve_path<'a>(
        &'a self,
        dependency_dir: &'a Path,
        config: &'a Value,
    ) -> BoxFuture<'a, Result<PathBuf>> {
        let resolved = Self::file_from_config(config)
            .map(|file| dependency_dir.join(file.trim_start_matches('/')));
        future::ready(resolved).boxed()
    }
}

#[cfg(test)]
mod tests {
    use bpk_common::ErrorKind;
    use serde_json::json;

    use super::*;

    #[test]
    fn unregistered_name_is_subset_load_error() {
        let registry = SubsetRegistry::new();
        let err = registry.get("bootstrap").err().unwrap();
        assert_eq!(err.kind(), ErrorKind::SubsetLoad);
        assert!(err.to_string().contains("bootstrap"));
    }

    #[test]
    fn registered_hooks_are_found() {
        let registry = SubsetRegistry::new().with_hook("bootstrap", Arc::new(EntryFileSubset));
        assert!(registry.contains("bootstrap"));
        assert!(registry.get("bootstrap").is_ok());
        assert!(!registry.contains("jquery"));
    }

    #[tokio::test]
    async fn entry_file_accepts_string_and_object() {
        let dir = Path::new("/deps/bootstrap");
        let hook = EntryFileSubset;
        assert_eq!(
            hook.resolve_path(dir, &json!("js/modal.js")).await.unwrap(),
            dir.join("js/modal.js")
        );
        assert_eq!(
            hook.resolve_path(dir, &json!({"file": "/js/tab.js"}))
                .await
                .unwrap(),
            dir.join("js/tab.js")
        );
    }

    #[tokio::test]
    async fn entry_file_rejects_other_shapes() {
        let hook = EntryFileSubset;
        let err = hook
            .resolve_path(Path::new("/deps/x"), &json!(["a.js"]))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::SubsetLoad);
    }
}
