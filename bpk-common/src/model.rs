// bpk-common/src/model.rs
//! Manifest shapes and the records that flow out of a resolution run.
use std::path::PathBuf;

use serde::Deserialize;
use serde_json::{Map, Value};

/// A dependency declared in the project manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dependency {
    pub name: String,
    /// Position in the manifest's `dependencies` mapping.
    pub declared_order: usize,
}

/// One resolved entry file, ready for downstream processing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedFile {
    pub dependency_name: String,
    pub absolute_path: PathBuf,
    pub content: Vec<u8>,
}

/// The project's own `bower.json`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectManifest {
    #[serde(default)]
    pub dependencies: Map<String, Value>,
    #[serde(default, rename = "dependencies-subset")]
    pub dependencies_subset: Map<String, Value>,
}

impl ProjectManifest {
    /// Declared dependencies, in manifest order. Versions are ignored.
    pub fn dependencies(&self) -> Vec<Dependency> {
        self.dependencies
            .keys()
            .enumerate()
            .map(|(declared_order, name)| Dependency {
                name: name.clone(),
                declared_order,
            })
            .collect()
    }

    /// Subset configuration for `name`, if one is set. `null` and `false`
    /// count as unset.
    pub fn subset_config(&self, name: &str) -> Option<&Value> {
        self.dependencies_subset
            .get(name)
            .filter(|v| !matches!(v, Value::Null | Value::Bool(false)))
    }
}

/// `main` in a dependency's manifest is either one path or a list of them.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum MainField {
    Single(String),
    Many(Vec<String>),
}

/// A dependency's own `bower.json` / `.bower.json`. Only `main` matters here.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PackageManifest {
    #[serde(default)]
    pub main: Option<MainField>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dependencies_keep_declaration_order() {
        let manifest: ProjectManifest = serde_json::from_str(
            r#"{"dependencies": {"zepto": "1.0", "backbone": "1.1", "async": "*"}}"#,
        )
        .unwrap();
        let names: Vec<_> = manifest
            .dependencies()
            .into_iter()
            .map(|d| (d.declared_order, d.name))
            .collect();
        assert_eq!(
            names,
            vec![
                (0, "zepto".to_string()),
                (1, "backbone".to_string()),
                (2, "async".to_string())
            ]
        );
    }

    #[test]
    fn missing_dependencies_is_empty() {
        let manifest: ProjectManifest = serde_json::from_str(r#"{"name": "app"}"#).unwrap();
        assert!(manifest.dependencies().is_empty());
        assert!(manifest.subset_config("anything").is_none());
    }

    #[test]
    fn null_subset_config_is_unset() {
        let manifest: ProjectManifest = serde_json::from_str(
            r#"{"dependencies-subset": {"a": null, "b": false, "c": {"file": "x.js"}}}"#,
        )
        .unwrap();
        assert!(manifest.subset_config("a").is_none());
        assert!(manifest.subset_config("b").is_none());
        assert!(manifest.subset_config("c").is_some());
    }

    #[test]
    fn main_accepts_string_or_list() {
        let single: PackageManifest = serde_json::from_str(r#"{"main": "lib/a.js"}"#).unwrap();
        assert_eq!(single.main, Some(MainField::Single("lib/a.js".into())));

        let many: PackageManifest =
            serde_json::from_str(r#"{"main": ["dist/a.css", "dist/a.js"]}"#).unwrap();
        assert_eq!(
            many.main,
            Some(MainField::Many(vec!["dist/a.css".into(), "dist/a.js".into()]))
        );

        let none: PackageManifest = serde_json::from_str(r#"{"name": "backbone"}"#).unwrap();
        assert!(none.main.is_none());
    }
}
