// bpk-core/src/locate.rs
//! Finds a dependency's entry file by naming conventions when its manifest
//! does not say.
//!
//! The cascade runs in a fixed order and stops at the first step that
//! matches anything:
//!
//! 1. `<name>*.js`
//! 2. `<name minus trailing "js">*.js`, only for names ending in `js`
//!    (`momentjs` ships `moment.js`)
//! 3. `<first half of name>*.js` (`jquery.elastic-1.6.11` ships
//!    `jquery.elastic.source.js`)
//! 4. `index*.js`
//!
//! Minified builds are then dropped from the winning step's matches and the
//! first remaining file, in directory listing order, is the entry. A step
//! whose matches were all minified does not hand over to the next step.
use std::fmt;
use std::path::{Path, PathBuf};

use bpk_aio::fs::list_directory_files_async;
use bpk_common::error::{BpkError, Result};
use glob::{MatchOptions, Pattern};
use tracing::{debug, instrument};

const JS_SUFFIX: &str = "js";
const INDEX_PREFIX: &str = "index";
const MINIFIED_PATTERN: &str = "*.min.js";

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: true,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CascadeStep {
    FullName,
    StrippedJsSuffix,
    HalfName,
    Index,
}

impl fmt::Display for CascadeStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            CascadeStep::FullName => "full name",
            CascadeStep::StrippedJsSuffix => "name without 'js' suffix",
            CascadeStep::HalfName => "first half of name",
            CascadeStep::Index => "index file",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatedEntry {
    pub path: PathBuf,
    pub step: CascadeStep,
}

/// Locates the entry file of `name` inside `<base_dir>/<name>/`.
#[instrument(skip(base_dir), fields(base = %base_dir.display()))]
pub async fn locate_entry(name: &str, base_dir: &Path) -> Result<LocatedEntry> {
    let folder = base_dir.join(name);
    let files = list_directory_files_async(&folder).await.map_err(|e| {
        debug!("Could not list {}: {}", folder.display(), e);
        not_found(name)
    })?;

    match select_entry(name, &files)? {
        Some((step, file)) => {
            debug!("Located {} via {}: {}", name, step, file);
            Ok(LocatedEntry {
                path: folder.join(file),
                step,
            })
        }
        None => Err(not_found(name)),
    }
}

/// Runs the cascade over an already-listed directory. Returns the winning
/// step and file name, or `None` when nothing survives.
pub fn select_entry<'a>(name: &str, files: &'a [String]) -> Result<Option<(CascadeStep, &'a str)>> {
    for (step, prefix) in cascade_prefixes(name) {
        let found = matching_prefix(files, &prefix)?;
        if found.is_empty() {
            continue;
        }
        let minified = Pattern::new(MINIFIED_PATTERN)?;
        let chosen = found
            .into_iter()
            .find(|file| !minified.matches_with(file, MATCH_OPTIONS));
        if chosen.is_none() {
            debug!("Only minified candidates for {} at step '{}'", name, step);
        }
        return Ok(chosen.map(|file| (step, file)));
    }
    Ok(None)
}

/// The prefixes tried by the cascade, in order.
pub fn cascade_prefixes(name: &str) -> Vec<(CascadeStep, String)> {
    let mut prefixes = vec![(CascadeStep::FullName, name.to_string())];
    if let Some(stripped) = name.strip_suffix(JS_SUFFIX) {
        prefixes.push((CascadeStep::StrippedJsSuffix, stripped.to_string()));
    }
    let char_count = name.chars().count();
    let half: String = name.chars().take(char_count.div_ceil(2)).collect();
    prefixes.push((CascadeStep::HalfName, half));
    prefixes.push((CascadeStep::Index, INDEX_PREFIX.to_string()));
    prefixes
}

fn matching_prefix<'a>(files: &'a [String], prefix: &str) -> Result<Vec<&'a str>> {
    let pattern = Pattern::new(&format!("{}*.js", Pattern::escape(prefix)))?;
    Ok(files
        .iter()
        .map(String::as_str)
        .filter(|file| pattern.matches_with(file, MATCH_OPTIONS))
        .collect())
}

fn not_found(name: &str) -> BpkError {
    BpkError::NotFound(format!("didn't find file for: {name}"))
}
