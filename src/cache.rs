//! The incremental cache (§4.J): an mtime-based change-detection map,
//! persisted alongside a snapshot of the [`FileIndex`] it backs.
//!
//! Persistence is a single `serde_json`-encoded file next to the teacher's
//! own cache convention (`.knowledge_cache.json`, renamed here to a
//! graph-scoped name) rather than the originating implementation's
//! `shelve`-backed store — `shelve` is a CPython pickle API with no Rust
//! equivalent, and `serde_json` already anchors this crate's persistence
//! story (see `config::GraphConfig`, `journal`).

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

use serde::{Deserialize, Serialize};
use tracing::warn;
use walkdir::WalkDir;

use crate::classify;
use crate::config::GraphConfig;
use crate::errors::AnalyzerError;
use crate::model::file::LogseqFile;
use crate::model::index::FileIndex;
use crate::model::FileType;

const CACHE_FILE_NAME: &str = ".logseq-analyzer-cache.json";

/// Path string -> last-seen mtime (epoch seconds), plus a snapshot of every
/// file previously extracted. Loaded wholesale at run start, saved wholesale
/// at run end.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Cache {
    pub mtimes: HashMap<String, u64>,
    pub files: Vec<LogseqFile>,
}

impl Cache {
    fn path(graph_dir: &Path) -> PathBuf {
        graph_dir.join(CACHE_FILE_NAME)
    }

    /// Loads the persisted cache if present and parseable. An unreadable or
    /// corrupt file is [`crate::errors::AnalyzerError::CacheCorruption`]:
    /// logged at `warn!` and never propagated — callers get `None` and
    /// rebuild from scratch.
    #[must_use]
    pub fn load(graph_dir: &Path) -> Option<Self> {
        let path = Self::path(graph_dir);
        if !path.is_file() {
            return None;
        }
        let data = match fs::read_to_string(&path) {
            Ok(d) => d,
            Err(e) => {
                let err = AnalyzerError::CacheCorruption { path: path.clone(), reason: e.to_string() };
                warn!(error = %err, "cache file unreadable; rebuilding from scratch");
                return None;
            }
        };
        match serde_json::from_str(&data) {
            Ok(cache) => Some(cache),
            Err(e) => {
                let err = AnalyzerError::CacheCorruption { path: path.clone(), reason: e.to_string() };
                warn!(error = %err, "cache file corrupt; rebuilding from scratch");
                None
            }
        }
    }

    /// Best-effort save; a write failure is logged, never propagated — cache
    /// persistence is never load-bearing for the correctness of a run.
    pub fn save(&self, graph_dir: &Path) {
        let path = Self::path(graph_dir);
        match serde_json::to_string_pretty(self) {
            Ok(data) => {
                if let Err(e) = fs::write(&path, data) {
                    warn!(path = %path.display(), error = %e, "failed to persist cache");
                }
            }
            Err(e) => warn!(error = %e, "failed to serialize cache"),
        }
    }

    /// Deletes the persisted cache file, if any (the `graph_cache = true`
    /// reset request).
    pub fn clear(graph_dir: &Path) {
        let path = Self::path(graph_dir);
        if path.is_file() {
            let _ = fs::remove_file(path);
        }
    }

    /// Rebuilds a [`FileIndex`] from the cached snapshot, dropping any file
    /// whose path no longer exists on disk.
    #[must_use]
    pub fn to_file_index(&self) -> FileIndex {
        let mut index = FileIndex::new();
        for file in &self.files {
            index.insert(file.clone());
        }
        index.remove_deleted_files();
        index
    }

    /// Builds a fresh snapshot from the current index and mtime map, ready
    /// to persist at the end of a run.
    #[must_use]
    pub fn from_index(index: &FileIndex, mtimes: HashMap<String, u64>) -> Self {
        Self { mtimes, files: index.iter().cloned().collect() }
    }
}

fn file_mtime(path: &Path) -> u64 {
    fs::metadata(path)
        .and_then(|m| m.modified())
        .ok()
        .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
        .map_or(0, |d| d.as_secs())
}

/// Walks the graph directory, returning every path whose mtime differs from
/// `cache`'s recorded value (or is absent), and updates `cache.mtimes` in
/// place as it goes. `.org` files are skipped; only files whose immediate
/// parent directory (or an ancestor) matches one of the five target
/// directory names are considered (§4.J).
pub fn modified_paths(graph_dir: &Path, config: &GraphConfig, cache: &mut Cache) -> Vec<PathBuf> {
    let mut changed = Vec::new();
    for entry in WalkDir::new(graph_dir).into_iter().filter_map(Result::ok) {
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if path.extension().is_some_and(|ext| ext == "org") {
            continue;
        }
        if classify::classify_file_type(path, config) == FileType::Other {
            continue;
        }
        let key = path.to_string_lossy().to_string();
        let mtime = file_mtime(path);
        let prev = cache.mtimes.get(&key).copied();
        if prev != Some(mtime) {
            changed.push(path.to_path_buf());
        }
        cache.mtimes.insert(key, mtime);
    }
    changed
}
