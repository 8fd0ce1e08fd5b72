//! [`LogseqFile`], the central entity of the data model (§3).

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::info::{BulletInfo, NamespaceInfo, SizeInfo, TimestampInfo};
use super::{FeatureKey, FeatureMap, FileType, NodeType};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathInfo {
    pub path: PathBuf,
    pub parent_dir: String,
    pub suffix: String,
    pub name: String,
    pub file_type: FileType,
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeState {
    pub has_backlinks: bool,
    pub backlinked: bool,
    pub backlinked_ns_only: bool,
    pub node_type: NodeType,
}

impl Default for NodeState {
    fn default() -> Self {
        Self { has_backlinks: false, backlinked: false, backlinked_ns_only: false, node_type: NodeType::default() }
    }
}

impl NodeState {
    /// Enforces the mutual-exclusion invariant from §3/§9: setting one of
    /// `backlinked`/`backlinked_ns_only` always clears the other.
    pub fn set_backlinked(&mut self) {
        self.backlinked = true;
        self.backlinked_ns_only = false;
    }

    pub fn set_backlinked_ns_only(&mut self) {
        self.backlinked_ns_only = true;
        self.backlinked = false;
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogseqFile {
    pub path: PathInfo,
    pub size: SizeInfo,
    pub timestamps: TimestampInfo,
    pub namespace: NamespaceInfo,
    pub bullets: BulletInfo,
    pub features: FeatureMap,
    pub node: NodeState,
    pub is_hls: bool,
    /// `hl-page`/`id`/`hl-stamp` keys found in this file's `[:span]` bullets,
    /// computed at extraction time so the asset resolver's HLS pass (§4.I)
    /// does not depend on `raw_text` being retained.
    pub hls_keys: Vec<String>,
    /// Raw file text, populated only when the pipeline runs with
    /// `write_graph = true` (§4.L: the index's raw text is report payload,
    /// not something every run carries).
    pub raw_text: Option<String>,
}

impl LogseqFile {
    #[must_use]
    pub fn logical_name(&self) -> &str {
        &self.path.name
    }

    #[must_use]
    pub fn file_type(&self) -> FileType {
        self.path.file_type
    }

    #[must_use]
    pub fn feature(&self, key: FeatureKey) -> &[String] {
        self.features.get(&key).map_or(&[], Vec::as_slice)
    }

    /// §4.D: `has_backlinks` is set if any outgoing-reference category fired.
    #[must_use]
    pub fn compute_has_backlinks(&self) -> bool {
        FeatureKey::ALL
            .iter()
            .any(|k| k.counts_as_outgoing() && self.features.get(k).is_some_and(|v| !v.is_empty()))
    }
}
