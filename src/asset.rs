//! The asset resolver (§4.I): substring-match backlink detection for
//! asset/draw mentions, plus an independent HLS (highlight) bullet-keying
//! pipeline. Both passes merge their outcomes into the same
//! `File.node.backlinked` field by file identity.

use std::collections::BTreeSet;

use crate::bullets;
use crate::model::index::{FileId, FileIndex};
use crate::model::{FeatureKey, FileType};

/// Literal prefix identifying an HLS highlight bullet (§9's decided open
/// question: exact literal-prefix match only, no fuzzy variants).
const HLS_BULLET_PREFIX: &str = "[:span]";

/// Extracts `"{hl-page}_{id}_{hl-stamp}"` keys from every `[:span]`-prefixed
/// bullet in an HLS file's raw text. Called once per HLS file at extraction
/// time and stored on [`crate::model::file::LogseqFile::hls_keys`].
#[must_use]
pub fn extract_hls_keys(text: &str) -> Vec<String> {
    let seg = bullets::segment(text);
    let mut keys = Vec::new();
    for bullet in &seg.bullets {
        if !bullet.trim_start().starts_with(HLS_BULLET_PREFIX) {
            continue;
        }
        let mut hl_page = None;
        let mut id = None;
        let mut hl_stamp = None;
        for raw_line in bullet.lines() {
            let mut line = raw_line.trim();
            if let Some(rest) = line.strip_prefix(HLS_BULLET_PREFIX) {
                line = rest.trim_start();
            }
            if let Some((key, value)) = parse_property_line(line) {
                match key.as_str() {
                    "hl-page" => hl_page = Some(value),
                    "id" => id = Some(value),
                    "hl-stamp" => hl_stamp = Some(value),
                    _ => {}
                }
            }
        }
        if let (Some(p), Some(i), Some(s)) = (hl_page, id, hl_stamp) {
            keys.push(format!("{p}_{i}_{s}"));
        }
    }
    keys
}

fn parse_property_line(line: &str) -> Option<(String, String)> {
    let (key, rest) = line.split_once("::")?;
    Some((key.trim().to_lowercase(), rest.trim().to_string()))
}

/// Runs both the substring-based asset backlink pass and the HLS
/// bullet-keying pass, mutating `FileIndex` in place.
pub fn analyze(index: &mut FileIndex) {
    let asset_ids: Vec<(FileId, String)> = index
        .ids()
        .filter_map(|id| {
            let f = index.by_identity(id)?;
            f.file_type().is_asset_like().then(|| (id, f.logical_name().to_lowercase()))
        })
        .collect();

    let mentions: Vec<String> = index
        .iter()
        .filter(|f| !f.file_type().is_asset_like())
        .flat_map(|f| {
            f.feature(FeatureKey::Assets)
                .iter()
                .chain(f.feature(FeatureKey::EmbeddedLinksAsset).iter())
                .map(|s| s.to_lowercase())
        })
        .collect();

    let mut backlinked_ids: BTreeSet<FileId> = BTreeSet::new();
    for (id, asset_name) in &asset_ids {
        if asset_name.is_empty() {
            continue;
        }
        if mentions.iter().any(|m| m.contains(asset_name.as_str())) {
            backlinked_ids.insert(*id);
        }
    }

    let hls_keys: BTreeSet<String> =
        index.iter().filter(|f| f.is_hls).flat_map(|f| f.hls_keys.iter().cloned()).collect();

    let sub_asset_ids: Vec<FileId> = index
        .ids()
        .filter(|id| {
            index
                .by_identity(*id)
                .is_some_and(|f| f.file_type() == FileType::SubAsset && hls_keys.contains(f.logical_name()))
        })
        .collect();
    backlinked_ids.extend(sub_asset_ids);

    for id in backlinked_ids {
        if let Some(f) = index.by_identity_mut(id) {
            f.node.backlinked = true;
        }
    }
}

/// Top-level asset files (plain mentions only) whose `node.backlinked` is
/// still false after [`analyze`] has run — feeds the report's
/// `moved_files_assets` candidate list.
#[must_use]
pub fn unreferenced_assets(index: &FileIndex) -> Vec<String> {
    index
        .files_with(|f| f.file_type() == FileType::Asset && !f.node.backlinked)
        .map(|f| f.logical_name().to_string())
        .collect()
}

/// Nested (`sub_asset`) files still unbacklinked after both passes — these
/// are the files the HLS bullet-keying pipeline targets, so they feed the
/// report's `moved_files_hls_assets` candidate list.
#[must_use]
pub fn unreferenced_hls_assets(index: &FileIndex) -> Vec<String> {
    index
        .files_with(|f| f.file_type() == FileType::SubAsset && !f.node.backlinked)
        .map(|f| f.logical_name().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::file::{LogseqFile, NodeState, PathInfo};
    use crate::model::info::{BulletInfo, NamespaceInfo, SizeInfo, TimestampInfo};
    use crate::model::FeatureMap;
    use std::path::PathBuf;

    fn file(name: &str, file_type: FileType, features: FeatureMap, is_hls: bool, hls_keys: Vec<String>) -> LogseqFile {
        LogseqFile {
            path: PathInfo {
                path: PathBuf::from(format!("/g/assets/{name}")),
                parent_dir: "assets".to_string(),
                suffix: String::new(),
                name: name.to_string(),
                file_type,
                url: String::new(),
            },
            size: SizeInfo::new(10),
            timestamps: TimestampInfo::new(0, 0, 0),
            namespace: NamespaceInfo::from_logical_name(name, "/"),
            bullets: BulletInfo::default(),
            features,
            node: NodeState::default(),
            is_hls,
            hls_keys,
            raw_text: None,
        }
    }

    #[test]
    fn asset_backlinked_by_substring_mention() {
        let mut index = FileIndex::new();
        let mut page_features = FeatureMap::new();
        page_features.insert(
            FeatureKey::EmbeddedLinksAsset,
            vec!["![fig](../assets/diagram_v2.png)".to_string()],
        );
        index.insert(file("launch", FileType::Page, page_features, false, vec![]));
        index.insert(file("diagram_v2", FileType::Asset, FeatureMap::new(), false, vec![]));
        index.insert(file("unused", FileType::Asset, FeatureMap::new(), false, vec![]));

        analyze(&mut index);

        let diagram = index.by_name("diagram_v2")[0];
        assert!(diagram.node.backlinked);
        let unreferenced = unreferenced_assets(&index);
        assert_eq!(unreferenced, vec!["unused".to_string()]);
    }

    #[test]
    fn hls_bullet_key_extraction_scenario() {
        let text = "- [:span] hl-page:: mybook\n  id:: abc123\n  hl-stamp:: 1700000000";
        let keys = extract_hls_keys(text);
        assert_eq!(keys, vec!["mybook_abc123_1700000000".to_string()]);
    }

    #[test]
    fn hls_keyed_sub_asset_is_backlinked() {
        let mut index = FileIndex::new();
        index.insert(file("hls__mybook", FileType::Page, FeatureMap::new(), true, vec!["mybook_abc123_1700000000".to_string()]));
        index.insert(file("mybook_abc123_1700000000", FileType::SubAsset, FeatureMap::new(), false, vec![]));

        analyze(&mut index);

        let asset = index.by_name("mybook_abc123_1700000000")[0];
        assert!(asset.node.backlinked);
    }
}
