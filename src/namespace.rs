//! The namespace analyzer (§4.G): detects three conflict classes over
//! hierarchical (`/`-separated) logical names, emits the namespace tree, and
//! analyzes `{{namespace [[X]]}}` queries.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::Path;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::classify;
use crate::config::GraphConfig;
use crate::model::index::FileIndex;
use crate::model::FeatureKey;

/// A recursive string -> subtree map, mirroring §3's `NamespaceStructure`
/// tree field.
pub type NamespaceTree = BTreeMap<String, NamespaceTreeNode>;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NamespaceTreeNode {
    pub children: NamespaceTree,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamespaceQuery {
    pub found_in: String,
    pub namespace: String,
    pub size: u64,
    pub external_url: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NamespaceAnalysis {
    /// namespace part -> full names of namespace files carrying that part,
    /// where the part collides with some non-namespace file's logical name.
    pub conflicts_non_namespace: BTreeMap<String, Vec<String>>,
    /// namespace part -> full names, where the part is itself a dangling
    /// link somewhere in the graph.
    pub conflicts_dangling: BTreeMap<String, Vec<String>>,
    /// namespace part -> depth -> full names carrying that part at that
    /// depth, restricted to parts observed at 2+ distinct depths.
    pub conflicts_parent_depth: BTreeMap<String, BTreeMap<usize, Vec<String>>>,
    /// namespace part -> depth -> unique "prefix up to that depth" strings.
    pub conflicts_parent_depth_prefixes: BTreeMap<String, BTreeMap<usize, BTreeSet<String>>>,
    pub tree: NamespaceTree,
    pub queries: Vec<NamespaceQuery>,
}

fn page_ref_regex() -> &'static regex::Regex {
    static RE: OnceLock<regex::Regex> = OnceLock::new();
    RE.get_or_init(|| regex::Regex::new(r"\[\[([^\]]+)\]\]").unwrap())
}

/// Runs the namespace analysis pass. `dangling_links` is component F's
/// output; `graph_root`/`config` are needed to construct the optional
/// external-viewer URL on each surviving `{{namespace [[X]]}}` query.
#[must_use]
pub fn analyze(
    index: &FileIndex,
    dangling_links: &[(String, usize)],
    graph_root: &Path,
    config: &GraphConfig,
) -> NamespaceAnalysis {
    let dangling: BTreeSet<String> = dangling_links.iter().map(|(name, _)| name.clone()).collect();

    let non_namespace_names: BTreeSet<String> = index
        .iter()
        .filter(|f| !f.namespace.is_namespace)
        .map(|f| f.logical_name().to_lowercase())
        .collect();

    let mut conflicts_non_namespace: BTreeMap<String, Vec<String>> = BTreeMap::new();
    let mut conflicts_dangling: BTreeMap<String, Vec<String>> = BTreeMap::new();
    let mut part_depths: BTreeMap<String, BTreeMap<usize, Vec<String>>> = BTreeMap::new();
    let mut part_depth_prefixes: BTreeMap<String, BTreeMap<usize, BTreeSet<String>>> = BTreeMap::new();
    let mut tree: NamespaceTree = NamespaceTree::new();
    let mut flat_sizes: HashMap<String, u64> = HashMap::new();

    for file in index.iter().filter(|f| f.namespace.is_namespace) {
        let name = file.logical_name().to_string();
        flat_sizes.insert(name.to_lowercase(), file.size.size);

        let mut node = &mut tree;
        for (part, _level) in &file.namespace.parts {
            node = &mut node.entry(part.clone()).or_default().children;
        }

        for (part, level) in &file.namespace.parts {
            let part_lower = part.to_lowercase();
            if non_namespace_names.contains(&part_lower) {
                conflicts_non_namespace.entry(part.clone()).or_default().push(name.clone());
            }
            if dangling.contains(&part_lower) {
                conflicts_dangling.entry(part.clone()).or_default().push(name.clone());
            }
            let prefix =
                file.namespace.parts.iter().take(*level).map(|(p, _)| p.as_str()).collect::<Vec<_>>().join("/");
            part_depths.entry(part.clone()).or_default().entry(*level).or_default().push(name.clone());
            part_depth_prefixes.entry(part.clone()).or_default().entry(*level).or_default().insert(prefix);
        }
    }

    let conflicts_parent_depth: BTreeMap<String, BTreeMap<usize, Vec<String>>> =
        part_depths.into_iter().filter(|(_, depths)| depths.len() > 1).collect();
    let conflicts_parent_depth_prefixes: BTreeMap<String, BTreeMap<usize, BTreeSet<String>>> = part_depth_prefixes
        .into_iter()
        .filter(|(part, _)| conflicts_parent_depth.contains_key(part))
        .collect();

    let mut queries = Vec::new();
    for file in index.iter() {
        for text in file.feature(FeatureKey::NamespaceQueries) {
            let matches: Vec<String> =
                page_ref_regex().captures_iter(text).map(|c| c[1].to_string()).collect();
            if matches.len() != 1 {
                warn!(found_in = file.logical_name(), query = %text, "namespace query does not reference exactly one page; skipping");
                continue;
            }
            let namespace = matches[0].to_lowercase();
            let size = flat_sizes.get(&namespace).copied().unwrap_or(0);
            let external_url = index
                .by_name(&namespace)
                .first()
                .map(|f| classify::external_url(&f.path.path, graph_root, config))
                .unwrap_or_default();
            queries.push(NamespaceQuery {
                found_in: file.logical_name().to_string(),
                namespace,
                size,
                external_url,
            });
        }
    }
    queries.sort_by(|a, b| b.size.cmp(&a.size));

    NamespaceAnalysis {
        conflicts_non_namespace,
        conflicts_dangling,
        conflicts_parent_depth,
        conflicts_parent_depth_prefixes,
        tree,
        queries,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{NsFileFormat, DEFAULT_ASSETS_DIR, DEFAULT_DRAWS_DIR, DEFAULT_FILE_NAME_FORMAT, DEFAULT_JOURNALS_DIR, DEFAULT_PAGES_DIR, DEFAULT_PAGE_TITLE_FORMAT, DEFAULT_WHITEBOARDS_DIR};
    use crate::model::file::{LogseqFile, NodeState, PathInfo};
    use crate::model::info::{BulletInfo, NamespaceInfo, SizeInfo, TimestampInfo};
    use crate::model::{FeatureMap, FileType};
    use std::path::PathBuf;

    fn test_config(graph_dir: &Path) -> GraphConfig {
        GraphConfig {
            graph_dir: graph_dir.to_path_buf(),
            assets_dir: DEFAULT_ASSETS_DIR.to_string(),
            draws_dir: DEFAULT_DRAWS_DIR.to_string(),
            journals_dir: DEFAULT_JOURNALS_DIR.to_string(),
            pages_dir: DEFAULT_PAGES_DIR.to_string(),
            whiteboards_dir: DEFAULT_WHITEBOARDS_DIR.to_string(),
            ns_file_format: NsFileFormat::Legacy,
            journal_file_name_format: DEFAULT_FILE_NAME_FORMAT.to_string(),
            journal_page_title_format: DEFAULT_PAGE_TITLE_FORMAT.to_string(),
        }
    }

    fn file(name: &str, features: FeatureMap) -> LogseqFile {
        LogseqFile {
            path: PathInfo {
                path: PathBuf::from(format!("/g/pages/{name}.md")),
                parent_dir: "pages".to_string(),
                suffix: "md".to_string(),
                name: name.to_string(),
                file_type: FileType::Page,
                url: String::new(),
            },
            size: SizeInfo::new(10),
            timestamps: TimestampInfo::new(0, 0, 0),
            namespace: NamespaceInfo::from_logical_name(name, "/"),
            bullets: BulletInfo::default(),
            features,
            node: NodeState::default(),
            is_hls: false,
            hls_keys: Vec::new(),
            raw_text: None,
        }
    }

    #[test]
    fn non_namespace_conflict_scenario() {
        let mut index = FileIndex::new();
        index.insert(file("projects/apollo", FeatureMap::new()));
        index.insert(file("apollo", FeatureMap::new()));

        let analysis = analyze(&index, &[], Path::new("/g"), &test_config(Path::new("/g")));
        assert_eq!(analysis.conflicts_non_namespace.get("apollo"), Some(&vec!["projects/apollo".to_string()]));
    }

    #[test]
    fn parent_depth_conflict_scenario() {
        let mut index = FileIndex::new();
        index.insert(file("a/b", FeatureMap::new()));
        index.insert(file("x/a", FeatureMap::new()));

        let analysis = analyze(&index, &[], Path::new("/g"), &test_config(Path::new("/g")));
        let depths = analysis.conflicts_parent_depth.get("a").expect("part a should conflict");
        assert_eq!(depths.get(&1), Some(&vec!["a/b".to_string()]));
        assert_eq!(depths.get(&2), Some(&vec!["x/a".to_string()]));
        let prefixes = analysis.conflicts_parent_depth_prefixes.get("a").unwrap();
        assert!(prefixes[&1].contains("a"));
        assert!(prefixes[&2].contains("x/a"));
    }

    #[test]
    fn namespace_query_with_single_page_ref_is_recorded() {
        let mut index = FileIndex::new();
        index.insert(file("projects", FeatureMap::new()));
        let mut features = FeatureMap::new();
        features.insert(FeatureKey::NamespaceQueries, vec!["{{namespace [[projects]]}}".to_string()]);
        index.insert(file("overview", features));

        let analysis = analyze(&index, &[], Path::new("/g"), &test_config(Path::new("/g")));
        assert_eq!(analysis.queries.len(), 1);
        assert_eq!(analysis.queries[0].namespace, "projects");
        assert_eq!(analysis.queries[0].found_in, "overview");
    }

    #[test]
    fn namespace_query_with_two_page_refs_is_skipped() {
        let mut index = FileIndex::new();
        let mut features = FeatureMap::new();
        features.insert(FeatureKey::NamespaceQueries, vec!["{{namespace [[a]] [[b]]}}".to_string()]);
        index.insert(file("overview", features));

        let analysis = analyze(&index, &[], Path::new("/g"), &test_config(Path::new("/g")));
        assert!(analysis.queries.is_empty());
    }
}
