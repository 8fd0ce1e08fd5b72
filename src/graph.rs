//! The graph analyzer (§4.F): builds the global linked-reference table,
//! backfills namespace children, classifies every journal/page node, and
//! computes the dangling-links set.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::config::builtin_properties;
use crate::model::index::FileIndex;
use crate::model::{FeatureKey, FileType, NodeType};

/// One reference's tally: how many times it was linked, and from which
/// files (a multiset — a file that references the same name twice appears
/// twice).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RefEntry {
    pub count: usize,
    pub found_in: Vec<String>,
}

pub type LinkedReferenceTable = BTreeMap<String, RefEntry>;

/// Output of a full graph-analysis pass over a [`FileIndex`] (the index
/// itself is mutated in place with each file's [`crate::model::file::NodeState`]).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphAnalysis {
    pub references: LinkedReferenceTable,
    /// Lowercased names linked somewhere in the graph that no file's logical
    /// name, alias, or namespace aggregate resolves to. Sorted by reference
    /// count descending, then name, for a stable report ordering.
    pub dangling_links: Vec<(String, usize)>,
}

/// Runs the four-pass algorithm described in §4.F over every file already in
/// `index`, mutating each journal/page file's [`crate::model::file::NodeState`]
/// and namespace children along the way.
#[must_use]
pub fn analyze(index: &mut FileIndex) -> GraphAnalysis {
    let (table, unique_aliases, unique_linked_refs_ns) = collect_references(index);
    backfill_namespace_children(index);
    classify_nodes(index, &table, &unique_linked_refs_ns);
    let dangling_links = compute_dangling_links(index, &table, &unique_aliases, &unique_linked_refs_ns);

    GraphAnalysis { references: table, dangling_links }
}

/// Pass 1: fold every `counts_as_reference` category (plus, for namespace
/// files, the `parent_full` ancestor per the `parent_full` Open Question
/// decision) into the global table.
fn collect_references(index: &FileIndex) -> (LinkedReferenceTable, HashSet<String>, HashSet<String>) {
    let mut table: LinkedReferenceTable = LinkedReferenceTable::new();
    let mut unique_aliases: HashSet<String> = HashSet::new();
    let mut unique_linked_refs_ns: HashSet<String> = HashSet::new();

    let mut record = |key: &str, found_in: &str| {
        let entry = table.entry(key.to_string()).or_default();
        entry.count += 1;
        entry.found_in.push(found_in.to_string());
    };

    for file in index.iter() {
        let name = file.logical_name();
        for key in FeatureKey::ALL.iter().filter(|k| k.counts_as_reference()) {
            for value in file.feature(*key) {
                let lower = value.to_lowercase();
                record(&lower, name);
                if *key == FeatureKey::Aliases {
                    unique_aliases.insert(lower);
                }
            }
        }
        if file.namespace.is_namespace {
            record(&file.namespace.parent_full.to_lowercase(), name);
            unique_linked_refs_ns.insert(file.namespace.root.to_lowercase());
            unique_linked_refs_ns.insert(name.to_lowercase());
        }
    }

    (table, unique_aliases, unique_linked_refs_ns)
}

/// Pass 2: every namespace file registers itself as a child of its root and
/// of its immediate `parent_full`, for every file in the index whose logical
/// name matches either (there may be more than one, or none).
fn backfill_namespace_children(index: &mut FileIndex) {
    let namespace_files: Vec<(String, String, String)> = index
        .iter()
        .filter(|f| f.namespace.is_namespace)
        .map(|f| (f.logical_name().to_string(), f.namespace.root.clone(), f.namespace.parent_full.clone()))
        .collect();

    for (name, root, parent_full) in namespace_files {
        for target in [root, parent_full] {
            if target.is_empty() {
                continue;
            }
            for id in index.ids_by_name(&target) {
                if let Some(ancestor) = index.by_identity_mut(id) {
                    if ancestor.logical_name() != name {
                        ancestor.namespace.children.insert(name.clone());
                    }
                }
            }
        }
    }
}

/// Pass 3: classify every journal/page file's node using the §4.F truth
/// table over `(has_content, has_backlinks, backlinked, backlinked_ns_only)`.
///
/// A name is consumed from a working copy of each reference set on its
/// first successful match, so that two files sharing the same logical name
/// (collisions coexist, per [`FileIndex`]) don't both get marked
/// `backlinked` from the same single reference — only the first consumes
/// it; the rest fall through to the namespace-only or dangling/orphan path.
fn classify_nodes(index: &mut FileIndex, table: &LinkedReferenceTable, unique_linked_refs_ns: &HashSet<String>) {
    let mut referenced_names: HashSet<String> = table.keys().cloned().collect();
    let mut ns_only_names: HashSet<String> = unique_linked_refs_ns.clone();

    let ids: Vec<_> = index.ids().collect();
    for id in ids {
        let Some(file) = index.by_identity(id) else { continue };
        if !file.file_type().is_journal_or_page() {
            continue;
        }
        let name_lower = file.logical_name().to_lowercase();
        let has_content = file.size.has_content;
        let has_backlinks = file.compute_has_backlinks();
        let referenced = referenced_names.remove(&name_lower);
        let ns_only = !referenced && ns_only_names.remove(&name_lower);
        let node_type = classify_node(has_content, has_backlinks, referenced, ns_only);

        if let Some(file) = index.by_identity_mut(id) {
            file.node.has_backlinks = has_backlinks;
            if referenced {
                file.node.set_backlinked();
            } else if ns_only {
                file.node.set_backlinked_ns_only();
            }
            file.node.node_type = node_type;
        }
    }
}

/// §4.F's node-classification truth table.
fn classify_node(has_content: bool, has_backlinks: bool, backlinked: bool, ns_only: bool) -> NodeType {
    match (has_content, has_backlinks, backlinked, ns_only) {
        (true, true, true, _) => NodeType::Branch,
        (true, true, false, true) => NodeType::Branch,
        (true, true, false, false) => NodeType::Root,
        (true, false, true, _) => NodeType::Leaf,
        (true, false, false, true) => NodeType::OrphanNamespace,
        (true, false, false, false) => NodeType::OrphanGraph,
        (false, false, true, _) => NodeType::Leaf,
        (false, false, false, true) => NodeType::OrphanNamespaceTrue,
        (false, false, false, false) => NodeType::OrphanTrue,
        _ => NodeType::Other,
    }
}

/// Pass 4: `(unique_linked_refs ∪ unique_linked_refs_ns) - file names -
/// aliases - built-in property names`, sorted by reference count descending.
fn compute_dangling_links(
    index: &FileIndex,
    table: &LinkedReferenceTable,
    unique_aliases: &HashSet<String>,
    unique_linked_refs_ns: &HashSet<String>,
) -> Vec<(String, usize)> {
    let all_names: HashSet<String> = index.iter().map(|f| f.logical_name().to_lowercase()).collect();

    let mut dangling: HashSet<String> = table.keys().cloned().collect();
    dangling.extend(unique_linked_refs_ns.iter().cloned());
    dangling.retain(|name| !all_names.contains(name) && !unique_aliases.contains(name) && !builtin_properties::is_builtin(name));

    let mut list: Vec<(String, usize)> =
        dangling.into_iter().map(|name| { let count = table.get(&name).map_or(0, |e| e.count); (name, count) }).collect();
    list.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    list
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::file::{NodeState, PathInfo};
    use crate::model::info::{BulletInfo, NamespaceInfo, SizeInfo, TimestampInfo};
    use crate::model::FeatureMap;
    use std::path::PathBuf;

    fn file(name: &str, file_type: FileType, features: FeatureMap, has_content: bool) -> crate::model::file::LogseqFile {
        crate::model::file::LogseqFile {
            path: PathInfo {
                path: PathBuf::from(format!("/g/pages/{name}.md")),
                parent_dir: "pages".to_string(),
                suffix: "md".to_string(),
                name: name.to_string(),
                file_type,
                url: String::new(),
            },
            size: SizeInfo::new(if has_content { 10 } else { 0 }),
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
    fn referenced_page_is_branch_when_it_also_links_out() {
        let mut index = FileIndex::new();
        let mut out_refs = FeatureMap::new();
        out_refs.insert(FeatureKey::PageReferences, vec!["apollo".to_string()]);
        index.insert(file("launch", FileType::Page, out_refs, true));
        index.insert(file("apollo", FileType::Page, FeatureMap::new(), true));

        let analysis = analyze(&mut index);
        assert!(analysis.dangling_links.is_empty());
        let apollo = index.by_name("apollo")[0];
        assert!(apollo.node.backlinked);
        assert_eq!(apollo.node.node_type, NodeType::Leaf);
    }

    #[test]
    fn unresolved_reference_is_dangling() {
        let mut index = FileIndex::new();
        let mut out_refs = FeatureMap::new();
        out_refs.insert(FeatureKey::PageReferences, vec!["missing page".to_string()]);
        index.insert(file("launch", FileType::Page, out_refs, true));

        let analysis = analyze(&mut index);
        assert_eq!(analysis.dangling_links, vec![("missing page".to_string(), 1)]);
    }

    #[test]
    fn unreferenced_empty_page_is_orphan_true() {
        let mut index = FileIndex::new();
        index.insert(file("blank", FileType::Page, FeatureMap::new(), false));

        let analysis = analyze(&mut index);
        assert!(analysis.dangling_links.is_empty());
        let blank = index.by_name("blank")[0];
        assert_eq!(blank.node.node_type, NodeType::OrphanTrue);
    }

    #[test]
    fn namespace_child_is_reachable_via_ns_only_backlink() {
        let mut index = FileIndex::new();
        index.insert(file("projects", FileType::Page, FeatureMap::new(), true));
        index.insert(file("projects/apollo", FileType::Page, FeatureMap::new(), true));

        let analysis = analyze(&mut index);
        assert!(analysis.dangling_links.is_empty());
        let root = index.by_name("projects")[0];
        assert!(root.namespace.children.contains("projects/apollo"));
        let child = index.by_name("projects/apollo")[0];
        assert!(child.node.backlinked_ns_only);
        assert_eq!(child.node.node_type, NodeType::OrphanNamespace);
    }

    #[test]
    fn a_single_reference_to_a_duplicated_name_backlinks_only_one_file() {
        let mut index = FileIndex::new();
        let mut out_refs = FeatureMap::new();
        out_refs.insert(FeatureKey::PageReferences, vec!["apollo".to_string()]);
        index.insert(file("launch", FileType::Page, out_refs, true));
        index.insert(file("apollo", FileType::Page, FeatureMap::new(), true));
        index.insert(file("apollo", FileType::Page, FeatureMap::new(), true));

        analyze(&mut index);
        let apollos = index.by_name("apollo");
        assert_eq!(apollos.len(), 2);
        let backlinked_count = apollos.iter().filter(|f| f.node.backlinked).count();
        assert_eq!(backlinked_count, 1, "only the first-matched duplicate should consume the single reference");
        assert!(apollos.iter().any(|f| f.node.node_type == NodeType::OrphanGraph));
    }
}
