//! Report assembly (§4.L): collects components F-J's outputs into the named
//! section set §6 describes, independent of final byte format. Rendering to
//! txt/md/html is an external serializer's job; this crate only emits its
//! own `json` natively (§1.1, §9's decided open question).

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;
use walkdir::WalkDir;

use crate::config::Config;
use crate::graph::{GraphAnalysis, LinkedReferenceTable};
use crate::journal::JournalTimeline;
use crate::model::file::{LogseqFile, NodeState};
use crate::model::index::FileIndex;
use crate::model::{FeatureKey, FileType, NodeType};
use crate::namespace::NamespaceAnalysis;

/// A single relocation the report has computed but not executed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovePlan {
    pub from: PathBuf,
    pub to: PathBuf,
    pub reason: String,
}

/// The out-of-scope collaborator for filesystem relocation (§1.L, GLOSSARY).
/// This crate computes *which* paths would move; a real mover that relocates
/// them on disk is an external adapter's job.
pub trait FileMover {
    fn plan(&self, candidates: &[PathBuf], reason: &str) -> Vec<MovePlan>;
}

/// Reference implementation used by this crate's own tests: logs the plan
/// and otherwise does nothing. `to` mirrors `from` since this mover never
/// actually relocates anything.
#[derive(Debug, Default)]
pub struct NoOpFileMover;

impl FileMover for NoOpFileMover {
    fn plan(&self, candidates: &[PathBuf], reason: &str) -> Vec<MovePlan> {
        candidates
            .iter()
            .map(|path| {
                info!(path = %path.display(), reason, "would move (no-op mover)");
                MovePlan { from: path.clone(), to: path.clone(), reason: reason.to_string() }
            })
            .collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMeta {
    pub graph_dir: PathBuf,
    pub file_count: usize,
    pub report_format: crate::config::ReportFormat,
    pub write_graph: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphSection {
    pub references: LinkedReferenceTable,
    pub dangling_links: Vec<(String, usize)>,
    pub node_states: BTreeMap<String, NodeState>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SummaryContentInfo {
    pub total_chars: usize,
    pub total_bullets: usize,
    pub total_empty_bullets: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SummaryFilesGeneral {
    pub total_files: usize,
    pub total_size: u64,
    pub has_content_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub meta: ReportMeta,
    pub graph: GraphSection,
    pub namespaces: NamespaceAnalysis,
    pub journals: JournalTimeline,
    pub moved_files: Vec<PathBuf>,
    pub moved_files_assets: Vec<String>,
    pub moved_files_hls_assets: Vec<String>,
    pub summary_content: BTreeMap<FeatureKey, usize>,
    pub summary_content_info: SummaryContentInfo,
    pub summary_files_general: SummaryFilesGeneral,
    pub summary_files_file_types: BTreeMap<FileType, usize>,
    pub summary_files_node_types: BTreeMap<NodeType, usize>,
    pub summary_files_extensions: BTreeMap<String, usize>,
    pub index: Option<Vec<LogseqFile>>,
}

fn summary_content(index: &FileIndex) -> BTreeMap<FeatureKey, usize> {
    let mut out = BTreeMap::new();
    for key in FeatureKey::ALL {
        let count: usize = index.iter().map(|f| f.feature(*key).len()).sum();
        if count > 0 {
            out.insert(*key, count);
        }
    }
    out
}

fn summary_content_info(index: &FileIndex) -> SummaryContentInfo {
    let mut info = SummaryContentInfo::default();
    for f in index.iter() {
        info.total_chars += f.bullets.chars;
        info.total_bullets += f.bullets.bullets;
        info.total_empty_bullets += f.bullets.empty_bullets;
    }
    info
}

fn summary_files_general(index: &FileIndex) -> SummaryFilesGeneral {
    let mut out = SummaryFilesGeneral { total_files: index.len(), ..Default::default() };
    for f in index.iter() {
        out.total_size += f.size.size;
        if f.size.has_content {
            out.has_content_count += 1;
        }
    }
    out
}

fn tally<K: Ord + Copy, I: Iterator<Item = K>>(keys: I) -> BTreeMap<K, usize> {
    let mut out = BTreeMap::new();
    for key in keys {
        *out.entry(key).or_insert(0) += 1;
    }
    out
}

/// Collects bak/.recycle candidates from the graph's `logseq/` housekeeping
/// directories when the corresponding mover flag is set.
fn housekeeping_candidates(graph_dir: &Path, dir_name: &str) -> Vec<PathBuf> {
    let root = graph_dir.join(crate::config::LOGSEQ_DIR).join(dir_name);
    if !root.is_dir() {
        return Vec::new();
    }
    WalkDir::new(root)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .map(|e| e.path().to_path_buf())
        .collect()
}

/// Assembles the final `Report` from every upstream component's output.
#[must_use]
pub fn assemble(
    index: &FileIndex,
    graph: &GraphAnalysis,
    namespaces: NamespaceAnalysis,
    journals: JournalTimeline,
    unreferenced_assets: &[String],
    unreferenced_hls_assets: &[String],
    graph_dir: &Path,
    config: &Config,
    mover: &dyn FileMover,
) -> Report {
    let node_states: BTreeMap<String, NodeState> =
        index.iter().map(|f| (f.logical_name().to_string(), f.node.clone())).collect();

    let mut moved_files = Vec::new();
    if config.move_bak {
        let candidates = housekeeping_candidates(graph_dir, crate::config::BAK_DIR);
        moved_files.extend(mover.plan(&candidates, "move_bak").into_iter().map(|p| p.from));
    }
    if config.move_recycle {
        let candidates = housekeeping_candidates(graph_dir, crate::config::RECYCLE_DIR);
        moved_files.extend(mover.plan(&candidates, "move_recycle").into_iter().map(|p| p.from));
    }

    let moved_files_assets = if config.move_unlinked_assets {
        unreferenced_assets.to_vec()
    } else {
        Vec::new()
    };
    let moved_files_hls_assets = if config.move_unlinked_assets {
        unreferenced_hls_assets.to_vec()
    } else {
        Vec::new()
    };

    Report {
        meta: ReportMeta {
            graph_dir: graph_dir.to_path_buf(),
            file_count: index.len(),
            report_format: config.report_format,
            write_graph: config.write_graph,
        },
        graph: GraphSection {
            references: graph.references.clone(),
            dangling_links: graph.dangling_links.clone(),
            node_states,
        },
        namespaces,
        journals,
        moved_files,
        moved_files_assets,
        moved_files_hls_assets,
        summary_content: summary_content(index),
        summary_content_info: summary_content_info(index),
        summary_files_general: summary_files_general(index),
        summary_files_file_types: tally(index.iter().map(crate::model::file::LogseqFile::file_type)),
        summary_files_node_types: tally(index.iter().map(|f| f.node.node_type)),
        summary_files_extensions: tally_extensions(index),
        index: if config.write_graph { Some(index.iter().cloned().collect()) } else { None },
    }
}

fn tally_extensions(index: &FileIndex) -> BTreeMap<String, usize> {
    let mut out = BTreeMap::new();
    for f in index.iter() {
        *out.entry(f.path.suffix.clone()).or_insert(0) += 1;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{GraphConfig, NsFileFormat, ReportFormat};
    use crate::graph;
    use crate::model::file::PathInfo;
    use crate::model::info::{BulletInfo, NamespaceInfo, SizeInfo, TimestampInfo};
    use crate::model::FeatureMap;
    use std::path::PathBuf;

    fn test_config(graph_dir: &Path) -> Config {
        Config {
            graph: GraphConfig {
                graph_dir: graph_dir.to_path_buf(),
                assets_dir: "assets".to_string(),
                draws_dir: "draws".to_string(),
                journals_dir: "journals".to_string(),
                pages_dir: "pages".to_string(),
                whiteboards_dir: "whiteboards".to_string(),
                ns_file_format: NsFileFormat::Legacy,
                journal_file_name_format: "yyyy_MM_dd".to_string(),
                journal_page_title_format: "MMM do, yyyy".to_string(),
            },
            graph_cache: false,
            write_graph: false,
            report_format: ReportFormat::Json,
            move_unlinked_assets: true,
            move_bak: false,
            move_recycle: false,
        }
    }

    fn file(name: &str) -> LogseqFile {
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
            bullets: BulletInfo::new(10, 1, 0),
            features: FeatureMap::new(),
            node: crate::model::file::NodeState::default(),
            is_hls: false,
            hls_keys: Vec::new(),
            raw_text: None,
        }
    }

    #[test]
    fn assembled_report_omits_index_unless_write_graph_is_set() {
        let mut index = FileIndex::new();
        index.insert(file("apollo"));
        let analysis = graph::analyze(&mut index);
        let namespaces = crate::namespace::analyze(&index, &analysis.dangling_links, Path::new("/g"), &test_config(Path::new("/g")).graph);
        let journals = crate::journal::build_timeline(vec![], &[]);
        let config = test_config(Path::new("/g"));
        let report = assemble(&index, &analysis, namespaces, journals, &[], &[], Path::new("/g"), &config, &NoOpFileMover);
        assert!(report.index.is_none());
        assert_eq!(report.summary_files_general.total_files, 1);
    }

    #[test]
    fn move_unlinked_assets_flag_populates_moved_files_assets() {
        let mut index = FileIndex::new();
        index.insert(file("apollo"));
        let analysis = graph::analyze(&mut index);
        let namespaces = crate::namespace::analyze(&index, &analysis.dangling_links, Path::new("/g"), &test_config(Path::new("/g")).graph);
        let journals = crate::journal::build_timeline(vec![], &[]);
        let config = test_config(Path::new("/g"));
        let report = assemble(
            &index,
            &analysis,
            namespaces,
            journals,
            &["unused.png".to_string()],
            &[],
            Path::new("/g"),
            &config,
            &NoOpFileMover,
        );
        assert_eq!(report.moved_files_assets, vec!["unused.png".to_string()]);
    }
}
