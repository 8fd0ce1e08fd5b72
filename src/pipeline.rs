//! Orchestration (§2's data-flow, §5's concurrency model): wires components
//! A-L into the fixed five-pass analysis run a single CLI invocation
//! performs. Not itself a spec'd component — it is the sequencing this
//! crate's `app` entry point delegates to.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

use rayon::prelude::*;
use tracing::{debug, info_span, warn};

use crate::asset;
use crate::bullets;
use crate::cache::{self, Cache};
use crate::classify;
use crate::config::{Config, GraphConfig, HLS_PREFIX};
use crate::errors::{AnalyzerError, ParseError};
use crate::extractor;
use crate::graph::{self, GraphAnalysis};
use crate::journal::{self, JournalTimeline};
use crate::model::file::{LogseqFile, NodeState, PathInfo};
use crate::model::info::{NamespaceInfo, SizeInfo, TimestampInfo};
use crate::model::index::FileIndex;
use crate::model::FileType;
use crate::namespace::{self, NamespaceAnalysis};
use crate::patterns::Patterns;
use crate::report::{self, FileMover, Report};

/// Everything a completed run produced, before report assembly wraps it into
/// the serializable payload.
pub struct AnalysisOutcome {
    pub index: FileIndex,
    pub graph: GraphAnalysis,
    pub namespaces: NamespaceAnalysis,
    pub journals: JournalTimeline,
    pub unreferenced_assets: Vec<String>,
    pub unreferenced_hls_assets: Vec<String>,
}

fn epoch_secs(time: std::io::Result<std::time::SystemTime>) -> i64 {
    time.ok()
        .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
        .map_or(0, |d| d.as_secs() as i64)
}

fn now_secs() -> i64 {
    epoch_secs(Ok(std::time::SystemTime::now()))
}

/// Parses, classifies, and extracts a single file. Returns `None` (logged at
/// `warn!`, §7's `FileReadError`) rather than aborting the run — a single
/// unreadable file never takes down an entire analysis.
fn build_file(
    path: &Path,
    graph_cfg: &GraphConfig,
    graph_dir: &Path,
    patterns: &Patterns,
    keep_raw_text: bool,
) -> Option<LogseqFile> {
    let text = match fs::read_to_string(path) {
        Ok(t) => t,
        Err(e) => {
            // §7's FileReadError: a single unreadable or non-UTF-8 file is
            // recorded as zero-content and the run continues.
            let source = if e.kind() == std::io::ErrorKind::InvalidData {
                ParseError::InvalidUtf8 { file: path.to_path_buf() }
            } else {
                ParseError::Io(e)
            };
            let err = AnalyzerError::ParseError { file: path.to_path_buf(), source };
            warn!(path = %path.display(), error = %err, "file unreadable; skipping");
            return None;
        }
    };
    let metadata = match fs::metadata(path) {
        Ok(m) => m,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "could not stat file; skipping");
            return None;
        }
    };

    let file_type = classify::classify_file_type(path, graph_cfg);
    let name = classify::logical_name(path, file_type, graph_cfg);
    let url = classify::external_url(path, graph_dir, graph_cfg);
    let parent_dir = path
        .parent()
        .and_then(|p| p.file_name())
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    let suffix = path.extension().map(|s| s.to_string_lossy().to_string()).unwrap_or_default();

    let size = SizeInfo::new(metadata.len());
    let now = now_secs();
    let timestamps =
        TimestampInfo::new(epoch_secs(metadata.created()), epoch_secs(metadata.modified()), now);
    let namespace = NamespaceInfo::from_logical_name(&name, graph_cfg.ns_file_sep());
    let seg = bullets::segment(&text);
    let features = if size.has_content { extractor::extract(&text, patterns) } else { Default::default() };

    let stem = path.file_stem().map(|s| s.to_string_lossy().to_lowercase()).unwrap_or_default();
    let is_hls = stem.starts_with(HLS_PREFIX);
    let hls_keys = if is_hls { asset::extract_hls_keys(&text) } else { Vec::new() };

    let mut file = LogseqFile {
        path: PathInfo { path: path.to_path_buf(), parent_dir, suffix, name, file_type, url },
        size,
        timestamps,
        namespace,
        bullets: seg.info,
        features,
        node: NodeState::default(),
        is_hls,
        hls_keys,
        raw_text: if keep_raw_text { Some(text) } else { None },
    };
    file.node.has_backlinks = file.compute_has_backlinks();
    Some(file)
}

/// Runs the complete pipeline over one graph directory: cache sync, parallel
/// per-file extraction, then the sequential F-I passes.
pub fn analyze(graph_dir: &Path, config: &Config, patterns: &Patterns) -> AnalysisOutcome {
    if config.graph_cache {
        Cache::clear(graph_dir);
    }

    let mut cache = {
        let _span = info_span!("cache_load").entered();
        Cache::load(graph_dir).unwrap_or_default()
    };
    let mut index = cache.to_file_index();

    let changed: Vec<PathBuf> = {
        let _span = info_span!("cache_scan").entered();
        cache::modified_paths(graph_dir, &config.graph, &mut cache)
    };

    let extracted: Vec<LogseqFile> = {
        let _span = info_span!("extract", files = changed.len()).entered();
        changed
            .into_par_iter()
            .filter_map(|path| build_file(&path, &config.graph, graph_dir, patterns, config.write_graph))
            .collect()
    };

    {
        let _span = info_span!("merge", files = extracted.len()).entered();
        for file in extracted {
            index.remove_by_path(&file.path.path);
            index.insert(file);
        }
    }

    let analysis = {
        let _span = info_span!("graph_pass").entered();
        graph::analyze(&mut index)
    };

    let namespaces = {
        let _span = info_span!("namespace_pass").entered();
        namespace::analyze(&index, &analysis.dangling_links, graph_dir, &config.graph)
    };

    let journals = {
        let _span = info_span!("journal_pass").entered();
        let existing_dates = index
            .iter()
            .filter(|f| matches!(f.file_type(), FileType::Journal | FileType::SubJournal))
            .filter_map(|f| {
                let parsed = journal::parse_journal_key(f.logical_name(), &config.graph.journal_page_title_format);
                if parsed.is_none() {
                    debug!(name = f.logical_name(), "journal name does not match page-title format");
                }
                parsed
            })
            .collect();
        let dangling_dates: Vec<_> = analysis
            .dangling_links
            .iter()
            .filter_map(|(name, _)| journal::parse_journal_key(name, &config.graph.journal_page_title_format))
            .collect();
        journal::build_timeline(existing_dates, &dangling_dates)
    };

    {
        let _span = info_span!("asset_pass").entered();
        asset::analyze(&mut index);
    }
    let unreferenced_assets = asset::unreferenced_assets(&index);
    let unreferenced_hls_assets = asset::unreferenced_hls_assets(&index);

    let mtimes = cache.mtimes.clone();
    Cache::from_index(&index, mtimes).save(graph_dir);

    AnalysisOutcome { index, graph: analysis, namespaces, journals, unreferenced_assets, unreferenced_hls_assets }
}

/// Runs the pipeline and assembles the final [`Report`] (§4.L).
#[must_use]
pub fn run(graph_dir: &Path, config: &Config, patterns: &Patterns, mover: &dyn FileMover) -> Report {
    let outcome = analyze(graph_dir, config, patterns);
    report::assemble(
        &outcome.index,
        &outcome.graph,
        outcome.namespaces,
        outcome.journals,
        &outcome.unreferenced_assets,
        &outcome.unreferenced_hls_assets,
        graph_dir,
        config,
        mover,
    )
}
