//! The CLI adapter (§1.1, §6): a minimal `clap`-derived surface exposing
//! exactly the configuration inputs this crate's core consumes. Unlike the
//! teacher's query-subcommand CLI, there is nothing to subcommand over —
//! one invocation runs the fixed five-pass pipeline and emits the fixed
//! report shape.

use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Parser)]
#[command(
    name = "logseq-analyzer",
    version,
    about = "Analyze a Logseq graph and emit a structured report",
    long_about = "Classifies every file in a Logseq graph, extracts cross-references, \
detects dangling and conflicting links, reconstructs the journal timeline, and \
identifies unreferenced assets."
)]
pub struct Cli {
    /// Path to the Logseq graph directory (must contain `logseq/config.edn`)
    #[arg(short, long, env = "LOGSEQ_ANALYZER_GRAPH_FOLDER", default_value = ".")]
    pub graph_folder: PathBuf,

    /// Optional EDN file whose keys override the graph's own `config.edn`
    #[arg(long, env = "LOGSEQ_ANALYZER_GLOBAL_CONFIG")]
    pub global_config: Option<PathBuf>,

    /// Invalidate the incremental cache before this run
    #[arg(long, env = "LOGSEQ_ANALYZER_GRAPH_CACHE", default_value_t = false)]
    pub graph_cache: bool,

    /// Ignore the on-disk cache for this run without deleting it (mirrors
    /// the teacher's `--no-cache`)
    #[arg(long, default_value_t = false)]
    pub no_cache: bool,

    /// Alias for `--graph-cache` (mirrors the teacher's `--rebuild`)
    #[arg(long, default_value_t = false)]
    pub rebuild: bool,

    /// Include the full per-file index in the report (raw text included)
    #[arg(long, default_value_t = false)]
    pub write_graph: bool,

    /// Compute (but do not execute) relocation of unreferenced assets
    #[arg(long, default_value_t = false)]
    pub move_unlinked_assets: bool,

    /// Compute relocation of `logseq/bak/` contents
    #[arg(long, default_value_t = false)]
    pub move_bak: bool,

    /// Compute relocation of `logseq/.recycle/` contents
    #[arg(long, default_value_t = false)]
    pub move_recycle: bool,

    /// Report output format. `json` is rendered natively; other formats are
    /// echoed in the report's meta section for an external serializer.
    #[arg(long, env = "LOGSEQ_ANALYZER_REPORT_FORMAT", value_parser = ["txt", "md", "json", "html"], default_value = "json")]
    pub report_format: String,

    /// Optional crate-level TOML config overriding built-in run defaults
    #[arg(long, env = "LOGSEQ_ANALYZER_CONFIG")]
    pub config: Option<PathBuf>,
}

#[must_use]
pub fn parse() -> Cli {
    Cli::parse()
}
