//! The run entry point (ADDED): wires the CLI adapter's flags into a
//! [`Config`], runs the pipeline, and prints the assembled report. Follows
//! the teacher's `run_cli(cli) -> i32` shape — `eprintln!` plus a nonzero
//! exit code on fatal failure, `0` on success, the report always printed
//! on stdout so it composes with shell redirection.

use tracing::error;

use crate::cli::Cli;
use crate::config::{Config, GraphConfig, ReportFormat};
use crate::patterns::Patterns;
use crate::pipeline;
use crate::report::NoOpFileMover;

fn parse_report_format(s: &str) -> ReportFormat {
    match s {
        "txt" => ReportFormat::Txt,
        "md" => ReportFormat::Md,
        "html" => ReportFormat::Html,
        _ => ReportFormat::Json,
    }
}

/// Runs the CLI logic in-process.
///
/// Returns an exit code (0 = success, 1 = fatal configuration error, 2 =
/// report serialization failure).
#[must_use]
pub fn run_cli(cli: Cli) -> i32 {
    let graph_cfg = match GraphConfig::load(&cli.graph_folder, cli.global_config.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!(error = %e, "fatal configuration error");
            eprintln!("{e}");
            return 1;
        }
    };

    let defaults = cli
        .config
        .as_deref()
        .and_then(crate::config::load_run_defaults_at)
        .or_else(|| crate::config::load_run_defaults_near(&cli.graph_folder))
        .unwrap_or_default();

    let config = Config {
        graph: graph_cfg,
        // `no_cache`/`rebuild` both fold into the same "start this run from a
        // clean cache" request the teacher's two flags express; this crate's
        // `Cache` has no separate "read but don't persist" mode to target.
        graph_cache: cli.graph_cache || cli.rebuild || cli.no_cache || defaults.graph_cache.unwrap_or(false),
        write_graph: cli.write_graph || defaults.write_graph.unwrap_or(false),
        report_format: if cli.report_format == "json" {
            defaults.report_format.unwrap_or(ReportFormat::Json)
        } else {
            parse_report_format(&cli.report_format)
        },
        move_unlinked_assets: cli.move_unlinked_assets || defaults.move_unlinked_assets.unwrap_or(false),
        move_bak: cli.move_bak || defaults.move_bak.unwrap_or(false),
        move_recycle: cli.move_recycle || defaults.move_recycle.unwrap_or(false),
    };

    let patterns = Patterns::compile();
    let report = pipeline::run(&cli.graph_folder, &config, &patterns, &NoOpFileMover);

    match serde_json::to_string_pretty(&report) {
        Ok(json) => {
            println!("{json}");
            0
        }
        Err(e) => {
            error!(error = %e, "failed to serialize report");
            eprintln!("failed to serialize report: {e}");
            2
        }
    }
}
