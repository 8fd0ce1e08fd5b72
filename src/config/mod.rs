//! Two configuration layers, kept distinct per the "scoped configuration"
//! design note: the graph's own `config.edn` (merged with an optional global
//! override) produces [`GraphConfig`]; an optional crate-level TOML file
//! produces [`RunDefaults`], the run-level defaults a CLI adapter's explicit
//! flags can override.

pub mod builtin_properties;
pub mod edn;

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::warn;

use crate::errors::AnalyzerError;
use edn::EdnValue;

pub const DEFAULT_ASSETS_DIR: &str = "assets";
pub const DEFAULT_DRAWS_DIR: &str = "draws";
pub const DEFAULT_JOURNALS_DIR: &str = "journals";
pub const DEFAULT_PAGES_DIR: &str = "pages";
pub const DEFAULT_WHITEBOARDS_DIR: &str = "whiteboards";
pub const DEFAULT_FILE_NAME_FORMAT: &str = "yyyy_MM_dd";
pub const DEFAULT_PAGE_TITLE_FORMAT: &str = "MMM do, yyyy";

pub const NS_FILE_SEP_LEGACY: &str = "%2F";
pub const NS_FILE_SEP_TRIPLE_LOWBAR: &str = "___";
pub const NS_SEP: &str = "/";
pub const HLS_PREFIX: &str = "hls__";
pub const LOGSEQ_DIR: &str = "logseq";
pub const CONFIG_EDN_FILE: &str = "config.edn";
pub const BAK_DIR: &str = "bak";
pub const RECYCLE_DIR: &str = ".recycle";

/// `:file/name-format` source flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum NsFileFormat {
    Legacy,
    TripleLowbar,
}

impl NsFileFormat {
    #[must_use]
    pub fn separator(self) -> &'static str {
        match self {
            NsFileFormat::Legacy => NS_FILE_SEP_LEGACY,
            NsFileFormat::TripleLowbar => NS_FILE_SEP_TRIPLE_LOWBAR,
        }
    }

    fn from_edn_value(v: &str) -> Self {
        if v == ":triple-lowbar" {
            NsFileFormat::TripleLowbar
        } else {
            NsFileFormat::Legacy
        }
    }
}

/// Merged view of the graph's own configuration: target directory names, the
/// namespace separator, and the two journal date formats. Built once per run
/// and passed by reference into every component that needs it.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct GraphConfig {
    pub graph_dir: PathBuf,
    pub assets_dir: String,
    pub draws_dir: String,
    pub journals_dir: String,
    pub pages_dir: String,
    pub whiteboards_dir: String,
    pub ns_file_format: NsFileFormat,
    pub journal_file_name_format: String,
    pub journal_page_title_format: String,
}

impl GraphConfig {
    /// Load and merge `<graph>/logseq/config.edn`, an optional global EDN
    /// override, and the hard-coded Logseq defaults.
    ///
    /// # Errors
    /// Returns [`AnalyzerError::ConfigMissing`] if the graph folder, its
    /// `logseq/` directory, or `config.edn` does not exist.
    pub fn load(graph_dir: &Path, global_config: Option<&Path>) -> Result<Self, AnalyzerError> {
        if !graph_dir.is_dir() {
            return Err(AnalyzerError::ConfigMissing { path: graph_dir.to_path_buf() });
        }
        let logseq_dir = graph_dir.join(LOGSEQ_DIR);
        if !logseq_dir.is_dir() {
            return Err(AnalyzerError::ConfigMissing { path: logseq_dir });
        }
        let config_edn_path = logseq_dir.join(CONFIG_EDN_FILE);
        if !config_edn_path.is_file() {
            return Err(AnalyzerError::ConfigMissing { path: config_edn_path });
        }

        let mut merged = std::collections::BTreeMap::new();
        let graph_text = fs::read_to_string(&config_edn_path)
            .map_err(|e| AnalyzerError::Io(e))?;
        if let Ok(EdnValue::Map(m)) = edn::loads(&graph_text) {
            merged.extend(m);
        } else {
            warn!("failed to parse {}; using Logseq defaults", config_edn_path.display());
        }

        if let Some(global_path) = global_config {
            match fs::read_to_string(global_path) {
                Ok(text) => match edn::loads(&text) {
                    Ok(EdnValue::Map(m)) => merged.extend(m),
                    Ok(_) => {
                        warn!("global config at {} did not parse to a map; falling back to graph-local config", global_path.display());
                    }
                    Err(source) => {
                        let err = AnalyzerError::ConfigParseWarning { path: global_path.to_path_buf(), source };
                        warn!(error = %err, "falling back to graph-local config");
                    }
                },
                Err(e) => {
                    warn!("could not read global config at {}: {e}", global_path.display());
                }
            }
        }

        let get_str = |key: &str, default: &str| -> String {
            merged.get(key).and_then(EdnValue::as_str).map_or_else(|| default.to_string(), ToString::to_string)
        };

        let ns_file_format = merged
            .get(":file/name-format")
            .and_then(EdnValue::as_str)
            .map_or(NsFileFormat::Legacy, NsFileFormat::from_edn_value);

        Ok(Self {
            graph_dir: graph_dir.to_path_buf(),
            assets_dir: DEFAULT_ASSETS_DIR.to_string(),
            draws_dir: DEFAULT_DRAWS_DIR.to_string(),
            journals_dir: get_str(":journals-directory", DEFAULT_JOURNALS_DIR),
            pages_dir: get_str(":pages-directory", DEFAULT_PAGES_DIR),
            whiteboards_dir: get_str(":whiteboards-directory", DEFAULT_WHITEBOARDS_DIR),
            ns_file_format,
            journal_file_name_format: get_str(":journal/file-name-format", DEFAULT_FILE_NAME_FORMAT),
            journal_page_title_format: get_str(":journal/page-title-format", DEFAULT_PAGE_TITLE_FORMAT),
        })
    }

    #[must_use]
    pub fn ns_file_sep(&self) -> &'static str {
        self.ns_file_format.separator()
    }

    #[must_use]
    pub fn target_dir_names(&self) -> [&str; 5] {
        [
            self.assets_dir.as_str(),
            self.draws_dir.as_str(),
            self.journals_dir.as_str(),
            self.pages_dir.as_str(),
            self.whiteboards_dir.as_str(),
        ]
    }
}

/// Report format requested for a run. `Json` is natively rendered by this
/// crate; the others are recognized and threaded through to the report's
/// meta section but rendered by an external serializer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    Txt,
    Md,
    #[default]
    Json,
    Html,
}

/// Run-level defaults, loadable from an optional crate-level TOML file,
/// following the teacher's `utils::config` load-near/load-at pattern.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RunDefaults {
    pub graph_cache: Option<bool>,
    pub write_graph: Option<bool>,
    pub report_format: Option<ReportFormat>,
    pub move_unlinked_assets: Option<bool>,
    pub move_bak: Option<bool>,
    pub move_recycle: Option<bool>,
}

fn default_config_path(root: &Path) -> PathBuf {
    root.join("logseq-analyzer-rs.toml")
}

#[must_use]
pub fn load_run_defaults_at(path: &Path) -> Option<RunDefaults> {
    let data = fs::read_to_string(path).ok()?;
    toml::from_str::<RunDefaults>(&data).ok()
}

#[must_use]
pub fn load_run_defaults_near(root: &Path) -> Option<RunDefaults> {
    let path = default_config_path(root);
    if path.exists() {
        load_run_defaults_at(&path)
    } else {
        None
    }
}

/// The full merged configuration view passed through the analysis pipeline.
#[derive(Debug, Clone)]
pub struct Config {
    pub graph: GraphConfig,
    pub graph_cache: bool,
    pub write_graph: bool,
    pub report_format: ReportFormat,
    pub move_unlinked_assets: bool,
    pub move_bak: bool,
    pub move_recycle: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    fn write_graph_skeleton(dir: &Path, config_edn: &str) {
        let logseq_dir = dir.join(LOGSEQ_DIR);
        fs::create_dir_all(&logseq_dir).unwrap();
        let mut f = fs::File::create(logseq_dir.join(CONFIG_EDN_FILE)).unwrap();
        f.write_all(config_edn.as_bytes()).unwrap();
    }

    #[test]
    fn missing_logseq_dir_is_config_missing() {
        let dir = tempdir().unwrap();
        let err = GraphConfig::load(dir.path(), None).unwrap_err();
        assert!(matches!(err, AnalyzerError::ConfigMissing { .. }));
    }

    #[test]
    fn merges_config_edn_over_defaults() {
        let dir = tempdir().unwrap();
        write_graph_skeleton(dir.path(), r#"{:journal/file-name-format "yyyy-MM-dd"}"#);
        let cfg = GraphConfig::load(dir.path(), None).unwrap();
        assert_eq!(cfg.journal_file_name_format, "yyyy-MM-dd");
        assert_eq!(cfg.journal_page_title_format, DEFAULT_PAGE_TITLE_FORMAT);
        assert_eq!(cfg.pages_dir, DEFAULT_PAGES_DIR);
    }

    #[test]
    fn triple_lowbar_format_selects_separator() {
        let dir = tempdir().unwrap();
        write_graph_skeleton(dir.path(), r#"{:file/name-format :triple-lowbar}"#);
        let cfg = GraphConfig::load(dir.path(), None).unwrap();
        assert_eq!(cfg.ns_file_sep(), NS_FILE_SEP_TRIPLE_LOWBAR);
    }

    #[test]
    fn global_override_replaces_graph_local_key() {
        let dir = tempdir().unwrap();
        write_graph_skeleton(dir.path(), r#"{:pages-directory "pages"}"#);
        let global = dir.path().join("global.edn");
        fs::write(&global, r#"{:pages-directory "notes"}"#).unwrap();
        let cfg = GraphConfig::load(dir.path(), Some(&global)).unwrap();
        assert_eq!(cfg.pages_dir, "notes");
    }

    #[test]
    fn malformed_global_config_warns_and_falls_back_to_graph_local() {
        let dir = tempdir().unwrap();
        write_graph_skeleton(dir.path(), r#"{:pages-directory "pages"}"#);
        let global = dir.path().join("global.edn");
        fs::write(&global, "{:pages-directory").unwrap();
        let cfg = GraphConfig::load(dir.path(), Some(&global)).unwrap();
        assert_eq!(cfg.pages_dir, "pages");
    }
}
