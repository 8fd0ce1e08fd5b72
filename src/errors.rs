use std::path::PathBuf;
use thiserror::Error;

use crate::config::edn::EdnError;

/// Failures encountered parsing or reading a single file.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid UTF-8 in file {file}")]
    InvalidUtf8 { file: PathBuf },
}

/// Top-level orchestration failures for an analysis run.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    #[error("graph folder, logseq/, or config.edn not found at {path}")]
    ConfigMissing { path: PathBuf },

    #[error("failed to parse global config at {path}: {source}")]
    ConfigParseWarning { path: PathBuf, source: EdnError },

    #[error("file error in {file}: {source}")]
    ParseError { file: PathBuf, source: ParseError },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("cache file at {path} is corrupt: {reason}")]
    CacheCorruption { path: PathBuf, reason: String },
}
