//! The path classifier (§4.B): maps a filesystem path to a [`FileType`] and
//! a normalized logical name, and constructs the external-viewer URL.

use std::path::{Component, Path};

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};

use crate::config::GraphConfig;
use crate::journal::{format_page_title, parse_journal_key};
use crate::model::FileType;

const FRAGMENT: &AsciiSet = &CONTROLS.add(b' ').add(b'"').add(b'<').add(b'>').add(b'`');

/// Classifies a path's file type by walking up from its immediate parent.
#[must_use]
pub fn classify_file_type(path: &Path, config: &GraphConfig) -> FileType {
    let dirs = config.target_dir_names();
    let mut components: Vec<String> = path
        .parent()
        .into_iter()
        .flat_map(Path::components)
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy().to_string()),
            _ => None,
        })
        .collect();
    components.reverse();

    let Some(immediate) = components.first() else {
        return FileType::Other;
    };
    if let Some(idx) = dirs.iter().position(|d| d == immediate) {
        return dir_index_to_file_type(idx);
    }
    for ancestor in components.iter().skip(1) {
        if let Some(idx) = dirs.iter().position(|d| d == ancestor) {
            return dir_index_to_file_type(idx).sub_variant();
        }
    }
    FileType::Other
}

fn dir_index_to_file_type(idx: usize) -> FileType {
    match idx {
        0 => FileType::Asset,
        1 => FileType::Draw,
        2 => FileType::Journal,
        3 => FileType::Page,
        _ => FileType::Whiteboard,
    }
}

/// Derives the logical name for a classified file.
#[must_use]
pub fn logical_name(path: &Path, file_type: FileType, config: &GraphConfig) -> String {
    let stem = path.file_stem().map(|s| s.to_string_lossy().to_string()).unwrap_or_default();

    if matches!(file_type, FileType::Journal | FileType::SubJournal) {
        if let Some(date) = parse_journal_key(&stem, &config.journal_file_name_format) {
            return format_page_title(date, &config.journal_page_title_format);
        }
        return stem;
    }

    let decoded = percent_decode_str(&stem).decode_utf8_lossy().to_string();
    let sep = config.ns_file_sep();
    let without_trailing = decoded.strip_suffix(sep).unwrap_or(&decoded);
    without_trailing.replace(sep, "/")
}

/// Builds the external-viewer URL (§4.B), only for paths inside a `page` or
/// `block-id` subdirectory; empty otherwise.
#[must_use]
pub fn external_url(path: &Path, graph_root: &Path, config: &GraphConfig) -> String {
    let rel = match path.strip_prefix(graph_root) {
        Ok(r) => r,
        Err(_) => return String::new(),
    };
    let target_segment = rel
        .components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy().to_string()),
            _ => None,
        })
        .find(|seg| seg == "page" || seg == "block-id");
    let Some(segment) = target_segment else {
        return String::new();
    };

    let stem = path.file_stem().map(|s| s.to_string_lossy().to_string()).unwrap_or_default();
    let encoded = utf8_percent_encode(&stem, FRAGMENT).to_string();
    let fixed = encoded.replace(config.ns_file_sep(), "%2F").replace("%253A", "%3A");

    format!("file:///{}/{segment}/{fixed}", graph_root.display())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{GraphConfig, NsFileFormat, DEFAULT_ASSETS_DIR, DEFAULT_DRAWS_DIR, DEFAULT_FILE_NAME_FORMAT, DEFAULT_JOURNALS_DIR, DEFAULT_PAGES_DIR, DEFAULT_PAGE_TITLE_FORMAT, DEFAULT_WHITEBOARDS_DIR};
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

    #[test]
    fn direct_child_of_pages_is_page() {
        let cfg = test_config(Path::new("/graph"));
        let path = PathBuf::from("/graph/pages/apollo.md");
        assert_eq!(classify_file_type(&path, &cfg), FileType::Page);
    }

    #[test]
    fn nested_child_is_sub_variant() {
        let cfg = test_config(Path::new("/graph"));
        let path = PathBuf::from("/graph/pages/nested/apollo.md");
        assert_eq!(classify_file_type(&path, &cfg), FileType::SubPage);
    }

    #[test]
    fn unrelated_path_is_other() {
        let cfg = test_config(Path::new("/graph"));
        let path = PathBuf::from("/graph/logseq/config.edn");
        assert_eq!(classify_file_type(&path, &cfg), FileType::Other);
    }

    #[test]
    fn namespace_separator_is_expanded_to_slash() {
        let cfg = test_config(Path::new("/graph"));
        let path = PathBuf::from("/graph/pages/projects%2Fapollo.md");
        let name = logical_name(&path, FileType::Page, &cfg);
        assert_eq!(name, "projects/apollo");
    }

    #[test]
    fn journal_stem_reformats_to_page_title() {
        let cfg = test_config(Path::new("/graph"));
        let path = PathBuf::from("/graph/journals/2024_01_15.md");
        let name = logical_name(&path, FileType::Journal, &cfg);
        assert_eq!(name, "Jan 15th, 2024");
    }
}
