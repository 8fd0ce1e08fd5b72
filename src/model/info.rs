//! Small value-carrier structs nested inside [`crate::model::file::LogseqFile`].

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SizeInfo {
    pub size: u64,
    pub has_content: bool,
    pub size_human: String,
}

impl SizeInfo {
    #[must_use]
    pub fn new(size: u64) -> Self {
        Self { size, has_content: size > 0, size_human: human_size(size) }
    }
}

fn human_size(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} {}", UNITS[unit])
    } else {
        format!("{value:.2} {}", UNITS[unit])
    }
}

/// Creation/modification times, both as epoch seconds and ISO-8601 strings,
/// plus age relative to "now" at extraction time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimestampInfo {
    pub created_at: i64,
    pub created_at_iso: String,
    pub modified_at: i64,
    pub modified_at_iso: String,
    pub time_existed: i64,
    pub time_unmodified: i64,
}

impl TimestampInfo {
    #[must_use]
    pub fn new(created_at: i64, modified_at: i64, now: i64) -> Self {
        Self {
            created_at,
            created_at_iso: epoch_to_iso(created_at),
            modified_at,
            modified_at_iso: epoch_to_iso(modified_at),
            time_existed: (now - created_at).max(0),
            time_unmodified: (now - modified_at).max(0),
        }
    }
}

fn epoch_to_iso(secs: i64) -> String {
    chrono::DateTime::from_timestamp(secs, 0).map_or_else(String::new, |dt| dt.to_rfc3339())
}

/// Namespace decomposition of a logical name containing `/`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NamespaceInfo {
    pub parts: Vec<(String, usize)>,
    pub root: String,
    pub parent: String,
    pub parent_full: String,
    pub stem: String,
    pub is_namespace: bool,
    pub children: BTreeSet<String>,
}

impl NamespaceInfo {
    #[must_use]
    pub fn from_logical_name(name: &str, sep: &str) -> Self {
        if !name.contains(sep) {
            return Self { stem: name.to_string(), ..Self::default() };
        }
        let segments: Vec<&str> = name.split(sep).filter(|s| !s.is_empty()).collect();
        if segments.len() < 2 {
            return Self { stem: name.to_string(), ..Self::default() };
        }
        let parts: Vec<(String, usize)> =
            segments.iter().enumerate().map(|(i, s)| ((*s).to_string(), i + 1)).collect();
        let root = segments[0].to_string();
        let stem = segments[segments.len() - 1].to_string();
        let parent = if segments.len() == 2 {
            root.clone()
        } else {
            segments[segments.len() - 2].to_string()
        };
        let parent_full = segments[..segments.len() - 1].join(sep);
        Self { parts, root, parent, parent_full, stem, is_namespace: true, children: BTreeSet::new() }
    }
}

/// Output of the bullet segmenter (§4.C).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BulletInfo {
    pub chars: usize,
    pub bullets: usize,
    pub empty_bullets: usize,
    pub char_per_bullet: Option<f64>,
}

impl BulletInfo {
    #[must_use]
    pub fn new(chars: usize, bullets: usize, empty_bullets: usize) -> Self {
        let char_per_bullet = if bullets == 0 {
            None
        } else {
            Some((chars as f64 / bullets as f64 * 100.0).round() / 100.0)
        };
        Self { chars, bullets, empty_bullets, char_per_bullet }
    }
}
