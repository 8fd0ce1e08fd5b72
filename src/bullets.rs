//! The bullet segmenter (§4.C): splits file text at bullet markers and
//! isolates the page-properties prolog.

use crate::model::info::BulletInfo;

/// A hyphen at the start of a line, optionally indented.
fn is_bullet_line(line: &str) -> bool {
    let trimmed = line.trim_start();
    trimmed == "-" || trimmed.starts_with("- ")
}

/// Result of splitting file text on bullet markers.
pub struct Segmented {
    /// Text before the first bullet marker — the page-properties prolog
    /// candidate.
    pub primary: String,
    /// Every bullet's own text (marker stripped), in document order.
    pub bullets: Vec<String>,
    pub info: BulletInfo,
}

#[must_use]
pub fn segment(text: &str) -> Segmented {
    let chars = text.chars().count();
    let mut primary_lines = Vec::new();
    let mut bullets: Vec<String> = Vec::new();
    let mut current: Option<String> = None;
    let mut seen_first_bullet = false;

    for line in text.lines() {
        if is_bullet_line(line) {
            seen_first_bullet = true;
            if let Some(prev) = current.take() {
                bullets.push(prev);
            }
            let stripped = line.trim_start();
            let body = stripped.strip_prefix("- ").unwrap_or("").to_string();
            current = Some(body);
        } else if seen_first_bullet {
            if let Some(cur) = current.as_mut() {
                cur.push('\n');
                cur.push_str(line);
            }
        } else {
            primary_lines.push(line);
        }
    }
    if let Some(last) = current.take() {
        bullets.push(last);
    }

    let empty_bullets = bullets.iter().filter(|b| b.trim().is_empty()).count();
    let info = BulletInfo::new(chars, bullets.len(), empty_bullets);

    Segmented { primary: primary_lines.join("\n"), bullets, info }
}
