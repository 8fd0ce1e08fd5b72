//! The "content" family: bullets, page references, tags, properties, assets,
//! draws, blockquotes, flashcards, dynamic variables, bare URLs, bold text.
//!
//! Several of these are defined in the originating implementation via regex
//! lookaround ("not preceded by `#`", "not followed by `[[`"). `regex` has no
//! lookaround support, so each such pattern is re-expressed here as a plain
//! match plus a post-match boundary check against the byte(s) surrounding the
//! match (see the pattern registry's porting note).

use regex::Regex;

pub struct ContentPatterns {
    pub page_reference: Regex,
    pub tagged_backlink: Regex,
    pub tag: Regex,
    pub property_value: Regex,
    pub asset: Regex,
    pub draw: Regex,
    pub blockquote: Regex,
    pub flashcard: Regex,
    pub dynamic_variable: Regex,
    pub any_link: Regex,
    pub bold: Regex,
}

const ANY_LINK_BODY: &str = r"(?:(?:https?|ftp)://(?:\S+(?::\S*)?@)?(?:\d{1,3}(?:\.\d{1,3}){3}|\[[0-9A-Fa-f:]+\]|(?:[A-Za-z0-9-]+\.)+[A-Za-z]{2,})(?::\d{2,5})?(?:/[^\s]*)?)";

impl ContentPatterns {
    #[must_use]
    pub fn compile() -> Self {
        Self {
            page_reference: Regex::new(r"(?is)\[\[(.+?)\]\]").unwrap(),
            tagged_backlink: Regex::new(r"(?is)#\[\[([^\]#]+?)\]\]").unwrap(),
            tag: Regex::new(r"(?is)#([^\]#\s]+)").unwrap(),
            property_value: Regex::new(r"(?im)^([A-Za-z0-9_-]+?)::(.*)$").unwrap(),
            asset: Regex::new(r"(?is)assets/(.+)").unwrap(),
            draw: Regex::new(r"(?is)\[\[draws/(.+?)\.excalidraw\]\]").unwrap(),
            blockquote: Regex::new(r"(?im)(?:^|\s)-\ >.*").unwrap(),
            flashcard: Regex::new(r"(?im)(?:^|\s)-\s.*(?:#card|\[\[card\]\]).*").unwrap(),
            dynamic_variable: Regex::new(r"(?is)<%\s*.*?\s*%>").unwrap(),
            any_link: Regex::new(&format!(r"(?i)\b{ANY_LINK_BODY}\b")).unwrap(),
            bold: Regex::new(r"(?is)\*\*.*?\*\*").unwrap(),
        }
    }
}

/// `not preceded by '#'` — the workaround for `PAGE_REFERENCE`'s lookbehind.
#[must_use]
pub fn not_preceded_by(text: &str, start: usize, ch: char) -> bool {
    text[..start].chars().next_back() != Some(ch)
}

/// A `#tag` match is spurious when it is really the start of `#[[Page]]`
/// (the tagged-backlink family owns that form).
#[must_use]
pub fn tag_is_not_tagged_backlink(text: &str, end_of_hash: usize) -> bool {
    !text[end_of_hash..].starts_with("[[")
}

/// Strips a candidate property line so `not a bullet` matches the source's
/// `(?!\s*-\s)` lookahead: a line whose trimmed start is a bullet marker is
/// not a property-key candidate.
#[must_use]
pub fn line_is_bullet_marker(line: &str) -> bool {
    let trimmed = line.trim_start();
    trimmed == "-" || trimmed.starts_with("- ")
}
