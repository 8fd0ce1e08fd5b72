//! `![text](url)` embedded links: internet URLs, or URLs touching an
//! `assets/` path, or anything else.

use regex::Regex;

const URL_BODY: &str = r"(?:(?:https?|ftp)://(?:\S+(?::\S*)?@)?(?:\d{1,3}(?:\.\d{1,3}){3}|\[[0-9A-Fa-f:]+\]|(?:[A-Za-z0-9-]+\.)+[A-Za-z]{2,})(?::\d{2,5})?(?:/[^\s]*)?)";

pub struct EmbeddedLinkPatterns {
    pub all: Regex,
    pub internet: Regex,
    pub asset: Regex,
}

impl EmbeddedLinkPatterns {
    #[must_use]
    pub fn compile() -> Self {
        Self {
            all: Regex::new(r"(?is)!\[.*?\]\(.*?\)").unwrap(),
            internet: Regex::new(&format!(r#"(?is)!\[.*?\]\({URL_BODY}(?:\s+["'][^)]*["'])?\)"#)).unwrap(),
            asset: Regex::new(r"(?is)!\[.*?\]\(.*?(?:assets/|\.\.assets/).*?\)").unwrap(),
        }
    }

    #[must_use]
    pub fn classify(&self, matched: &str) -> super::ExtLinkKind {
        if self.internet.is_match(matched) {
            super::ExtLinkKind::Internet
        } else if self.asset.is_match(matched) {
            super::ExtLinkKind::Asset
        } else {
            super::ExtLinkKind::Other
        }
    }
}
