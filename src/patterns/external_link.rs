//! `[text](url)` external links, not preceded by `!` (that's an embedded
//! link, §4.A's Embedded-link family). The source expresses the exclusion as
//! a negative lookbehind; here it's a post-match check.

use regex::Regex;

const URL_BODY: &str = r"(?:(?:https?|ftp)://(?:\S+(?::\S*)?@)?(?:\d{1,3}(?:\.\d{1,3}){3}|\[[0-9A-Fa-f:]+\]|(?:[A-Za-z0-9-]+\.)+[A-Za-z]{2,})(?::\d{2,5})?(?:/[^\s]*)?)";

pub struct ExternalLinkPatterns {
    pub all: Regex,
    pub internet: Regex,
    pub alias: Regex,
}

impl ExternalLinkPatterns {
    #[must_use]
    pub fn compile() -> Self {
        Self {
            all: Regex::new(r"(?is)\[.*?\]\(.*?\)").unwrap(),
            internet: Regex::new(&format!(r#"(?is)\[.*?\]\({URL_BODY}(?:\s+["'][^)]*["'])?\)"#)).unwrap(),
            alias: Regex::new(r"(?is)\[.*?\]\((?:\[\[.*?\]\]|\(\(.*?\)\))\)").unwrap(),
        }
    }

    #[must_use]
    pub fn classify(&self, matched: &str) -> super::ExtLinkKind {
        if self.internet.is_match(matched) {
            super::ExtLinkKind::Internet
        } else if self.alias.is_match(matched) {
            super::ExtLinkKind::Alias
        } else {
            super::ExtLinkKind::Other
        }
    }
}

/// `not preceded by '!'` — the external-link ALL pattern's exclusion for a
/// match already owned by the embedded-link family.
#[must_use]
pub fn not_preceded_by_bang(text: &str, start: usize) -> bool {
    text[..start].chars().next_back() != Some('!')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn internet_link_classified() {
        let p = ExternalLinkPatterns::compile();
        assert_eq!(p.classify("[docs](https://example.com/path)"), super::super::ExtLinkKind::Internet);
    }

    #[test]
    fn alias_link_classified() {
        let p = ExternalLinkPatterns::compile();
        assert_eq!(p.classify("[alias]([[Some Page]])"), super::super::ExtLinkKind::Alias);
    }
}
