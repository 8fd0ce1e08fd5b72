//! Code-block family: multiline fenced blocks (plain, `calc`, language-tagged)
//! and inline single-backtick code.

use regex::Regex;

use crate::model::FeatureKey;

pub struct CodePatterns {
    pub all: Regex,
    pub calc: Regex,
    pub lang: Regex,
    pub inline: Regex,
}

impl CodePatterns {
    #[must_use]
    pub fn compile() -> Self {
        Self {
            all: Regex::new(r"(?is)```.*?```").unwrap(),
            calc: Regex::new(r"(?is)```calc.*?```").unwrap(),
            lang: Regex::new(r"(?is)```\w+.*?```").unwrap(),
            inline: Regex::new(r"(?is)`[^`].+?`").unwrap(),
        }
    }

    /// Priority cascade for one already-matched `all`-family block:
    /// `calc` first, then any other language tag, else the plain fallback.
    #[must_use]
    pub fn classify(&self, matched: &str) -> FeatureKey {
        if self.calc.is_match(matched) {
            FeatureKey::MultilineCodeCalc
        } else if self.lang.is_match(matched) {
            FeatureKey::MultilineCodeLang
        } else {
            FeatureKey::MultilineCode
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn calc_block_wins_over_plain_lang() {
        let p = CodePatterns::compile();
        assert_eq!(p.classify("```calc\n1+1\n```"), FeatureKey::MultilineCodeCalc);
    }

    #[test]
    fn lang_tagged_block_is_classified() {
        let p = CodePatterns::compile();
        assert_eq!(p.classify("```rust\nfn main() {}\n```"), FeatureKey::MultilineCodeLang);
    }

    #[test]
    fn untagged_block_falls_back_to_plain() {
        let p = CodePatterns::compile();
        assert_eq!(p.classify("```\nplain\n```"), FeatureKey::MultilineCode);
    }
}
