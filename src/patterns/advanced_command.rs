//! Org-mode-style `#+BEGIN_X ... #+END_X` blocks. Every keyword gets its own
//! hardcoded regex (no backreference is needed: the source does the same —
//! `#+BEGIN_QUOTE` is only ever closed by a literal `#+END_QUOTE`), tried in
//! priority order with the ascii/latex export variants checked before the
//! generic export form.

use regex::Regex;

use crate::model::FeatureKey;

pub struct AdvancedCommandPatterns {
    pub all: Regex,
    pub export_ascii: Regex,
    pub export_latex: Regex,
    pub export: Regex,
    pub caution: Regex,
    pub center: Regex,
    pub comment: Regex,
    pub example: Regex,
    pub important: Regex,
    pub note: Regex,
    pub pinned: Regex,
    pub query: Regex,
    pub quote: Regex,
    pub tip: Regex,
    pub verse: Regex,
    pub warning: Regex,
}

fn block(keyword: &str) -> Regex {
    Regex::new(&format!(r"(?is)#\+BEGIN_{keyword}.*?#\+END_{keyword}.*?(?:\n|$)")).unwrap()
}

impl AdvancedCommandPatterns {
    #[must_use]
    pub fn compile() -> Self {
        Self {
            all: Regex::new(r"(?is)#\+BEGIN_.*?#\+END_.*?(?:\n|$)").unwrap(),
            export_ascii: Regex::new(r"(?is)#\+BEGIN_EXPORT\s{1}ascii.*?#\+END_EXPORT.*?(?:\n|$)").unwrap(),
            export_latex: Regex::new(r"(?is)#\+BEGIN_EXPORT\s{1}latex.*?#\+END_EXPORT.*?(?:\n|$)").unwrap(),
            export: block("EXPORT"),
            caution: block("CAUTION"),
            center: block("CENTER"),
            comment: block("COMMENT"),
            example: block("EXAMPLE"),
            important: block("IMPORTANT"),
            note: block("NOTE"),
            pinned: block("PINNED"),
            query: block("QUERY"),
            quote: block("QUOTE"),
            tip: block("TIP"),
            verse: block("VERSE"),
            warning: block("WARNING"),
        }
    }

    /// Priority cascade over one already-matched `all`-family block.
    #[must_use]
    pub fn classify(&self, matched: &str) -> FeatureKey {
        if self.export_ascii.is_match(matched) {
            FeatureKey::AdvancedCommandExportAscii
        } else if self.export_latex.is_match(matched) {
            FeatureKey::AdvancedCommandExportLatex
        } else if self.export.is_match(matched) {
            FeatureKey::AdvancedCommandExport
        } else if self.caution.is_match(matched) {
            FeatureKey::AdvancedCommandCaution
        } else if self.center.is_match(matched) {
            FeatureKey::AdvancedCommandCenter
        } else if self.comment.is_match(matched) {
            FeatureKey::AdvancedCommandComment
        } else if self.example.is_match(matched) {
            FeatureKey::AdvancedCommandExample
        } else if self.important.is_match(matched) {
            FeatureKey::AdvancedCommandImportant
        } else if self.note.is_match(matched) {
            FeatureKey::AdvancedCommandNote
        } else if self.pinned.is_match(matched) {
            FeatureKey::AdvancedCommandPinned
        } else if self.query.is_match(matched) {
            FeatureKey::AdvancedCommandQuery
        } else if self.quote.is_match(matched) {
            FeatureKey::AdvancedCommandQuote
        } else if self.tip.is_match(matched) {
            FeatureKey::AdvancedCommandTip
        } else if self.verse.is_match(matched) {
            FeatureKey::AdvancedCommandVerse
        } else if self.warning.is_match(matched) {
            FeatureKey::AdvancedCommandWarning
        } else {
            FeatureKey::AdvancedCommand
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn export_ascii_takes_priority_over_generic_export() {
        let p = AdvancedCommandPatterns::compile();
        let block = "#+BEGIN_EXPORT ascii\nfoo\n#+END_EXPORT\n";
        assert_eq!(p.classify(block), FeatureKey::AdvancedCommandExportAscii);
    }

    #[test]
    fn quote_block_classified() {
        let p = AdvancedCommandPatterns::compile();
        let block = "#+BEGIN_QUOTE\nHello\n#+END_QUOTE\n";
        assert_eq!(p.classify(block), FeatureKey::AdvancedCommandQuote);
    }
}
