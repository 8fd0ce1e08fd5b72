//! `((...))` block references, excluding the `{{embed ((UUID))}}` form
//! already classified as a block embed. The source's exclusion is a negative
//! lookbehind for `"{{embed "`; here it's a post-match check against the text
//! immediately preceding the match.

use regex::Regex;

const UUID: &str = r"[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}";

pub struct DoubleParenthesesPatterns {
    pub all: Regex,
    pub block_reference: Regex,
}

impl DoubleParenthesesPatterns {
    #[must_use]
    pub fn compile() -> Self {
        Self {
            all: Regex::new(r"(?is)\(\(.*?\)\)").unwrap(),
            block_reference: Regex::new(&format!(r"(?is)\(\({UUID}\)\)")).unwrap(),
        }
    }

    #[must_use]
    pub fn is_uuid_form(&self, matched: &str) -> bool {
        self.block_reference.is_match(matched)
    }
}

/// `not preceded by "{{embed "` — the double-parentheses ALL pattern's
/// exclusion for a match already owned by the double-curly embed family.
#[must_use]
pub fn not_embed_prefixed(text: &str, start: usize) -> bool {
    !text[..start].ends_with("{{embed ")
}
