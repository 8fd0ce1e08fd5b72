//! The pattern registry (§4.A): one compiled family per syntactic
//! construct, each exposing a priority cascade from "all" match down to a
//! fallback category. [`Patterns::compile`] builds every family once; the
//! content extractor (§4.D) is the only consumer.

pub mod advanced_command;
pub mod code;
pub mod content;
pub mod double_curly;
pub mod double_parentheses;
pub mod embedded_link;
pub mod external_link;

use advanced_command::AdvancedCommandPatterns;
use code::CodePatterns;
use content::ContentPatterns;
use double_curly::DoubleCurlyPatterns;
use double_parentheses::DoubleParenthesesPatterns;
use embedded_link::EmbeddedLinkPatterns;
use external_link::ExternalLinkPatterns;

/// Shared classification outcome for the external-link and embedded-link
/// families (each only uses a subset of variants).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtLinkKind {
    Internet,
    Alias,
    Asset,
    Other,
}

/// Every compiled family, built once per analysis run and shared (by
/// reference) across the parallel per-file extraction phase.
pub struct Patterns {
    pub content: ContentPatterns,
    pub code: CodePatterns,
    pub advanced_command: AdvancedCommandPatterns,
    pub double_curly: DoubleCurlyPatterns,
    pub double_parentheses: DoubleParenthesesPatterns,
    pub external_link: ExternalLinkPatterns,
    pub embedded_link: EmbeddedLinkPatterns,
}

impl Patterns {
    #[must_use]
    pub fn compile() -> Self {
        Self {
            content: ContentPatterns::compile(),
            code: CodePatterns::compile(),
            advanced_command: AdvancedCommandPatterns::compile(),
            double_curly: DoubleCurlyPatterns::compile(),
            double_parentheses: DoubleParenthesesPatterns::compile(),
            external_link: ExternalLinkPatterns::compile(),
            embedded_link: EmbeddedLinkPatterns::compile(),
        }
    }
}

impl Default for Patterns {
    fn default() -> Self {
        Self::compile()
    }
}
