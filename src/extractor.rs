//! The content extractor (§4.D): the three-phase masking-cascade algorithm
//! that turns one file's raw text into its feature map.

use std::collections::HashSet;

use crate::bullets;
use crate::config::builtin_properties;
use crate::model::{FeatureKey, FeatureMap};
use crate::patterns::{ExtLinkKind, Patterns};

/// Placeholder marker character for masked spans (Private Use Area, never
/// appears in ordinary Markdown). Masked spans are never unmasked; they
/// remain opaque tokens downstream, per §4.D.
const MASK_MARK: char = '\u{E000}';

fn push_str(set: &mut FeatureMap, key: FeatureKey, value: String) {
    set.entry(key).or_default().push(value);
}

/// Replaces every match of `re` in `text` with an opaque placeholder,
/// recording the match in `features` under `classify(matched)` if `classify`
/// is given, else leaving it unrecorded (used for the `any-links` mask,
/// which only exists to protect other patterns — `any_links` itself was
/// already populated from the raw, unmasked text in phase 1).
fn mask_and_classify(
    text: &str,
    re: &regex::Regex,
    features: &mut FeatureMap,
    mut classify: impl FnMut(&str) -> Option<FeatureKey>,
) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for m in re.find_iter(text) {
        out.push_str(&text[last..m.start()]);
        if let Some(key) = classify(m.as_str()) {
            push_str(features, key, m.as_str().to_string());
        }
        out.push(MASK_MARK);
        last = m.end();
    }
    out.push_str(&text[last..]);
    out
}

/// Bracket-aware comma split used for `alias:: [[a,b]], c, [[d]]`: a comma
/// inside `[[...]]` does not delimit.
#[must_use]
pub fn split_alias_value(value: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut depth = 0i32;
    let mut current = String::new();
    let mut chars = value.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '[' if chars.peek() == Some(&'[') => {
                chars.next();
                depth += 1;
            }
            ']' if chars.peek() == Some(&']') => {
                chars.next();
                depth -= 1;
            }
            ',' if depth <= 0 => {
                out.push(current.trim().to_string());
                current.clear();
                continue;
            }
            _ => {}
        }
        current.push(c);
    }
    if !current.trim().is_empty() {
        out.push(current.trim().to_string());
    }
    out.into_iter().filter(|s| !s.is_empty()).collect()
}

/// Phase 2+3 helper: scans text for `K::V` property lines, splitting keys
/// into built-in / user sets.
fn extract_properties(text: &str, patterns: &Patterns, builtin_key: FeatureKey, user_key: FeatureKey, features: &mut FeatureMap) {
    let mut keys: HashSet<String> = HashSet::new();
    for line in text.lines() {
        if crate::patterns::content::line_is_bullet_marker(line) {
            continue;
        }
        if let Some(caps) = patterns.content.property_value.captures(line.trim_start()) {
            keys.insert(caps[1].to_lowercase());
        }
    }
    let (builtin, user) = builtin_properties::split_builtin_user(&keys);
    for k in builtin {
        push_str(features, builtin_key, k);
    }
    for k in user {
        push_str(features, user_key, k);
    }
}

/// Runs the full three-phase extraction algorithm for one file's raw text.
#[must_use]
pub fn extract(text: &str, patterns: &Patterns) -> FeatureMap {
    let mut features: FeatureMap = FeatureMap::new();
    if text.is_empty() {
        return features;
    }

    // Phase 1: quick extractions on raw text.
    for m in patterns.content.asset.find_iter(text) {
        push_str(&mut features, FeatureKey::Assets, m.as_str().to_string());
    }
    for m in patterns.content.any_link.find_iter(text) {
        push_str(&mut features, FeatureKey::AnyLinks, m.as_str().to_string());
    }
    for m in patterns.code.inline.find_iter(text) {
        push_str(&mut features, FeatureKey::InlineCode, m.as_str().to_string());
    }

    // Phase 2: property extraction, page vs block.
    let seg = bullets::segment(text);
    let primary_trimmed = seg.primary.trim();
    let working_content;
    if !primary_trimmed.is_empty() && !primary_trimmed.starts_with('#') {
        extract_properties(&seg.primary, patterns, FeatureKey::PropertiesPageBuiltin, FeatureKey::PropertiesPageUser, &mut features);
        working_content = seg.bullets.join("\n");
    } else {
        working_content = text.to_string();
    }
    extract_properties(&working_content, patterns, FeatureKey::PropertiesBlockBuiltin, FeatureKey::PropertiesBlockUser, &mut features);

    // Phase 3: aliases and property values. Same bullet-marker exclusion as
    // phase 2's property scan (the originating `PROPERTY_VALUE` regex is
    // reused for both and bakes in "not a bullet line").
    for line in working_content.lines() {
        if crate::patterns::content::line_is_bullet_marker(line) {
            continue;
        }
        let Some(caps) = patterns.content.property_value.captures(line.trim_start()) else { continue };
        let key = caps[1].to_lowercase();
        let value = caps[2].trim();
        if value.is_empty() {
            continue;
        }
        push_str(&mut features, FeatureKey::PropertiesValues, format!("{key}:: {value}"));
        if key == "alias" {
            for alias in split_alias_value(value) {
                push_str(&mut features, FeatureKey::Aliases, alias);
            }
        }
    }

    // Phase 4: cascade masking, fixed order.
    let masked = mask_and_classify(&working_content, &patterns.code.all, &mut features, |m| Some(patterns.code.classify(m)));
    let masked = mask_and_classify(&masked, &patterns.code.inline, &mut features, |_| None);
    let masked = mask_and_classify(&masked, &patterns.advanced_command.all, &mut features, |m| Some(patterns.advanced_command.classify(m)));
    let masked = mask_and_classify(&masked, &patterns.content.any_link, &mut features, |_| None);

    extract_remaining_content(&masked, patterns, &mut features);
    extract_bracket_families(&masked, patterns, &mut features);

    features
}

fn extract_remaining_content(masked: &str, patterns: &Patterns, features: &mut FeatureMap) {
    for caps in patterns.content.page_reference.captures_iter(masked) {
        let m = caps.get(0).unwrap();
        if crate::patterns::content::not_preceded_by(masked, m.start(), '#') {
            push_str(features, FeatureKey::PageReferences, caps[1].to_lowercase());
        }
    }
    for caps in patterns.content.tagged_backlink.captures_iter(masked) {
        push_str(features, FeatureKey::TaggedBacklinks, caps[1].to_lowercase());
    }
    for m in patterns.content.tag.find_iter(masked) {
        if crate::patterns::content::tag_is_not_tagged_backlink(masked, m.start() + 1) {
            push_str(features, FeatureKey::Tags, masked[m.start() + 1..m.end()].to_lowercase());
        }
    }
    for caps in patterns.content.draw.captures_iter(masked) {
        push_str(features, FeatureKey::Draws, caps[1].to_string());
    }
    for m in patterns.content.blockquote.find_iter(masked) {
        push_str(features, FeatureKey::Blockquotes, m.as_str().to_string());
    }
    for m in patterns.content.flashcard.find_iter(masked) {
        push_str(features, FeatureKey::Flashcards, m.as_str().to_string());
    }
    for m in patterns.content.dynamic_variable.find_iter(masked) {
        push_str(features, FeatureKey::DynamicVariables, m.as_str().to_string());
    }
}

fn extract_bracket_families(masked: &str, patterns: &Patterns, features: &mut FeatureMap) {
    for m in patterns.double_curly.all.find_iter(masked) {
        let key = patterns.double_curly.classify(m.as_str());
        push_str(features, key, m.as_str().to_string());
    }
    for m in patterns.double_parentheses.all.find_iter(masked) {
        if !crate::patterns::double_parentheses::not_embed_prefixed(masked, m.start()) {
            continue;
        }
        let key = if patterns.double_parentheses.is_uuid_form(m.as_str()) {
            FeatureKey::BlockRefs
        } else {
            FeatureKey::AllRefs
        };
        push_str(features, key, m.as_str().to_string());
    }
    for m in patterns.embedded_link.all.find_iter(masked) {
        let key = match patterns.embedded_link.classify(m.as_str()) {
            ExtLinkKind::Internet => FeatureKey::EmbeddedLinksInternet,
            ExtLinkKind::Asset => FeatureKey::EmbeddedLinksAsset,
            _ => FeatureKey::EmbeddedLinksOther,
        };
        push_str(features, key, m.as_str().to_string());
    }
    for m in patterns.external_link.all.find_iter(masked) {
        if !crate::patterns::external_link::not_preceded_by_bang(masked, m.start()) {
            continue;
        }
        let key = match patterns.external_link.classify(m.as_str()) {
            ExtLinkKind::Internet => FeatureKey::ExternalLinksInternet,
            ExtLinkKind::Alias => FeatureKey::ExternalLinksAlias,
            _ => FeatureKey::ExternalLinksOther,
        };
        push_str(features, key, m.as_str().to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_reference_and_tag_scenario() {
        let patterns = Patterns::compile();
        let text = "See [[Foo Bar]] and #tag1 and #[[Baz]].";
        let features = extract(text, &patterns);
        assert_eq!(features.get(&FeatureKey::PageReferences), Some(&vec!["foo bar".to_string()]));
        assert_eq!(features.get(&FeatureKey::Tags), Some(&vec!["tag1".to_string()]));
        assert_eq!(features.get(&FeatureKey::TaggedBacklinks), Some(&vec!["baz".to_string()]));
    }

    #[test]
    fn masking_hides_code_block_contents() {
        let patterns = Patterns::compile();
        let text = "```\n[[InsideCode]]\n```\n[[Outside]]";
        let features = extract(text, &patterns);
        assert_eq!(features.get(&FeatureKey::PageReferences), Some(&vec!["outside".to_string()]));
        assert!(features.contains_key(&FeatureKey::MultilineCode));
    }

    #[test]
    fn alias_splitting_scenario() {
        let patterns = Patterns::compile();
        let text = "alias:: [[a,b]], c, [[d]]";
        let features = extract(text, &patterns);
        assert_eq!(
            features.get(&FeatureKey::Aliases),
            Some(&vec!["a,b".to_string(), "c".to_string(), "d".to_string()])
        );
    }

    #[test]
    fn bullet_marker_lines_are_excluded_from_property_values_and_aliases() {
        // Primary starts with `#`, so phase 2 leaves `working_content` as the
        // raw, unstripped text — bullet markers are still literally present
        // and phase 3 must not treat them as property-key candidates.
        let patterns = Patterns::compile();
        let text = "#meta\n- key:: value\n- alias:: [[decoy]]";
        let features = extract(text, &patterns);
        assert!(!features.contains_key(&FeatureKey::PropertiesValues));
        assert!(!features.contains_key(&FeatureKey::Aliases));
    }

    #[test]
    fn indented_non_bullet_property_line_still_matches_via_trim_start() {
        let patterns = Patterns::compile();
        let text = "#meta\n  key:: value";
        let features = extract(text, &patterns);
        assert_eq!(features.get(&FeatureKey::PropertiesValues), Some(&vec!["key:: value".to_string()]));
    }

    #[test]
    fn empty_text_short_circuits_to_empty_feature_map() {
        let patterns = Patterns::compile();
        assert!(extract("", &patterns).is_empty());
    }
}
