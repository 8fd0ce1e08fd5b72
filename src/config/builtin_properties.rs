//! The fixed set of Logseq built-in property keys.
//!
//! Ported verbatim from the originating implementation's reserved-key list.
//! Anything not in this set extracted from a `K::` property is a user
//! property.

use std::collections::HashSet;
use std::sync::OnceLock;

const BUILT_IN_PROPERTIES: &[&str] = &[
    "alias",
    "aliases",
    "background_color",
    "background-color",
    "collapsed",
    "created_at",
    "created-at",
    "custom-id",
    "doing",
    "done",
    "exclude-from-graph-view",
    "filetags",
    "filters",
    "heading",
    "hl-color",
    "hl-page",
    "hl-stamp",
    "hl-type",
    "icon",
    "id",
    "last_modified_at",
    "last-modified-at",
    "later",
    "logseq.color",
    "logseq.macro-arguments",
    "logseq.macro-name",
    "logseq.order-list-type",
    "logseq.query/nlp-date",
    "logseq.table.borders",
    "logseq.table.compact",
    "logseq.table.headers",
    "logseq.table.hover",
    "logseq.table.max-width",
    "logseq.table.stripes",
    "logseq.table.version",
    "logseq.tldraw.page",
    "logseq.tldraw.shape",
    "ls-type",
    "macro",
    "now",
    "public",
    "query-properties",
    "query-sort-by",
    "query-sort-desc",
    "query-table",
    "tags",
    "template-including-parent",
    "template",
    "title",
    "todo",
    "updated-at",
];

fn set() -> &'static HashSet<&'static str> {
    static SET: OnceLock<HashSet<&'static str>> = OnceLock::new();
    SET.get_or_init(|| BUILT_IN_PROPERTIES.iter().copied().collect())
}

#[must_use]
pub fn is_builtin(key: &str) -> bool {
    set().contains(key)
}

/// Split a set of property keys into (built-in, user) lists, each sorted for
/// deterministic output.
#[must_use]
pub fn split_builtin_user(keys: &HashSet<String>) -> (Vec<String>, Vec<String>) {
    let mut builtin = Vec::new();
    let mut user = Vec::new();
    for k in keys {
        if is_builtin(k) {
            builtin.push(k.clone());
        } else {
            user.push(k.clone());
        }
    }
    builtin.sort();
    user.sort();
    (builtin, user)
}
