use chrono::NaiveDate;
use logseq_analyzer_rs::journal::{format_page_title, parse_journal_key};
use proptest::prelude::*;

/// One Clojure-style format per round-trip case — each combination is
/// unambiguous enough that formatting then parsing recovers the same date
/// (§8's quantified round-trip invariant).
fn arb_format() -> impl Strategy<Value = &'static str> {
    prop_oneof![
        Just("yyyy_MM_dd"),
        Just("yyyy-MM-dd"),
        Just("MMM d, yyyy"),
        Just("MMM do, yyyy"),
        Just("yyyy/MM/dd"),
    ]
}

fn arb_date() -> impl Strategy<Value = NaiveDate> {
    (1970i32..2100, 1u32..=12, 1u32..=28)
        .prop_map(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d).unwrap())
}

proptest! {
    #[test]
    fn format_then_parse_recovers_the_same_date(date in arb_date(), fmt in arb_format()) {
        let formatted = format_page_title(date, fmt);
        let parsed = parse_journal_key(&formatted, fmt);
        prop_assert_eq!(parsed, Some(date));
    }
}
