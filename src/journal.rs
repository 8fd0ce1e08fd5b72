//! The journal reconstructor (§4.H): Clojure-style date token conversion,
//! ordinal-suffix handling, and the day-by-day timeline walk.

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// Longest-token-first table, ported from the originating implementation's
/// full token map (the distilled spec gave only a partial one).
const TOKEN_TABLE: &[(&str, &str)] = &[
    ("yyyy", "%Y"),
    ("xxxx", "%Y"),
    ("MMMM", "%B"),
    ("EEEE", "%A"),
    ("SSS", "%f"),
    ("MMM", "%b"),
    ("EEE", "%a"),
    ("yy", "%y"),
    ("xx", "%y"),
    ("MM", "%m"),
    ("dd", "%d"),
    ("EE", "%a"),
    ("HH", "%H"),
    ("hh", "%I"),
    ("mm", "%M"),
    ("ss", "%S"),
    ("ZZ", "%z"),
    ("M", "%-m"),
    ("d", "%-d"),
    ("D", "%j"),
    ("E", "%a"),
    ("e", "%u"),
    ("H", "%H"),
    ("h", "%I"),
    ("m", "%-M"),
    ("s", "%-S"),
    ("a", "%p"),
    ("A", "%p"),
    ("Z", "%z"),
];

/// Converts a Clojure-style date format string into a `chrono` strftime
/// format string. The `o` ordinal token is stripped before conversion (it is
/// not a direct format token — see [`ordinal_suffix`]).
#[must_use]
pub fn to_chrono_format(clojure_format: &str) -> String {
    let stripped: String = strip_ordinal_token(clojure_format);
    let mut out = String::with_capacity(stripped.len());
    let bytes = stripped.as_bytes();
    let mut i = 0;
    'outer: while i < bytes.len() {
        for (token, replacement) in TOKEN_TABLE {
            if stripped[i..].starts_with(token) {
                out.push_str(replacement);
                i += token.len();
                continue 'outer;
            }
        }
        let ch = stripped[i..].chars().next().unwrap();
        if ch == '%' {
            out.push('%');
        }
        out.push(ch);
        i += ch.len_utf8();
    }
    out
}

/// Strip every bare `o` ordinal token (not part of another word) from a
/// Clojure date format, leaving the surrounding punctuation untouched.
fn strip_ordinal_token(fmt: &str) -> String {
    fmt.replace('o', "")
}

/// Appends an ordinal suffix (1st, 2nd, 3rd, 4th...11th, 12th, 13th...21st...)
/// to a day-of-month numeral.
#[must_use]
pub fn ordinal_suffix(day: u32) -> &'static str {
    match (day % 10, day % 100) {
        (1, 11) | (2, 12) | (3, 13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    }
}

/// Formats a date with the page-title Clojure format, inserting the ordinal
/// suffix after the day-of-month numeral if the original format contains the
/// bare `o` token.
#[must_use]
pub fn format_page_title(date: NaiveDate, clojure_format: &str) -> String {
    let chrono_fmt = to_chrono_format(clojure_format);
    let base = date.format(&chrono_fmt).to_string();
    if clojure_format.contains('o') {
        let day_str = date.day().to_string();
        if let Some(pos) = base.find(&day_str) {
            let insert_at = pos + day_str.len();
            let mut out = base.clone();
            out.insert_str(insert_at, ordinal_suffix(date.day()));
            return out;
        }
    }
    base
}

/// Parses a journal filename stem (or a dangling-link candidate string)
/// against a Clojure date format, with the ordinal-suffix substrings
/// stripped first (they aren't parseable against a numeric day token).
#[must_use]
pub fn parse_journal_key(candidate: &str, clojure_format: &str) -> Option<NaiveDate> {
    let cleaned = strip_ordinal_suffixes(candidate);
    let chrono_fmt = to_chrono_format(clojure_format);
    NaiveDate::parse_from_str(&cleaned, &chrono_fmt).ok()
}

fn strip_ordinal_suffixes(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let bytes = s.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        let rest = &s[i..];
        let mut matched = false;
        for suffix in ["st", "nd", "rd", "th"] {
            if rest.starts_with(suffix) {
                let prev_is_digit = out.chars().next_back().is_some_and(|c| c.is_ascii_digit());
                let next_char = rest[suffix.len()..].chars().next();
                let next_ok = next_char.map_or(true, |c| !c.is_ascii_alphabetic());
                if prev_is_digit && next_ok {
                    i += suffix.len();
                    matched = true;
                    break;
                }
            }
        }
        if matched {
            continue;
        }
        let ch = rest.chars().next().unwrap();
        out.push(ch);
        i += ch.len_utf8();
    }
    out
}

/// How a dangling-journal candidate relates to the reconstructed timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DanglingClass {
    Past,
    Future,
    Inside,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListStats {
    pub first: Option<NaiveDate>,
    pub last: Option<NaiveDate>,
    pub days: i64,
    pub weeks: f64,
    pub months: f64,
    pub years: f64,
}

impl ListStats {
    #[must_use]
    pub fn from_dates(dates: &[NaiveDate]) -> Self {
        let Some(first) = dates.first().copied() else {
            return Self::default();
        };
        let last = *dates.last().unwrap();
        let days = (last - first).num_days() + 1;
        Self {
            first: Some(first),
            last: Some(last),
            days,
            weeks: round2(days as f64 / 7.0),
            months: round2(days as f64 / 30.0),
            years: round2(days as f64 / 365.0),
        }
    }
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JournalTimeline {
    pub existing: Vec<NaiveDate>,
    pub timeline: Vec<NaiveDate>,
    pub missing: Vec<NaiveDate>,
    pub dangling: Vec<(NaiveDate, DanglingClass)>,
    pub all_journals: Vec<NaiveDate>,
    pub existing_stats: ListStats,
    pub timeline_stats: ListStats,
    pub missing_stats: ListStats,
}

/// Builds the day-by-day timeline from existing journal dates and a set of
/// dangling-link dates that parsed successfully (§4.H algorithm steps 1-5).
#[must_use]
pub fn build_timeline(mut existing: Vec<NaiveDate>, dangling_candidates: &[NaiveDate]) -> JournalTimeline {
    existing.sort_unstable();
    existing.dedup();
    let dangling_set: std::collections::BTreeSet<NaiveDate> = dangling_candidates.iter().copied().collect();

    let mut timeline = Vec::new();
    let mut missing = Vec::new();

    if let (Some(&first), Some(&last)) = (existing.first(), existing.last()) {
        let mut day = first;
        while day <= last {
            timeline.push(day);
            if !existing.contains(&day) {
                if dangling_set.contains(&day) {
                    // present in the timeline via the dangling-journal fill
                } else {
                    missing.push(day);
                }
            }
            day += Duration::days(1);
        }
    }

    let first = existing.first().copied();
    let last = existing.last().copied();
    let dangling: Vec<(NaiveDate, DanglingClass)> = dangling_set
        .into_iter()
        .map(|d| {
            let class = match (first, last) {
                (Some(f), _) if d < f => DanglingClass::Past,
                (_, Some(l)) if d > l => DanglingClass::Future,
                _ => DanglingClass::Inside,
            };
            (d, class)
        })
        .collect();

    let mut all_journals = timeline.clone();
    all_journals.extend(dangling.iter().map(|(d, _)| *d));
    all_journals.sort_unstable();
    all_journals.dedup();

    JournalTimeline {
        existing_stats: ListStats::from_dates(&existing),
        timeline_stats: ListStats::from_dates(&timeline),
        missing_stats: ListStats::from_dates(&missing),
        existing,
        timeline,
        missing,
        dangling,
        all_journals,
    }
}
