// src/process/natural.rs

use once_cell::sync::Lazy;
use regex::Regex;
use std::cmp::Ordering;

static RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9]+|[^0-9]+").expect("regex should parse"));

/// One run of a label: digits compare by value, anything else by text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Run<'a> {
    Text(&'a str),
    /// Digit run with leading zeros stripped, so `len` then lexical order is
    /// numeric order at any length.
    Number(&'a str),
}

impl Ord for Run<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Run::Number(a), Run::Number(b)) => a.len().cmp(&b.len()).then_with(|| a.cmp(b)),
            (Run::Text(a), Run::Text(b)) => a.cmp(b),
            // digit runs sort before text runs
            (Run::Number(_), Run::Text(_)) => Ordering::Less,
            (Run::Text(_), Run::Number(_)) => Ordering::Greater,
        }
    }
}

impl PartialOrd for Run<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Split `label` into alternating text and digit runs.
pub fn natural_key(label: &str) -> Vec<Run<'_>> {
    RUNS.find_iter(label)
        .map(|m| {
            let s = m.as_str();
            if s.as_bytes()[0].is_ascii_digit() {
                let trimmed = s.trim_start_matches('0');
                Run::Number(if trimmed.is_empty() { "0" } else { trimmed })
            } else {
                Run::Text(s)
            }
        })
        .collect()
}

/// Human ordering: `sem_2` before `sem_10`. Labels that compare equal by key
/// (`s01` vs `s1`) fall back to plain string order so the result is total.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    natural_key(a)
        .cmp(&natural_key(b))
        .then_with(|| a.cmp(b))
}

/// Sort labels in place with [`natural_cmp`].
pub fn natural_sort<S: AsRef<str>>(labels: &mut [S]) {
    labels.sort_by(|a, b| natural_cmp(a.as_ref(), b.as_ref()));
}
