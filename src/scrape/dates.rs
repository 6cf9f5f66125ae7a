// src/scrape/dates.rs

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};
use std::fmt;
use tracing::{debug, instrument};

use super::html::child_elements;
use crate::error::{Result, ScrapeError};

/// Separator that replaces spaces inside a raw option value.
pub const TOKEN_SEPARATOR: char = '+';

static DATE_SELECT: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"select[name="datv"]"#).expect("selector should parse"));

static TOKEN_DMY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{1,2})\+(\d{1,2})\+(\d{4})$").expect("regex should parse"));

/// One statistics snapshot, identified by the token the server expects back in
/// the `datv` form field (e.g. `1+9+2020`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SnapshotDate(String);

impl SnapshotDate {
    /// Build a token from a raw option value, encoding spaces.
    pub fn from_raw(raw: &str) -> Self {
        SnapshotDate(raw.replace(' ', &TOKEN_SEPARATOR.to_string()))
    }

    /// The fetch-ready token.
    pub fn token(&self) -> &str {
        &self.0
    }

    /// Calendar date this snapshot was published for.
    pub fn to_calendar_date(&self) -> Result<NaiveDate> {
        let caps = TOKEN_DMY
            .captures(self.0.trim())
            .ok_or_else(|| ScrapeError::parse(format!("date token {:?} is not d+m+yyyy", self.0)))?;
        let field = |i: usize| -> Result<u32> {
            caps[i]
                .parse()
                .map_err(|_| ScrapeError::parse(format!("bad number in token {:?}", self.0)))
        };
        let (day, month) = (field(1)?, field(2)?);
        let year = field(3)? as i32;
        NaiveDate::from_ymd_opt(year, month, day)
            .ok_or_else(|| ScrapeError::parse(format!("date token {:?} is not a real date", self.0)))
    }

    /// `YYYY-MM-DD` label used in the output `date` column.
    pub fn iso_date(&self) -> Result<String> {
        Ok(self.to_calendar_date()?.format("%Y-%m-%d").to_string())
    }
}

impl fmt::Display for SnapshotDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Parse the snapshot tokens out of the faculty's statistics page, in the
/// order the select control lists them.
///
/// The first entry is the "all" placeholder; dropping it is the caller's job.
#[instrument(level = "debug", skip(html), fields(html_len = html.len()))]
pub fn list_snapshot_dates(html: &str) -> Result<Vec<SnapshotDate>> {
    let doc = Html::parse_document(html);
    let select = doc
        .select(&DATE_SELECT)
        .next()
        .ok_or_else(|| ScrapeError::parse("select[name=datv] not found"))?;

    let mut dates = Vec::new();
    for option in child_elements(select).filter(|e| e.value().name() == "option") {
        let value = option
            .value()
            .attr("value")
            .ok_or_else(|| ScrapeError::parse("option in select[name=datv] has no value"))?;
        dates.push(SnapshotDate::from_raw(value));
    }

    if dates.is_empty() {
        return Err(ScrapeError::parse("select[name=datv] has no options"));
    }
    debug!(count = dates.len(), "found snapshot dates");
    Ok(dates)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DATES_PAGE: &str = r#"<html><body>
        <form>
          <select name="fakulta"><option value="1433">PřF</option></select>
          <select name="datv">
            <option value="">všechna data</option>
            <option value="1 9 2020">1. 9. 2020</option>
            <option value="15 3 2019">15. 3. 2019</option>
          </select>
        </form></body></html>"#;

    #[test]
    fn lists_options_in_order_with_encoded_spaces() {
        let dates = list_snapshot_dates(DATES_PAGE).unwrap();
        let tokens: Vec<&str> = dates.iter().map(|d| d.token()).collect();
        assert_eq!(tokens, vec!["", "1+9+2020", "15+3+2019"]);
    }

    #[test]
    fn token_converts_to_iso_date() {
        let d = SnapshotDate::from_raw("1 9 2020");
        assert_eq!(d.token(), "1+9+2020");
        assert_eq!(d.iso_date().unwrap(), "2020-09-01");
        assert_eq!(
            SnapshotDate::from_raw("15 3 2019").iso_date().unwrap(),
            "2019-03-15"
        );
    }

    #[test]
    fn padded_token_converts_too() {
        assert_eq!(
            SnapshotDate::from_raw("01 09 2020").iso_date().unwrap(),
            "2020-09-01"
        );
    }

    #[test]
    fn bad_tokens_are_parse_errors() {
        for raw in ["", "všechna", "31 2 2020", "1 9 20"] {
            let err = SnapshotDate::from_raw(raw).iso_date().unwrap_err();
            assert!(err.is_parse(), "{raw:?} gave {err}");
        }
    }

    #[test]
    fn missing_select_is_parse_error() {
        let err = list_snapshot_dates("<html><body><p>nope</p></body></html>").unwrap_err();
        assert!(err.is_parse());
    }

    #[test]
    fn empty_select_is_parse_error() {
        let err = list_snapshot_dates(r#"<select name="datv"></select>"#).unwrap_err();
        assert!(err.is_parse());
    }

    #[test]
    fn option_without_value_is_parse_error() {
        let html = r#"<select name="datv"><option>1. 9. 2020</option></select>"#;
        assert!(list_snapshot_dates(html).unwrap_err().is_parse());
    }
}
