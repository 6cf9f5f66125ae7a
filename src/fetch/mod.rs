// src/fetch/mod.rs

pub mod http;

pub use http::HttpSource;

use crate::error::Result;

/// Default statistics endpoint of the university information system.
pub const DEFAULT_BASE_URL: &str = "https://is.muni.cz/studium/statistika";

/// Where the HTML documents come from.
///
/// Implementations must be shareable across the worker pool; every call is an
/// independent round trip.
pub trait Source: Sync {
    /// Document containing the `datv` select control for `faculty`.
    fn fetch_dates(&self, faculty: &str) -> Result<String>;

    /// Statistics table for one snapshot. `date_token` is passed through exactly
    /// as returned by the date enumerator.
    fn fetch_snapshot(&self, faculty: &str, date_token: &str) -> Result<String>;
}

impl<S: Source + ?Sized> Source for &S {
    fn fetch_dates(&self, faculty: &str) -> Result<String> {
        (**self).fetch_dates(faculty)
    }

    fn fetch_snapshot(&self, faculty: &str, date_token: &str) -> Result<String> {
        (**self).fetch_snapshot(faculty, date_token)
    }
}
