// src/error.rs

use thiserror::Error;

/// Everything the scraping pipeline can fail with.
///
/// `Fetch` and `Parse` are the two classes callers care about: the first means
/// the upstream document never arrived, the second means it arrived but no
/// longer matches the markup conventions the extractor relies on.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("fetch failed: {context}")]
    Fetch {
        context: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

impl ScrapeError {
    pub(crate) fn parse(msg: impl Into<String>) -> Self {
        ScrapeError::Parse(msg.into())
    }

    pub fn is_parse(&self) -> bool {
        matches!(self, ScrapeError::Parse(_))
    }

    pub fn is_fetch(&self) -> bool {
        matches!(self, ScrapeError::Fetch { .. })
    }
}

pub type Result<T, E = ScrapeError> = std::result::Result<T, E>;
