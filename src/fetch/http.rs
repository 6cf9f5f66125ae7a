// src/fetch/http.rs

use reqwest::blocking::{Client, RequestBuilder};
use std::time::Duration;
use tracing::{debug, instrument};
use url::Url;

use super::Source;
use crate::error::{Result, ScrapeError};

/// Blocking HTTP implementation of [`Source`].
///
/// The underlying client pools connections and is cheap to share between the
/// worker threads.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: Client,
    base: Url,
}

impl HttpSource {
    pub fn new(base: Url, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .cookie_store(true)
            .user_agent(concat!("statscraper/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|source| ScrapeError::Fetch {
                context: "building HTTP client".to_string(),
                source,
            })?;
        Ok(Self { client, base })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    fn send_text(&self, req: RequestBuilder, what: &str) -> Result<String> {
        let wrap = |source| ScrapeError::Fetch {
            context: format!("{} from {}", what, self.base),
            source,
        };
        req.send()
            .map_err(wrap)?
            .error_for_status()
            .map_err(wrap)?
            .text()
            .map_err(wrap)
    }
}

impl Source for HttpSource {
    #[instrument(level = "debug", skip(self))]
    fn fetch_dates(&self, faculty: &str) -> Result<String> {
        debug!(url = %self.base, "GET date list");
        let req = self
            .client
            .get(self.base.clone())
            .query(&[("fakulta", faculty)]);
        self.send_text(req, "date list")
    }

    #[instrument(level = "debug", skip(self))]
    fn fetch_snapshot(&self, faculty: &str, date_token: &str) -> Result<String> {
        debug!(url = %self.base, "POST snapshot");
        let form = [
            ("fakulta", faculty),
            ("datv", date_token),
            ("tabv", "1"),
            ("zobraz", "Zobrazit"),
        ];
        let req = self
            .client
            .post(self.base.clone())
            .query(&[("fakulta", faculty)])
            .form(&form[..]);
        self.send_text(req, "snapshot")
    }
}
