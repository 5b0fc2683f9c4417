//! Blocking HTTP fetcher. One GET per call, no retries, no request timeout.

use super::error::ScraperError;
use reqwest::Url;
use std::time::Duration;

const DEFAULT_USER_AGENT: &str = concat!("bookscrape/", env!("CARGO_PKG_VERSION"));
const MAX_REDIRECTS: usize = 10;

/// Source of raw page bytes. The walker only talks to pages through this.
pub trait Fetch {
    fn fetch(&mut self, url: &Url) -> Result<Vec<u8>, ScraperError>;
}

/// Blocking HTTP client. Succeeds only on a 2xx status.
#[derive(Debug)]
pub struct HttpClient {
    inner: reqwest::blocking::Client,
}

impl HttpClient {
    /// Build a client with the default User-Agent.
    pub fn new() -> Result<Self, reqwest::Error> {
        Self::builder().build()
    }

    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }
}

impl Fetch for HttpClient {
    fn fetch(&mut self, url: &Url) -> Result<Vec<u8>, ScraperError> {
        let response =
            self.inner
                .get(url.clone())
                .send()
                .map_err(|e| ScraperError::Network {
                    url: url.to_string(),
                    source: e,
                })?;
        let status = response.status();
        if !status.is_success() {
            return Err(ScraperError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        let body = response.bytes().map_err(|e| ScraperError::BodyRead {
            url: url.to_string(),
            source: e,
        })?;
        log::debug!("fetched {} ({} bytes)", url, body.len());
        Ok(body.to_vec())
    }
}

/// Builder for HttpClient with an optional User-Agent.
#[derive(Debug, Default)]
pub struct HttpClientBuilder {
    user_agent: Option<String>,
}

impl HttpClientBuilder {
    /// Set a custom User-Agent. If not set, `bookscrape/<version>` is used.
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    pub fn build(self) -> Result<HttpClient, reqwest::Error> {
        let user_agent = self
            .user_agent
            .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string());
        let inner = reqwest::blocking::Client::builder()
            .user_agent(user_agent)
            .timeout(None::<Duration>)
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .build()?;
        Ok(HttpClient { inner })
    }
}
