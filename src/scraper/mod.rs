//! Page fetching and scraping: HTTP client, detail page extractor, and category walker.

mod client;
mod error;

pub mod category;
pub mod detail;

pub use category::{next_page_url, parse_listing, walk_category, ListingPage, PATH_MARKER};
pub use client::{Fetch, HttpClient, HttpClientBuilder};
pub use detail::extract_record;
pub use error::ScraperError;

use reqwest::Url;
use scraper::Selector;

/// Default category: the Travel listing on books.toscrape.com.
pub const DEFAULT_START_URL: &str =
    "http://books.toscrape.com/catalogue/category/books/travel_2/index.html";

/// Parse a CSS selector or return an error (avoids panics from Selector::parse).
pub(crate) fn parse_selector(sel: &str) -> Result<Selector, ScraperError> {
    Selector::parse(sel).map_err(|e| ScraperError::Selector {
        selector: sel.to_string(),
        reason: e.to_string(),
    })
}

/// Parse a start URL given on the command line or in config.
pub fn parse_start_url(input: &str) -> Result<Url, ScraperError> {
    let url = Url::parse(input.trim()).map_err(|e| ScraperError::InvalidUrl {
        input: input.to_string(),
        reason: e.to_string(),
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ScraperError::InvalidUrl {
            input: input.to_string(),
            reason: format!("unsupported scheme '{}'", other),
        }),
    }
}

/// Progress after each extracted record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WalkProgress {
    /// 1-based listing page number.
    pub page: u32,
    /// 1-based item position within the page.
    pub item: usize,
    /// Records collected so far, across all pages.
    pub collected: usize,
}

/// Options for a category walk: progress callback and an optional page limit.
#[derive(Default)]
pub struct WalkOptions<'a> {
    pub progress: Option<&'a dyn Fn(WalkProgress)>,
    /// Stop after this many listing pages. None walks until there is no "next" link.
    pub max_pages: Option<u32>,
}
