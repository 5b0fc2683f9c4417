//! Shared error type for fetching and parsing catalog pages.

use thiserror::Error;

/// Scraper error for URL handling, HTTP, and page parsing. Any variant aborts the walk.
#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("Invalid URL: {input}: {reason}")]
    InvalidUrl { input: String, reason: String },

    // Fetch failures
    #[error("Network error: could not reach {url}: {source}")]
    Network { url: String, source: reqwest::Error },

    #[error("HTTP {status} when fetching: {url}")]
    HttpStatus { status: u16, url: String },

    #[error("Failed to read response body from {url}: {source}")]
    BodyRead { url: String, source: reqwest::Error },

    // Parse failures
    #[error("Could not parse {url}: missing {element}")]
    MissingElement { element: &'static str, url: String },

    #[error("Could not parse price {text:?} at {url}")]
    InvalidPrice { text: String, url: String },

    #[error("Could not resolve link {href:?} on {url}: {reason}")]
    InvalidLink {
        href: String,
        url: String,
        reason: String,
    },

    #[error("Invalid selector {selector:?}: {reason}")]
    Selector { selector: String, reason: String },
}

impl ScraperError {
    /// Transport failure, non-success status, or unreadable body.
    pub fn is_fetch(&self) -> bool {
        matches!(
            self,
            ScraperError::Network { .. }
                | ScraperError::HttpStatus { .. }
                | ScraperError::BodyRead { .. }
        )
    }

    /// A required page element is absent or malformed.
    pub fn is_parse(&self) -> bool {
        matches!(
            self,
            ScraperError::MissingElement { .. }
                | ScraperError::InvalidPrice { .. }
                | ScraperError::InvalidLink { .. }
        )
    }

    /// The page URL this error refers to, if any.
    pub fn url(&self) -> Option<&str> {
        match self {
            ScraperError::InvalidUrl { input, .. } => Some(input),
            ScraperError::Network { url, .. }
            | ScraperError::HttpStatus { url, .. }
            | ScraperError::BodyRead { url, .. }
            | ScraperError::MissingElement { url, .. }
            | ScraperError::InvalidPrice { url, .. }
            | ScraperError::InvalidLink { url, .. } => Some(url),
            ScraperError::Selector { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_status_is_fetch_and_carries_url() {
        let e = ScraperError::HttpStatus {
            status: 404,
            url: "http://books.toscrape.com/missing.html".to_string(),
        };
        assert!(e.is_fetch());
        assert!(!e.is_parse());
        assert_eq!(e.url(), Some("http://books.toscrape.com/missing.html"));
        assert_eq!(
            e.to_string(),
            "HTTP 404 when fetching: http://books.toscrape.com/missing.html"
        );
    }

    #[test]
    fn missing_element_is_parse() {
        let e = ScraperError::MissingElement {
            element: "title",
            url: "http://x/".to_string(),
        };
        assert!(e.is_parse());
        assert!(!e.is_fetch());
        assert!(e.to_string().contains("missing title"));
    }

    #[test]
    fn invalid_link_is_parse_and_names_page() {
        let e = ScraperError::InvalidLink {
            href: "http://[oops/".to_string(),
            url: "http://books.toscrape.com/index.html".to_string(),
            reason: "invalid IPv6 address".to_string(),
        };
        assert!(e.is_parse());
        assert!(!e.is_fetch());
        assert_eq!(e.url(), Some("http://books.toscrape.com/index.html"));
        assert!(e.to_string().contains("\"http://[oops/\""));
    }
}
