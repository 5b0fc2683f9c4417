//! Category walker. Follows a paginated listing from its first page to the last,
//! extracting one record per item in document order.
//!
//! There is no cycle detection: a site whose "next" links loop forever is walked forever
//! unless [WalkOptions::max_pages] is set.

use crate::model::Record;
use crate::scraper::client::Fetch;
use crate::scraper::detail::extract_record;
use crate::scraper::error::ScraperError;
use crate::scraper::{parse_selector, WalkOptions, WalkProgress};
use reqwest::Url;
use scraper::Html;
use std::borrow::Cow;

/// Path segment that next-page links are expected to carry. Links without it get it prepended.
pub const PATH_MARKER: &str = "catalogue/";

/// Item links and the optional next page found on one listing page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingPage {
    pub items: Vec<Url>,
    pub next: Option<Url>,
}

/// Resolve a "next" href against the current listing page, prepending [PATH_MARKER] when absent.
pub fn next_page_url(current: &Url, href: &str) -> Result<Url, ScraperError> {
    let normalized: Cow<'_, str> = if href.contains(PATH_MARKER) {
        Cow::Borrowed(href)
    } else {
        Cow::Owned(format!("{}{}", PATH_MARKER, href))
    };
    current
        .join(&normalized)
        .map_err(|e| ScraperError::InvalidLink {
            href: normalized.to_string(),
            url: current.to_string(),
            reason: e.to_string(),
        })
}

/// Parse a listing page: `article.product_pod h3 a` for items, `li.next a` for pagination.
///
/// An `li.next` without a linked `a[href]`, or a link that cannot be resolved against
/// `page_url`, is a parse error.
pub fn parse_listing(html: &[u8], page_url: &Url) -> Result<ListingPage, ScraperError> {
    let text = String::from_utf8_lossy(html);
    let doc = Html::parse_document(&text);
    let pod_sel = parse_selector("article.product_pod")?;
    let link_sel = parse_selector("h3 a[href]")?;
    let next_sel = parse_selector("li.next")?;
    let next_link_sel = parse_selector("a[href]")?;

    let mut items = Vec::new();
    for pod in doc.select(&pod_sel) {
        let href = pod
            .select(&link_sel)
            .next()
            .and_then(|a| a.value().attr("href"))
            .ok_or_else(|| ScraperError::MissingElement {
                element: "item link",
                url: page_url.to_string(),
            })?;
        let item_url = page_url.join(href).map_err(|e| ScraperError::InvalidLink {
            href: href.to_string(),
            url: page_url.to_string(),
            reason: e.to_string(),
        })?;
        items.push(item_url);
    }

    // A "next" control that is present but carries no link is a broken page, not the last one.
    let next = match doc.select(&next_sel).next() {
        Some(control) => {
            let href = control
                .select(&next_link_sel)
                .next()
                .and_then(|a| a.value().attr("href"))
                .ok_or_else(|| ScraperError::MissingElement {
                    element: "next link",
                    url: page_url.to_string(),
                })?;
            Some(next_page_url(page_url, href)?)
        }
        None => None,
    };

    log::debug!(
        "{}: {} items, next page {}",
        page_url,
        items.len(),
        next.as_ref().map(Url::as_str).unwrap_or("none")
    );
    Ok(ListingPage { items, next })
}

/// Walk every listing page starting at `start_url` and return records in traversal order.
///
/// The first fetch or parse failure aborts the walk; records collected so far are dropped.
pub fn walk_category<F: Fetch + ?Sized>(
    fetcher: &mut F,
    start_url: &Url,
    options: &WalkOptions<'_>,
) -> Result<Vec<Record>, ScraperError> {
    let mut records = Vec::new();
    let mut page_url = start_url.clone();
    let mut page = 1u32;

    loop {
        log::info!("Listing page {}: {}", page, page_url);
        let body = fetcher.fetch(&page_url)?;
        let listing = parse_listing(&body, &page_url)?;

        for (i, item_url) in listing.items.iter().enumerate() {
            let detail = fetcher.fetch(item_url)?;
            let record = extract_record(&detail, item_url.as_str())?;
            records.push(record);
            if let Some(progress) = options.progress {
                progress(WalkProgress {
                    page,
                    item: i + 1,
                    collected: records.len(),
                });
            }
        }

        let Some(next) = listing.next else {
            break;
        };
        if options.max_pages.is_some_and(|max| page >= max) {
            log::warn!(
                "Stopping after {} page(s) (max_pages); next page {} not fetched",
                page,
                next
            );
            break;
        }
        page_url = next;
        page += 1;
    }

    Ok(records)
}
