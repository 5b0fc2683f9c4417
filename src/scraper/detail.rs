//! Detail page extractor. One book page in, one [Record] out.

use crate::model::{Rating, Record};
use crate::scraper::error::ScraperError;
use crate::scraper::parse_selector;
use scraper::{ElementRef, Html};

/// The site prints prices as `£51.77`. A body decoded as Latin-1 shows the glyph as `Â£`.
const CURRENCY_SYMBOL: char = '£';
const MOJIBAKE_LEAD: char = 'Â';

/// Parse a detail page into a record.
///
/// Title, price, and availability are required; a missing rating element yields
/// [Rating::Unrated]. The title is the heading text as written; a heading that is empty or
/// whitespace-only counts as missing. Availability is trimmed. `url` is stored as given.
pub fn extract_record(html: &[u8], url: &str) -> Result<Record, ScraperError> {
    let text = String::from_utf8_lossy(html);
    let doc = Html::parse_document(&text);

    let title_sel = parse_selector("h1")?;
    let price_sel = parse_selector("p.price_color")?;
    let rating_sel = parse_selector("p.star-rating")?;
    let availability_sel = parse_selector("p.instock.availability")?;

    let title = doc
        .select(&title_sel)
        .next()
        .map(|e| e.text().collect::<String>())
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| missing("title", url))?;

    let price_text = doc
        .select(&price_sel)
        .next()
        .map(element_text)
        .ok_or_else(|| missing("price", url))?;
    let price = parse_price(&price_text).ok_or_else(|| ScraperError::InvalidPrice {
        text: price_text.clone(),
        url: url.to_string(),
    })?;

    let rating = doc
        .select(&rating_sel)
        .next()
        .map(|e| Rating::from_class_list(e.value().classes()))
        .unwrap_or(Rating::Unrated);

    let availability = doc
        .select(&availability_sel)
        .next()
        .map(element_text)
        .ok_or_else(|| missing("availability", url))?;

    Ok(Record {
        title,
        price,
        rating,
        availability,
        url: url.to_string(),
    })
}

fn element_text(e: ElementRef<'_>) -> String {
    e.text().collect::<String>().trim().to_string()
}

fn missing(element: &'static str, url: &str) -> ScraperError {
    ScraperError::MissingElement {
        element,
        url: url.to_string(),
    }
}

/// Strip the currency prefix and parse. None unless the result is a finite, non-negative number.
pub(crate) fn parse_price(text: &str) -> Option<f64> {
    let t = text.trim();
    let t = t.strip_prefix(MOJIBAKE_LEAD).unwrap_or(t);
    let t = t.strip_prefix(CURRENCY_SYMBOL).unwrap_or(t);
    let value: f64 = t.trim().parse().ok()?;
    (value.is_finite() && value >= 0.0).then_some(value)
}
