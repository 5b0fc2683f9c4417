//! Canonical data model for scraped catalog items.
//!
//! Both exporters and the walker use this as the single source of truth.

/// Star rating parsed from the `star-rating` class tokens. `Unrated` when no token is recognized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rating {
    Unrated,
    One,
    Two,
    Three,
    Four,
    Five,
}

impl Rating {
    /// Ordinal words in the order they appear on the site, paired with their rating.
    const TOKENS: [(&'static str, Rating); 5] = [
        ("One", Rating::One),
        ("Two", Rating::Two),
        ("Three", Rating::Three),
        ("Four", Rating::Four),
        ("Five", Rating::Five),
    ];

    /// Map one class token to a rating. Case-sensitive prefix match ("Three" and "Threes" both map to 3).
    pub fn from_token(token: &str) -> Option<Rating> {
        Self::TOKENS
            .iter()
            .find(|(word, _)| token.starts_with(word))
            .map(|(_, rating)| *rating)
    }

    /// Scan a whitespace-separated class attribute. The last recognized token wins.
    pub fn from_class_list<'a>(tokens: impl IntoIterator<Item = &'a str>) -> Rating {
        tokens
            .into_iter()
            .filter_map(Rating::from_token)
            .last()
            .unwrap_or(Rating::Unrated)
    }

    pub fn as_u8(self) -> u8 {
        match self {
            Rating::Unrated => 0,
            Rating::One => 1,
            Rating::Two => 2,
            Rating::Three => 3,
            Rating::Four => 4,
            Rating::Five => 5,
        }
    }
}

/// One catalog item as scraped from its detail page.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub title: String,
    /// Non-negative, currency symbol stripped.
    pub price: f64,
    pub rating: Rating,
    pub availability: String,
    /// Absolute URL of the detail page the record was extracted from.
    pub url: String,
}

impl Record {
    /// Column order shared by the CSV and XLSX writers.
    pub const HEADERS: [&'static str; 5] = ["Title", "Price", "Rating", "Availability", "URL"];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_token_matches_prefix_case_sensitive() {
        assert_eq!(Rating::from_token("Three"), Some(Rating::Three));
        assert_eq!(Rating::from_token("Fiveish"), Some(Rating::Five));
        assert_eq!(Rating::from_token("three"), None);
        assert_eq!(Rating::from_token("star-rating"), None);
    }

    #[test]
    fn from_class_list_defaults_to_unrated() {
        assert_eq!(
            Rating::from_class_list(["star-rating"]),
            Rating::Unrated
        );
        assert_eq!(Rating::from_class_list(std::iter::empty()), Rating::Unrated);
    }

    #[test]
    fn from_class_list_last_recognized_token_wins() {
        assert_eq!(
            Rating::from_class_list(["star-rating", "Two", "Four"]),
            Rating::Four
        );
    }

    #[test]
    fn as_u8_covers_zero_to_five() {
        let all = [
            Rating::Unrated,
            Rating::One,
            Rating::Two,
            Rating::Three,
            Rating::Four,
            Rating::Five,
        ];
        let values: Vec<u8> = all.iter().map(|r| r.as_u8()).collect();
        assert_eq!(values, vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn headers_in_export_order() {
        assert_eq!(
            Record::HEADERS,
            ["Title", "Price", "Rating", "Availability", "URL"]
        );
    }
}
