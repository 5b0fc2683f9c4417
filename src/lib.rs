//! bookscrape: CLI scraper for books.toscrape.com categories, outputting CSV and XLSX.

pub mod cli;
pub mod config;
pub mod formats;
pub mod model;
pub mod scraper;
pub mod xlsx;

// Re-exports for CLI and consumers.
pub use formats::{write_csv, ExportError};
pub use model::{Rating, Record};
pub use scraper::{
    extract_record, walk_category, Fetch, HttpClient, HttpClientBuilder, ScraperError,
    WalkOptions, WalkProgress,
};
pub use xlsx::write_xlsx;
