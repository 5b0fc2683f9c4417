//! CLI parsing and orchestration. Parses args, walks the category, writes CSV and XLSX. Maps errors to exit codes.

use crate::config::{self, Config};
use crate::formats::{write_csv, ExportError};
use crate::scraper::{
    parse_start_url, walk_category, HttpClient, ScraperError, WalkOptions, WalkProgress,
    DEFAULT_START_URL,
};
use crate::xlsx::write_xlsx;
use clap::Parser;
use reqwest::Url;
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

const DEFAULT_CSV_PATH: &str = "books.csv";
const DEFAULT_XLSX_PATH: &str = "books.xlsx";

/// CLI error carrying exit code and message.
#[derive(Debug, Error)]
pub enum CliRunError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("{0}")]
    Scraper(#[from] ScraperError),

    #[error("{0}")]
    Export(#[from] ExportError),
}

impl CliRunError {
    pub fn exit_code(&self) -> i32 {
        match self {
            CliRunError::InvalidInput(_) => 1,
            CliRunError::Scraper(_) => 2,
            CliRunError::Export(_) => 3,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "bookscrape")]
#[command(about = "Scrape a books.toscrape.com category and write CSV and XLSX")]
#[command(
    after_help = "Config file keys (start_url, csv_path, xlsx_path, user_agent, max_pages) are read from ./bookscrape.toml or the user config dir. CLI flags override config."
)]
pub struct Args {
    /// Category listing URL. Default: the Travel category.
    pub url: Option<String>,

    /// CSV output path. Default: ./books.csv
    #[arg(long)]
    pub csv: Option<PathBuf>,

    /// XLSX output path. Default: ./books.xlsx
    #[arg(long)]
    pub xlsx: Option<PathBuf>,

    /// HTTP User-Agent (overrides config).
    #[arg(long)]
    pub user_agent: Option<String>,

    /// Stop after this many listing pages (default: follow "next" until it disappears).
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub max_pages: Option<u32>,

    /// Suppress progress output (errors only).
    #[arg(short, long)]
    pub quiet: bool,

    /// Print verbose error chain.
    #[arg(long)]
    pub verbose: bool,
}

/// Effective settings after merging CLI flags, config file, and defaults.
#[derive(Debug, Clone, PartialEq)]
struct Settings {
    start_url: Url,
    csv_path: PathBuf,
    xlsx_path: PathBuf,
    user_agent: Option<String>,
    max_pages: Option<u32>,
}

/// CLI flags override config; config overrides defaults.
fn resolve_settings(args: &Args, config: Option<&Config>) -> Result<Settings, CliRunError> {
    let url_input = args
        .url
        .clone()
        .or_else(|| config.and_then(|c| c.start_url.clone()))
        .unwrap_or_else(|| DEFAULT_START_URL.to_string());
    let start_url = parse_start_url(&url_input).map_err(|e| {
        CliRunError::InvalidInput(format!(
            "Expected a category URL, e.g. {}. {}",
            DEFAULT_START_URL, e
        ))
    })?;
    let csv_path = args
        .csv
        .clone()
        .or_else(|| config.and_then(|c| c.csv_path.clone()))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CSV_PATH));
    let xlsx_path = args
        .xlsx
        .clone()
        .or_else(|| config.and_then(|c| c.xlsx_path.clone()))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_XLSX_PATH));
    let user_agent = args
        .user_agent
        .clone()
        .or_else(|| config.and_then(|c| c.user_agent.clone()));
    let max_pages = args.max_pages.or_else(|| config.and_then(|c| c.max_pages));
    Ok(Settings {
        start_url,
        csv_path,
        xlsx_path,
        user_agent,
        max_pages,
    })
}

/// Ensure output path parent exists.
fn validate_output_path(path: &Path) -> Result<(), CliRunError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            return Err(CliRunError::InvalidInput(format!(
                "Cannot write output: {}: parent directory does not exist.",
                path.display()
            )));
        }
    }
    Ok(())
}

fn spinner() -> indicatif::ProgressBar {
    let bar = indicatif::ProgressBar::new_spinner();
    let style = indicatif::ProgressStyle::default_spinner()
        .template("{spinner} {msg} ({elapsed})")
        .map(|s| s.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ "))
        .unwrap_or_else(|_| indicatif::ProgressStyle::default_spinner());
    bar.set_style(style);
    bar.enable_steady_tick(Duration::from_millis(80));
    bar
}

/// Entry point for the CLI. Returns Ok(()) on success; Err with exit code and message on failure.
pub fn run(args: &Args) -> Result<(), CliRunError> {
    let config = config::load_config().map_err(CliRunError::InvalidInput)?;
    let settings = resolve_settings(args, config.as_ref())?;

    validate_output_path(&settings.csv_path)?;
    validate_output_path(&settings.xlsx_path)?;

    let mut builder = HttpClient::builder();
    if let Some(ref ua) = settings.user_agent {
        builder = builder.user_agent(ua.clone());
    }
    let mut client = builder
        .build()
        .map_err(|e| CliRunError::InvalidInput(format!("Failed to create HTTP client: {}", e)))?;

    if !args.quiet {
        println!("Scraping books from {}...", settings.start_url);
    }

    let progress_state: RefCell<Option<indicatif::ProgressBar>> = RefCell::new(None);
    let progress_cb = |p: WalkProgress| {
        let mut state = progress_state.borrow_mut();
        let bar = state.get_or_insert_with(spinner);
        bar.set_message(format!(
            "Page {}, item {} ({} books so far)",
            p.page, p.item, p.collected
        ));
    };
    let progress: Option<&dyn Fn(WalkProgress)> = if args.quiet { None } else { Some(&progress_cb) };
    let options = WalkOptions {
        progress,
        max_pages: settings.max_pages,
    };

    let result = walk_category(&mut client, &settings.start_url, &options);
    if let Some(bar) = progress_state.borrow_mut().take() {
        bar.disable_steady_tick();
        bar.finish_and_clear();
    }
    let records = result?;

    if !args.quiet {
        println!("Saving to CSV: {}", settings.csv_path.display());
    }
    write_csv(&records, &settings.csv_path)?;

    if !args.quiet {
        println!("Saving to spreadsheet: {}", settings.xlsx_path.display());
    }
    write_xlsx(&records, &settings.xlsx_path)?;

    if !args.quiet {
        println!("Done! Scraped {} books.", records.len());
    }
    log::info!(
        "wrote {} records to {} and {}",
        records.len(),
        settings.csv_path.display(),
        settings.xlsx_path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(argv: &[&str]) -> Args {
        Args::parse_from(std::iter::once("bookscrape").chain(argv.iter().copied()))
    }

    #[test]
    fn defaults_reproduce_hardcoded_run() -> Result<(), CliRunError> {
        let s = resolve_settings(&args(&[]), None)?;
        assert_eq!(s.start_url.as_str(), DEFAULT_START_URL);
        assert_eq!(s.csv_path, PathBuf::from("books.csv"));
        assert_eq!(s.xlsx_path, PathBuf::from("books.xlsx"));
        assert!(s.user_agent.is_none());
        assert!(s.max_pages.is_none());
        Ok(())
    }

    #[test]
    fn config_overrides_defaults_and_flags_override_config() -> Result<(), CliRunError> {
        let config = Config {
            start_url: Some(
                "http://books.toscrape.com/catalogue/category/books/poetry_23/index.html"
                    .to_string(),
            ),
            csv_path: Some(PathBuf::from("poetry.csv")),
            xlsx_path: Some(PathBuf::from("poetry.xlsx")),
            user_agent: Some("FromConfig/1.0".to_string()),
            max_pages: Some(3),
        };
        let s = resolve_settings(&args(&[]), Some(&config))?;
        assert!(s.start_url.as_str().contains("poetry_23"));
        assert_eq!(s.csv_path, PathBuf::from("poetry.csv"));
        assert_eq!(s.max_pages, Some(3));

        let s = resolve_settings(
            &args(&[
                "http://books.toscrape.com/index.html",
                "--csv",
                "cli.csv",
                "--user-agent",
                "FromCli/2.0",
                "--max-pages",
                "1",
            ]),
            Some(&config),
        )?;
        assert_eq!(s.start_url.as_str(), "http://books.toscrape.com/index.html");
        assert_eq!(s.csv_path, PathBuf::from("cli.csv"));
        assert_eq!(s.xlsx_path, PathBuf::from("poetry.xlsx"));
        assert_eq!(s.user_agent.as_deref(), Some("FromCli/2.0"));
        assert_eq!(s.max_pages, Some(1));
        Ok(())
    }

    #[test]
    fn invalid_start_url_is_invalid_input() {
        let result = resolve_settings(&args(&["not a url"]), None);
        match result {
            Err(e @ CliRunError::InvalidInput(_)) => assert_eq!(e.exit_code(), 1),
            other => panic!("expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn max_pages_zero_rejected_by_parser() {
        let result = Args::try_parse_from(["bookscrape", "--max-pages", "0"]);
        assert!(result.is_err());
    }

    #[test]
    fn validate_output_path_parent_exists() {
        let path = std::env::temp_dir().join("bookscrape_cli_test_output.csv");
        assert!(validate_output_path(&path).is_ok());
        assert!(validate_output_path(Path::new("books.csv")).is_ok());
    }

    #[test]
    fn validate_output_path_parent_missing() {
        let path = PathBuf::from("/nonexistent_dir_bookscrape_xyz/books.csv");
        let result = validate_output_path(&path);
        assert!(result.is_err());
        if let Err(CliRunError::InvalidInput(msg)) = result {
            assert!(msg.contains("parent directory does not exist"));
        }
    }

    #[test]
    fn cli_run_error_exit_codes() {
        assert_eq!(CliRunError::InvalidInput("x".into()).exit_code(), 1);
        assert_eq!(
            CliRunError::Scraper(ScraperError::HttpStatus {
                status: 500,
                url: "http://x/".into()
            })
            .exit_code(),
            2
        );
        assert_eq!(
            CliRunError::Export(ExportError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                "disk full"
            )))
            .exit_code(),
            3
        );
    }
}
