//! Optional config file loading. Search order: ./bookscrape.toml, then
//! $XDG_CONFIG_HOME/bookscrape/config.toml (or ~/.config/bookscrape/config.toml).

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Config file contents. All fields optional; only present keys override defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "snake_case", default, deny_unknown_fields)]
pub struct Config {
    /// Category listing URL to start the walk from.
    pub start_url: Option<String>,
    /// CSV output path. Relative paths are relative to CWD.
    pub csv_path: Option<PathBuf>,
    /// XLSX output path.
    pub xlsx_path: Option<PathBuf>,
    /// HTTP User-Agent header.
    pub user_agent: Option<String>,
    /// Stop after this many listing pages.
    pub max_pages: Option<u32>,
}

/// Search order: (1) ./bookscrape.toml, (2) $XDG_CONFIG_HOME/bookscrape/config.toml.
/// Missing file returns Ok(None). Invalid TOML or I/O error reading a present file returns Err.
pub fn load_config() -> Result<Option<Config>, String> {
    let cwd = std::env::current_dir()
        .map_err(|e| format!("Cannot determine current directory: {}", e))?;
    let mut paths = vec![cwd.join("bookscrape.toml")];
    if let Some(d) = dirs::config_dir() {
        paths.push(d.join("bookscrape").join("config.toml"));
    }
    for path in &paths {
        if path.exists() {
            return load_config_file(path).map(Some);
        }
    }
    Ok(None)
}

fn load_config_file(path: &Path) -> Result<Config, String> {
    let s = std::fs::read_to_string(path)
        .map_err(|e| format!("Cannot read config {}: {}", path.display(), e))?;
    let config: Config =
        toml::from_str(&s).map_err(|e| format!("Invalid config {}: {}", path.display(), e))?;
    log::debug!("loaded config from {}", path.display());
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_empty_config() {
        let c: Config = toml::from_str("").unwrap();
        assert!(c.start_url.is_none());
        assert!(c.csv_path.is_none());
        assert!(c.xlsx_path.is_none());
        assert!(c.user_agent.is_none());
        assert!(c.max_pages.is_none());
    }

    #[test]
    fn parse_full_config() {
        let s = r#"
            start_url = "http://books.toscrape.com/catalogue/category/books/mystery_3/index.html"
            csv_path = "out/mystery.csv"
            xlsx_path = "out/mystery.xlsx"
            user_agent = "Custom/1.0"
            max_pages = 2
        "#;
        let c: Config = toml::from_str(s).unwrap();
        assert_eq!(
            c.start_url.as_deref(),
            Some("http://books.toscrape.com/catalogue/category/books/mystery_3/index.html")
        );
        assert_eq!(c.csv_path.as_deref(), Some(Path::new("out/mystery.csv")));
        assert_eq!(c.xlsx_path.as_deref(), Some(Path::new("out/mystery.xlsx")));
        assert_eq!(c.user_agent.as_deref(), Some("Custom/1.0"));
        assert_eq!(c.max_pages, Some(2));
    }

    #[test]
    fn unknown_key_errors() {
        assert!(toml::from_str::<Config>("retry_count = 3").is_err());
    }

    #[test]
    fn invalid_toml_errors() {
        assert!(toml::from_str::<Config>("csv_path = [").is_err());
    }

    #[test]
    fn load_config_file_reports_path_on_error() {
        let path = std::env::temp_dir().join("bookscrape_test_bad_config.toml");
        std::fs::write(&path, "max_pages = \"many\"").unwrap();
        let err = load_config_file(&path).unwrap_err();
        std::fs::remove_file(&path).ok();
        assert!(err.contains("Invalid config"));
        assert!(err.contains("bookscrape_test_bad_config.toml"));
    }
}
