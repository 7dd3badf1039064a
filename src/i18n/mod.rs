//! Translation tables and daily quotes
//!
//! Two read-only data-file collaborators: a nested string table looked up by
//! dotted keys, and a quote collection with a deterministic per-day pick.
//! Both load once from JSON; a missing or unreadable quote file degrades to a
//! single built-in quote rather than failing the caller.

use chrono::{Datelike, NaiveDate};
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Shown whenever a quote collection cannot be loaded
pub const DEFAULT_QUOTE: &str = "You don't have to struggle in silence";

/// Errors raised while loading i18n data files
#[derive(Error, Debug)]
pub enum I18nError {
    #[error("Failed to read {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

pub type I18nResult<T> = Result<T, I18nError>;

/// A nested translation table, looked up by dotted key
///
/// The backing file is arbitrary-depth JSON with string leaves, e.g.
/// `{"navbar": {"about": "About Us"}}` answers `get("navbar.about")`.
#[derive(Debug, Clone)]
pub struct Translations {
    table: Value,
}

impl Translations {
    pub fn load(path: &Path) -> I18nResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| I18nError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let table: Value = serde_json::from_str(&content).map_err(|e| I18nError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Ok(Self { table })
    }

    /// Build from an already-parsed table (tests, embedded defaults)
    pub fn from_value(table: Value) -> Self {
        Self { table }
    }

    /// Resolve a dotted key to its leaf string
    ///
    /// Any missing segment or non-string leaf yields `None`; partial paths
    /// never panic.
    pub fn get(&self, key: &str) -> Option<&str> {
        let mut node = &self.table;
        for segment in key.split('.') {
            node = node.get(segment)?;
        }
        node.as_str()
    }

    /// Resolve a dotted key, falling back to `default`
    pub fn get_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        match self.get(key) {
            Some(text) => text,
            None => {
                tracing::warn!("Translation key not found: {}", key);
                default
            }
        }
    }
}

/// Per-language quote collections
///
/// Loads either a flat JSON array (a single unnamed language) or an object
/// mapping language codes to arrays. Unknown languages fall back to English,
/// then to [`DEFAULT_QUOTE`].
#[derive(Debug, Clone)]
pub struct QuoteBook {
    languages: HashMap<String, Vec<String>>,
}

impl QuoteBook {
    /// Load from disk; a missing or corrupt file yields an empty book
    /// (every lookup then answers the default quote)
    pub fn load(path: &Path) -> Self {
        match Self::try_load(path) {
            Ok(book) => book,
            Err(e) => {
                tracing::warn!("Falling back to the default quote: {}", e);
                Self {
                    languages: HashMap::new(),
                }
            }
        }
    }

    fn try_load(path: &Path) -> I18nResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| I18nError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let value: Value = serde_json::from_str(&content).map_err(|e| I18nError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let mut languages = HashMap::new();
        match value {
            Value::Array(items) => {
                languages.insert("en".to_string(), string_items(&items));
            }
            Value::Object(map) => {
                for (lang, items) in map {
                    if let Value::Array(items) = items {
                        languages.insert(lang, string_items(&items));
                    }
                }
            }
            _ => {
                return Err(I18nError::Parse {
                    path: path.to_path_buf(),
                    error: "expected a quote array or language map".to_string(),
                })
            }
        }

        Ok(Self { languages })
    }

    fn quotes_for(&self, lang: &str) -> Option<&Vec<String>> {
        self.languages
            .get(lang)
            .or_else(|| self.languages.get("en"))
            .filter(|quotes| !quotes.is_empty())
    }

    /// The quote for a given local day; same day, same quote
    pub fn quote_of_day(&self, lang: &str, today: NaiveDate) -> &str {
        match self.quotes_for(lang) {
            Some(quotes) => {
                let index = today.ordinal0() as usize % quotes.len();
                &quotes[index]
            }
            None => DEFAULT_QUOTE,
        }
    }
}

fn string_items(items: &[Value]) -> Vec<String> {
    items
        .iter()
        .filter_map(|v| v.as_str().map(str::to_string))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_json(value: &Value) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{value}").unwrap();
        file
    }

    #[test]
    fn test_dotted_lookup() {
        let table = Translations::from_value(json!({
            "navbar": { "about": "About Us", "nested": { "deep": "Here" } },
            "motto": "Welcome"
        }));

        assert_eq!(table.get("navbar.about"), Some("About Us"));
        assert_eq!(table.get("navbar.nested.deep"), Some("Here"));
        assert_eq!(table.get("motto"), Some("Welcome"));
        assert_eq!(table.get("navbar.missing"), None);
        assert_eq!(table.get("navbar"), None); // non-string leaf
        assert_eq!(table.get_or("navbar.missing", "fallback"), "fallback");
    }

    #[test]
    fn test_translations_load_and_parse_errors() {
        let file = write_json(&json!({ "a": { "b": "c" } }));
        let table = Translations::load(file.path()).unwrap();
        assert_eq!(table.get("a.b"), Some("c"));

        let mut bad = NamedTempFile::new().unwrap();
        write!(bad, "not json").unwrap();
        assert!(matches!(
            Translations::load(bad.path()),
            Err(I18nError::Parse { .. })
        ));

        assert!(matches!(
            Translations::load(Path::new("/no/such/file.json")),
            Err(I18nError::Io { .. })
        ));
    }

    #[test]
    fn test_quote_of_day_is_deterministic() {
        let file = write_json(&json!(["one", "two", "three"]));
        let book = QuoteBook::load(file.path());

        let day = NaiveDate::from_ymd_opt(2025, 1, 2).unwrap();
        let first = book.quote_of_day("en", day).to_string();
        assert_eq!(book.quote_of_day("en", day), first);

        // Jan 1 and Jan 2 hit consecutive slots
        let jan1 = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        assert_eq!(book.quote_of_day("en", jan1), "one");
        assert_eq!(book.quote_of_day("en", day), "two");
    }

    #[test]
    fn test_language_map_with_english_fallback() {
        let file = write_json(&json!({
            "en": ["hello"],
            "hi": ["namaste"]
        }));
        let book = QuoteBook::load(file.path());
        let day = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();

        assert_eq!(book.quote_of_day("hi", day), "namaste");
        assert_eq!(book.quote_of_day("te", day), "hello"); // unknown → en
    }

    #[test]
    fn test_missing_file_yields_default_quote() {
        let book = QuoteBook::load(Path::new("/no/such/quotes.json"));
        let day = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        assert_eq!(book.quote_of_day("en", day), DEFAULT_QUOTE);
    }
}
