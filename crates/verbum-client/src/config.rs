//! Client configuration loaded from environment variables.
//!
//! Every setting has a default so the reader starts with zero
//! configuration against the public verse service.  Without backend
//! credentials, annotations are kept in memory for the session.

use std::str::FromStr;
use std::time::Duration;

use verbum_shared::constants::{DEFAULT_HTTP_TIMEOUT_SECS, DEFAULT_TRANSLATION, DEFAULT_VERSE_API_URL};

/// Which upstream serves chapter text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChapterSourceKind {
    /// Verse service, addressed by book name.
    VerseApi,
    /// Books service, addressed by book abbreviation.
    BooksApi,
}

impl FromStr for ChapterSourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "verse-api" => Ok(Self::VerseApi),
            "books-api" => Ok(Self::BooksApi),
            other => Err(format!("unknown chapter source: {other}")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend project URL.
    /// Env: `VERBUM_BACKEND_URL`
    pub backend_url: Option<String>,

    /// Backend public API key.
    /// Env: `VERBUM_BACKEND_ANON_KEY`
    pub backend_anon_key: Option<String>,

    /// Env: `VERBUM_VERSE_API_URL`
    /// Default: `https://bible-api.com`
    pub verse_api_url: String,

    /// Books service; when set, the catalog is fetched from it.
    /// Env: `VERBUM_BOOKS_API_URL`
    pub books_api_url: Option<String>,

    /// Env: `VERBUM_CHAPTER_SOURCE` (`verse-api` / `books-api`)
    /// Default: `verse-api`
    pub chapter_source: ChapterSourceKind,

    /// Env: `VERBUM_TRANSLATION`
    /// Default: `kjv`
    pub translation: String,

    /// Env: `VERBUM_HTTP_TIMEOUT_SECS`
    /// Default: 15
    pub http_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            backend_url: None,
            backend_anon_key: None,
            verse_api_url: DEFAULT_VERSE_API_URL.to_string(),
            books_api_url: None,
            chapter_source: ChapterSourceKind::VerseApi,
            translation: DEFAULT_TRANSLATION.to_string(),
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        config.backend_url = var("VERBUM_BACKEND_URL");
        config.backend_anon_key = var("VERBUM_BACKEND_ANON_KEY");

        if let Some(url) = var("VERBUM_VERSE_API_URL") {
            config.verse_api_url = url;
        }

        config.books_api_url = var("VERBUM_BOOKS_API_URL");

        if let Some(val) = var("VERBUM_CHAPTER_SOURCE") {
            match val.parse::<ChapterSourceKind>() {
                Ok(kind) => config.chapter_source = kind,
                Err(e) => tracing::warn!(error = %e, "Invalid VERBUM_CHAPTER_SOURCE, using default"),
            }
        }

        if config.chapter_source == ChapterSourceKind::BooksApi && config.books_api_url.is_none() {
            tracing::warn!("VERBUM_CHAPTER_SOURCE=books-api needs VERBUM_BOOKS_API_URL, using verse-api");
            config.chapter_source = ChapterSourceKind::VerseApi;
        }

        if let Some(code) = var("VERBUM_TRANSLATION") {
            config.translation = code.to_ascii_lowercase();
        }

        if let Some(val) = var("VERBUM_HTTP_TIMEOUT_SECS") {
            match val.parse::<u64>() {
                Ok(secs) if secs > 0 => config.http_timeout = Duration::from_secs(secs),
                _ => tracing::warn!(value = %val, "Invalid VERBUM_HTTP_TIMEOUT_SECS, using default"),
            }
        }

        // RUST_LOG is read by the tracing EnvFilter directly.

        config
    }

    /// Backend URL and key, when both are configured.
    pub fn backend(&self) -> Option<(&str, &str)> {
        match (&self.backend_url, &self.backend_anon_key) {
            (Some(url), Some(key)) => Some((url.as_str(), key.as_str())),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = ClientConfig::from_lookup(lookup(&[]));
        assert_eq!(config.verse_api_url, "https://bible-api.com");
        assert_eq!(config.translation, "kjv");
        assert_eq!(config.chapter_source, ChapterSourceKind::VerseApi);
        assert_eq!(config.http_timeout, Duration::from_secs(15));
        assert!(config.backend().is_none());
    }

    #[test]
    fn test_full_config() {
        let config = ClientConfig::from_lookup(lookup(&[
            ("VERBUM_BACKEND_URL", "https://db.example"),
            ("VERBUM_BACKEND_ANON_KEY", "anon"),
            ("VERBUM_BOOKS_API_URL", "https://books.example/api"),
            ("VERBUM_CHAPTER_SOURCE", "books-api"),
            ("VERBUM_TRANSLATION", "WEB"),
            ("VERBUM_HTTP_TIMEOUT_SECS", "30"),
        ]));
        assert_eq!(config.backend(), Some(("https://db.example", "anon")));
        assert_eq!(config.chapter_source, ChapterSourceKind::BooksApi);
        assert_eq!(config.translation, "web");
        assert_eq!(config.http_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = ClientConfig::from_lookup(lookup(&[
            ("VERBUM_CHAPTER_SOURCE", "scrolls"),
            ("VERBUM_HTTP_TIMEOUT_SECS", "0"),
            ("VERBUM_BACKEND_URL", "https://db.example"),
        ]));
        assert_eq!(config.chapter_source, ChapterSourceKind::VerseApi);
        assert_eq!(config.http_timeout, Duration::from_secs(15));
        // Half-configured backend counts as none.
        assert!(config.backend().is_none());
    }

    #[test]
    fn test_books_source_requires_books_url() {
        let config = ClientConfig::from_lookup(lookup(&[("VERBUM_CHAPTER_SOURCE", "books-api")]));
        assert_eq!(config.chapter_source, ChapterSourceKind::VerseApi);
    }
}
