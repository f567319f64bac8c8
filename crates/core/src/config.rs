//! Core runtime configuration.
//!
//! This module defines configuration that should be resolved once at process startup and then
//! passed into the client and components. Environment variables are read by the binaries, not
//! during request handling; the helpers here only parse the raw values they hand over.

use crate::constants::{
    DEFAULT_API_BASE_URL, DEFAULT_PAGE_LIMIT, DEFAULT_REQUEST_TIMEOUT, DEFAULT_SEARCH_LIMIT,
    MIN_QUERY_CHARS, SEARCH_DEBOUNCE,
};
use crate::{CatalogError, CatalogResult};
use std::time::Duration;

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    api_base_url: String,
    request_timeout: Duration,
    search_debounce: Duration,
    min_query_chars: usize,
    search_limit: u32,
    page_limit: u32,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// The base URL must be an absolute `http` or `https` URL; a trailing slash is removed.
    /// The request timeout must be non-zero.
    pub fn new(api_base_url: impl AsRef<str>, request_timeout: Duration) -> CatalogResult<Self> {
        let raw = api_base_url.as_ref().trim();
        let parsed = reqwest::Url::parse(raw)
            .map_err(|e| CatalogError::InvalidBaseUrl(format!("{raw}: {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(CatalogError::InvalidBaseUrl(format!(
                "{raw}: scheme must be http or https"
            )));
        }
        if request_timeout.is_zero() {
            return Err(CatalogError::InvalidInput(
                "request timeout must be greater than zero".into(),
            ));
        }

        Ok(Self {
            api_base_url: raw.trim_end_matches('/').to_string(),
            request_timeout,
            search_debounce: SEARCH_DEBOUNCE,
            min_query_chars: MIN_QUERY_CHARS,
            search_limit: DEFAULT_SEARCH_LIMIT,
            page_limit: DEFAULT_PAGE_LIMIT,
        })
    }

    pub fn with_search_debounce(mut self, window: Duration) -> Self {
        self.search_debounce = window;
        self
    }

    pub fn with_min_query_chars(mut self, min_chars: usize) -> Self {
        self.min_query_chars = min_chars;
        self
    }

    pub fn with_page_limit(mut self, limit: u32) -> Self {
        self.page_limit = limit.max(1);
        self
    }

    pub fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    pub fn search_debounce(&self) -> Duration {
        self.search_debounce
    }

    pub fn min_query_chars(&self) -> usize {
        self.min_query_chars
    }

    pub fn search_limit(&self) -> u32 {
        self.search_limit
    }

    pub fn page_limit(&self) -> u32 {
        self.page_limit
    }
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            search_debounce: SEARCH_DEBOUNCE,
            min_query_chars: MIN_QUERY_CHARS,
            search_limit: DEFAULT_SEARCH_LIMIT,
            page_limit: DEFAULT_PAGE_LIMIT,
        }
    }
}

/// Resolve the API base URL from an optional raw value.
///
/// If `value` is `None` or empty/whitespace, returns [`DEFAULT_API_BASE_URL`].
pub fn api_base_url_from_env_value(value: Option<String>) -> String {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string())
}

/// Parse the request timeout (whole seconds) from an optional raw value.
///
/// If `value` is `None` or empty/whitespace, returns [`DEFAULT_REQUEST_TIMEOUT`].
pub fn request_timeout_from_env_value(value: Option<String>) -> CatalogResult<Duration> {
    let value = value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());
    let Some(value) = value else {
        return Ok(DEFAULT_REQUEST_TIMEOUT);
    };

    let secs: u64 = value.parse().map_err(|_| {
        CatalogError::InvalidInput(format!("request timeout must be whole seconds, got {value:?}"))
    })?;
    if secs == 0 {
        return Err(CatalogError::InvalidInput(
            "request timeout must be greater than zero".into(),
        ));
    }
    Ok(Duration::from_secs(secs))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_trims_trailing_slash() {
        let cfg = CoreConfig::new("http://165.22.223.163:8000/", Duration::from_secs(5))
            .expect("valid config");
        assert_eq!(cfg.api_base_url(), "http://165.22.223.163:8000");
        assert_eq!(cfg.min_query_chars(), MIN_QUERY_CHARS);
    }

    #[test]
    fn test_new_rejects_relative_and_non_http_urls() {
        assert!(matches!(
            CoreConfig::new("localhost:8000/api", Duration::from_secs(5)),
            Err(CatalogError::InvalidBaseUrl(_))
        ));
        assert!(matches!(
            CoreConfig::new("ftp://example.org", Duration::from_secs(5)),
            Err(CatalogError::InvalidBaseUrl(msg)) if msg.contains("scheme")
        ));
    }

    #[test]
    fn test_new_rejects_zero_timeout() {
        assert!(matches!(
            CoreConfig::new("http://localhost:8000", Duration::ZERO),
            Err(CatalogError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_request_timeout_from_env_value() {
        assert_eq!(
            request_timeout_from_env_value(None).expect("default"),
            DEFAULT_REQUEST_TIMEOUT
        );
        assert_eq!(
            request_timeout_from_env_value(Some(" 3 ".into())).expect("parsed"),
            Duration::from_secs(3)
        );
        assert!(request_timeout_from_env_value(Some("soon".into())).is_err());
        assert!(request_timeout_from_env_value(Some("0".into())).is_err());
    }

    #[test]
    fn test_api_base_url_from_env_value_defaults_when_blank() {
        assert_eq!(
            api_base_url_from_env_value(Some("  ".into())),
            DEFAULT_API_BASE_URL
        );
        assert_eq!(
            api_base_url_from_env_value(Some("https://api.example.in".into())),
            "https://api.example.in"
        );
    }
}
