//! Client configuration for the admin REST API.

use crate::error::{Error, Result};
use crate::util::is_http_url;

/// Environment variable holding the API base URL.
pub const API_URL_ENV: &str = "EXPORTDESK_API_URL";

/// Default base URL for local development.
pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";

/// Normalized base URL for every endpoint the console consumes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    base_url: String,
}

impl ApiConfig {
    /// Builds a config from an explicit base URL.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let base_url = normalize_base_url(base_url.into().as_str())?;
        Ok(Self { base_url })
    }

    /// Resolves the base URL from `EXPORTDESK_API_URL`, falling back to the
    /// local development default.
    pub fn from_env() -> Result<Self> {
        let base_url = std::env::var(API_URL_ENV)
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        Self::new(base_url)
    }

    /// Returns the base URL this config was built with.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Joins a path like `/products` onto the base URL.
    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

fn normalize_base_url(raw: &str) -> Result<String> {
    let base = raw.trim().trim_end_matches('/').to_string();
    if base.is_empty() {
        return Err(Error::Validation("API base URL must not be empty".to_string()));
    }
    if !is_http_url(&base) {
        return Err(Error::Validation(
            "API base URL must include http:// or https://".to_string(),
        ));
    }
    Ok(base)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_rejects_invalid_values() {
        assert!(ApiConfig::new("").is_err());
        assert!(ApiConfig::new("example.com").is_err());
    }

    #[test]
    fn new_trims_trailing_slash() {
        let config = ApiConfig::new("https://api.example.com/").unwrap();
        assert_eq!(config.base_url(), "https://api.example.com");
    }

    #[test]
    fn endpoint_joins_path() {
        let config = ApiConfig::new("http://localhost:5000/api").unwrap();
        assert_eq!(config.endpoint("/products"), "http://localhost:5000/api/products");
    }
}
