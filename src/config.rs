//! Run-level configuration for the rate service connection.
//!
//! Values come from CLI flags first, then from the environment (`.env` is
//! loaded via `dotenvy`). The result is immutable and passed explicitly to the
//! transport; nothing here is process-global.

use std::fmt;

use crate::error::AppError;

pub const BASE_URL_ENV: &str = "RATES_API_URL";
pub const TOKEN_ENV: &str = "RATES_API_TOKEN";

/// Default bound on concurrently running rate-group tasks.
pub const DEFAULT_WORKERS: usize = 10;

/// Where and how to reach the rate service.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiConfig {
    base_url: String,
    token: String,
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Result<Self, AppError> {
        let base_url = base_url.into().trim().trim_end_matches('/').to_string();
        let token = token.into().trim().to_string();

        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(AppError::new(
                2,
                format!("Invalid API base URL '{base_url}': expected an http:// or https:// address."),
            ));
        }
        if token.is_empty() {
            return Err(AppError::new(2, "API token is empty."));
        }

        // Accept tokens pasted together with their scheme.
        let token = token
            .strip_prefix("Bearer ")
            .map(str::trim)
            .unwrap_or(token.as_str())
            .to_string();

        Ok(Self { base_url, token })
    }

    /// Resolve from explicit values, falling back to the environment.
    pub fn resolve(base_url: Option<String>, token: Option<String>) -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let base_url = base_url
            .or_else(|| std::env::var(BASE_URL_ENV).ok())
            .ok_or_else(|| {
                AppError::new(
                    2,
                    format!("Missing API base URL: pass --base-url or set {BASE_URL_ENV} (.env)."),
                )
            })?;
        let token = token
            .or_else(|| std::env::var(TOKEN_ENV).ok())
            .ok_or_else(|| {
                AppError::new(2, format!("Missing API token: pass --token or set {TOKEN_ENV} (.env)."))
            })?;

        Self::new(base_url, token)
    }

    /// Base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

impl fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiConfig")
            .field("base_url", &self.base_url)
            .field("token", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_trailing_slash_and_joins_paths() {
        let cfg = ApiConfig::new("http://localhost:8081/", "abc").unwrap();
        assert_eq!(cfg.base_url(), "http://localhost:8081");
        assert_eq!(cfg.url("/charge-templates"), "http://localhost:8081/charge-templates");
        assert_eq!(cfg.url("customer-rate-record"), "http://localhost:8081/customer-rate-record");
    }

    #[test]
    fn strips_bearer_prefix() {
        let cfg = ApiConfig::new("https://api.example.com", "Bearer xyz").unwrap();
        assert_eq!(cfg.token(), "xyz");
    }

    #[test]
    fn rejects_bad_values() {
        assert_eq!(ApiConfig::new("localhost:8081", "abc").unwrap_err().exit_code(), 2);
        assert_eq!(ApiConfig::new("http://localhost", "  ").unwrap_err().exit_code(), 2);
    }

    #[test]
    fn explicit_values_win_over_environment() {
        let cfg = ApiConfig::resolve(Some("http://flag.example".to_string()), Some("tok".to_string())).unwrap();
        assert_eq!(cfg.base_url(), "http://flag.example");
        assert_eq!(cfg.token(), "tok");
    }

    #[test]
    fn debug_hides_token() {
        let cfg = ApiConfig::new("http://localhost", "secret").unwrap();
        assert!(!format!("{cfg:?}").contains("secret"));
    }
}
