//! Client configuration resolution.
//!
//! # Responsibility
//! - Resolve the remote collection base URL and log directory from explicit
//!   values, environment variables and defaults.
//!
//! # Invariants
//! - `ClientConfig::base_url` always has an http(s) scheme and no trailing `/`.
//! - Resolved log directories are absolute.

use std::path::{Path, PathBuf};

/// Environment variable overriding the remote collection base URL.
pub const BASE_URL_ENV: &str = "KBASE_API_BASE_URL";
/// Environment variable overriding the log directory.
pub const LOG_DIR_ENV: &str = "KBASE_LOG_DIR";
/// Base URL used when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

const DEFAULT_LOG_DIR_NAME: &str = "kbase-logs";

/// Connection settings for the remote knowledge collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    base_url: String,
}

impl ClientConfig {
    /// Validates and normalizes `base_url`.
    ///
    /// # Errors
    /// - Returns an error when the value is blank or not http(s).
    pub fn new(base_url: &str) -> Result<Self, String> {
        Ok(Self {
            base_url: normalize_base_url(base_url)?,
        })
    }

    /// Resolves the base URL: `explicit` > `KBASE_API_BASE_URL` > default.
    pub fn resolve(explicit: Option<&str>) -> Result<Self, String> {
        let env_value = std::env::var(BASE_URL_ENV).ok();
        Self::resolve_from(explicit, env_value.as_deref())
    }

    /// Resolution rule with the environment value passed in.
    pub fn resolve_from(explicit: Option<&str>, env_value: Option<&str>) -> Result<Self, String> {
        let chosen = [explicit, env_value]
            .into_iter()
            .flatten()
            .find(|value| !value.trim().is_empty())
            .unwrap_or(DEFAULT_BASE_URL);
        Self::new(chosen)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

fn normalize_base_url(value: &str) -> Result<String, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err("base_url cannot be empty".to_string());
    }
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(format!(
            "base_url must start with http:// or https://, got `{trimmed}`"
        ));
    }
    let normalized = trimmed.trim_end_matches('/');
    if normalized.ends_with(':') || normalized.ends_with("//") {
        return Err(format!("base_url has no host, got `{trimmed}`"));
    }
    Ok(normalized.to_string())
}

/// Resolves the log directory: `explicit` > `KBASE_LOG_DIR` > temp dir.
pub fn resolve_log_dir(explicit: Option<&str>) -> PathBuf {
    let env_value = std::env::var(LOG_DIR_ENV).ok();
    resolve_log_dir_from(explicit, env_value.as_deref())
}

/// Resolution rule with the environment value passed in.
///
/// Relative candidates are skipped, so the result is always absolute.
pub fn resolve_log_dir_from(explicit: Option<&str>, env_value: Option<&str>) -> PathBuf {
    [explicit, env_value]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(Path::new)
        .find(|path| path.is_absolute())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_LOG_DIR_NAME))
}

#[cfg(test)]
mod tests {
    use super::{resolve_log_dir_from, ClientConfig, DEFAULT_BASE_URL};

    #[test]
    fn explicit_value_wins_over_env_and_default() {
        let config =
            ClientConfig::resolve_from(Some("https://kb.example.com/"), Some("http://env:1"))
                .expect("valid config");
        assert_eq!(config.base_url(), "https://kb.example.com");
    }

    #[test]
    fn blank_values_fall_through_to_default() {
        let config = ClientConfig::resolve_from(Some("  "), None).expect("valid config");
        assert_eq!(config.base_url(), DEFAULT_BASE_URL);
        assert_eq!(ClientConfig::default().base_url(), DEFAULT_BASE_URL);
    }

    #[test]
    fn env_value_is_used_without_explicit() {
        let config =
            ClientConfig::resolve_from(None, Some("http://127.0.0.1:9000")).expect("valid");
        assert_eq!(config.base_url(), "http://127.0.0.1:9000");
    }

    #[test]
    fn non_http_scheme_is_rejected() {
        let error = ClientConfig::new("ftp://example.com").expect_err("scheme must be http(s)");
        assert!(error.contains("http://"));
        assert!(ClientConfig::new("http://").is_err());
    }

    #[test]
    fn relative_log_dir_is_skipped() {
        let dir = resolve_log_dir_from(Some("logs/dev"), None);
        assert!(dir.is_absolute());
        assert!(dir.ends_with("kbase-logs"));
    }
}
