use std::env;

use tracing::info;

use crate::types::Sport;

/// Process configuration, read once at startup from environment variables.
/// Every knob has a default so a bare environment still boots.
#[derive(Debug, Clone)]
pub struct Config {
    pub web_host: String,
    pub web_port: u16,
    /// Per-attempt HTTP timeout in seconds.
    pub fetch_timeout_secs: u64,
    pub fetch_max_retries: u32,
    /// Backoff base for page scraping, in seconds.
    pub page_retry_base_secs: u64,
    /// Backoff base for API calls, in seconds.
    pub api_retry_base_secs: u64,
    /// Minimum spacing between page requests, in milliseconds.
    pub page_delay_ms: u64,
    /// Minimum spacing between API requests, in milliseconds.
    pub api_delay_ms: u64,
    /// Discovery report cache TTL in seconds. Zero disables the cache.
    pub cache_ttl_secs: u64,
    pub default_sport: Sport,
    pub cfbd_api_key: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            web_host: env_or("WEB_HOST", "0.0.0.0"),
            web_port: env_parse("WEB_PORT", 3000),
            fetch_timeout_secs: env_parse("FETCH_TIMEOUT_SECS", 15),
            fetch_max_retries: env_parse("FETCH_MAX_RETRIES", 3),
            page_retry_base_secs: env_parse("PAGE_RETRY_BASE_SECS", 5),
            api_retry_base_secs: env_parse("API_RETRY_BASE_SECS", 3),
            page_delay_ms: env_parse("PAGE_DELAY_MS", 2000),
            api_delay_ms: env_parse("API_DELAY_MS", 500),
            cache_ttl_secs: env_parse("CACHE_TTL_SECS", 300),
            default_sport: Sport::from_str_loose(&env_or("DEFAULT_SPORT", "basketball")),
            cfbd_api_key: env::var("CFBD_API_KEY").ok().filter(|v| !v.is_empty()),
        }
    }

    /// Log the loaded configuration with secrets reduced to a preview.
    pub fn log_redacted(&self) {
        info!(
            web_host = %self.web_host,
            web_port = self.web_port,
            fetch_timeout_secs = self.fetch_timeout_secs,
            fetch_max_retries = self.fetch_max_retries,
            page_retry_base_secs = self.page_retry_base_secs,
            api_retry_base_secs = self.api_retry_base_secs,
            page_delay_ms = self.page_delay_ms,
            api_delay_ms = self.api_delay_ms,
            cache_ttl_secs = self.cache_ttl_secs,
            default_sport = %self.default_sport,
            cfbd_api_key = %self
                .cfbd_api_key
                .as_deref()
                .map(preview)
                .unwrap_or_else(|| "unset".to_string()),
            "Configuration loaded"
        );
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(val) => val
            .parse()
            .unwrap_or_else(|_| panic!("{key} must be a number, got '{val}'")),
        Err(_) => default,
    }
}

fn preview(val: &str) -> String {
    let n = val.len().min(5);
    format!("{}...({} chars)", &val[..n], val.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_never_exposes_a_full_key() {
        assert_eq!(preview("abcdefgh"), "abcde...(8 chars)");
        assert_eq!(preview("ab"), "ab...(2 chars)");
    }
}
