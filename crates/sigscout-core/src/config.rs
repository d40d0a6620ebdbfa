use std::path::PathBuf;

use crate::app_config::AppConfig;
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env
/// vars.
///
/// # Errors
///
/// Returns `ConfigError` if a numeric env var holds a non-numeric value.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from env vars already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files, which is useful for
/// testing or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if a numeric env var holds a non-numeric value.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build configuration from the provided env-var lookup function.
///
/// The core parsing logic is decoupled from the actual environment so it
/// can be tested with a pure `HashMap` lookup without touching `set_var`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let optional = |var: &str| -> Option<String> { lookup(var).ok().filter(|v| !v.is_empty()) };

    let or_default =
        |var: &str, default: &str| -> String { lookup(var).unwrap_or_else(|_| default.to_string()) };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        or_default(var, default)
            .parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    Ok(AppConfig {
        log_level: or_default("SIGSCOUT_LOG_LEVEL", "info"),
        sources_path: PathBuf::from(or_default("SIGSCOUT_SOURCES_PATH", "./config/sources.yaml")),
        news_api_key: optional("SIGSCOUT_NEWS_API_KEY"),
        video_api_key: optional("SIGSCOUT_VIDEO_API_KEY"),
        analytics_api_key: optional("SIGSCOUT_ANALYTICS_API_KEY"),
        llm_api_url: optional("SIGSCOUT_LLM_API_URL"),
        llm_api_key: optional("SIGSCOUT_LLM_API_KEY"),
        llm_model: or_default("SIGSCOUT_LLM_MODEL", "analyst-large"),
        request_timeout_secs: parse_u64("SIGSCOUT_REQUEST_TIMEOUT_SECS", "30")?,
        user_agent: or_default("SIGSCOUT_USER_AGENT", "sigscout/0.1 (signal-scouting)"),
        collector_max_attempts: parse_u32("SIGSCOUT_COLLECTOR_MAX_ATTEMPTS", "2")?,
        collector_timeout_secs: parse_u64("SIGSCOUT_COLLECTOR_TIMEOUT_SECS", "30")?,
        retry_backoff_base_ms: parse_u64("SIGSCOUT_RETRY_BACKOFF_BASE_MS", "1000")?,
        market_max_results: parse_usize("SIGSCOUT_MARKET_MAX_RESULTS", "30")?,
        docs_max_results: parse_usize("SIGSCOUT_DOCS_MAX_RESULTS", "20")?,
        metrics_max_results: parse_usize("SIGSCOUT_METRICS_MAX_RESULTS", "40")?,
        docs_min_document_chars: parse_usize("SIGSCOUT_DOCS_MIN_DOCUMENT_CHARS", "40")?,
        template_path: optional("SIGSCOUT_TEMPLATE_PATH").map(PathBuf::from),
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::env::VarError;

    use super::*;

    fn lookup_from_map<'a>(
        map: &'a HashMap<&'a str, &'a str>,
    ) -> impl Fn(&str) -> Result<String, VarError> + 'a {
        move |key| {
            map.get(key)
                .map(|v| (*v).to_string())
                .ok_or(VarError::NotPresent)
        }
    }

    #[test]
    fn empty_environment_yields_defaults() {
        let map: HashMap<&str, &str> = HashMap::new();
        let cfg = build_app_config(lookup_from_map(&map)).expect("defaults should parse");
        assert_eq!(cfg.log_level, "info");
        assert!(cfg.news_api_key.is_none());
        assert!(cfg.video_api_key.is_none());
        assert!(cfg.llm_api_url.is_none());
        assert_eq!(cfg.collector_max_attempts, 2);
        assert_eq!(cfg.collector_timeout_secs, 30);
        assert_eq!(cfg.retry_backoff_base_ms, 1000);
        assert_eq!(cfg.market_max_results, 30);
        assert_eq!(cfg.docs_max_results, 20);
        assert_eq!(cfg.metrics_max_results, 40);
        assert_eq!(cfg.docs_min_document_chars, 40);
        assert!(cfg.template_path.is_none());
    }

    #[test]
    fn optional_keys_are_picked_up() {
        let mut map = HashMap::new();
        map.insert("SIGSCOUT_NEWS_API_KEY", "news-key");
        map.insert("SIGSCOUT_LLM_API_URL", "https://llm.internal");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.news_api_key.as_deref(), Some("news-key"));
        assert_eq!(cfg.llm_api_url.as_deref(), Some("https://llm.internal"));
    }

    #[test]
    fn empty_string_credential_counts_as_absent() {
        let mut map = HashMap::new();
        map.insert("SIGSCOUT_NEWS_API_KEY", "");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert!(cfg.news_api_key.is_none());
    }

    #[test]
    fn numeric_override_applies() {
        let mut map = HashMap::new();
        map.insert("SIGSCOUT_COLLECTOR_MAX_ATTEMPTS", "4");
        map.insert("SIGSCOUT_MARKET_MAX_RESULTS", "10");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.collector_max_attempts, 4);
        assert_eq!(cfg.market_max_results, 10);
    }

    #[test]
    fn invalid_numeric_value_is_rejected() {
        let mut map = HashMap::new();
        map.insert("SIGSCOUT_COLLECTOR_TIMEOUT_SECS", "not-a-number");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "SIGSCOUT_COLLECTOR_TIMEOUT_SECS"),
            "expected InvalidEnvVar, got: {result:?}"
        );
    }
}
