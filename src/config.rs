use std::env;
use tracing::warn;

/// Runtime configuration for the classification backend.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Remote classification endpoint. May be absent; submission reports a
    /// configuration error until one is set.
    pub api_url: Option<String>,
    /// Route predictions through the offline mock classifier instead of the
    /// remote endpoint.
    pub mock: bool,
    pub timeout_seconds: u64,
    pub user_agent: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_url: None,
            mock: false,
            timeout_seconds: 30,
            user_agent: "TuberScan/0.1".to_string(),
        }
    }
}

impl AppConfig {
    /// Builds a configuration from `TUBERSCAN_*` environment variables,
    /// falling back to defaults for anything unset.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(url) = env::var("TUBERSCAN_API_URL") {
            if !url.trim().is_empty() {
                config.api_url = Some(url);
            }
        }

        if let Ok(raw) = env::var("TUBERSCAN_MOCK") {
            config.mock = matches!(raw.trim(), "1" | "true" | "yes");
        }

        if let Ok(raw) = env::var("TUBERSCAN_TIMEOUT_SECS") {
            match raw.parse::<u64>() {
                Ok(seconds) if seconds > 0 => config.timeout_seconds = seconds,
                _ => warn!("Ignoring invalid TUBERSCAN_TIMEOUT_SECS value: {}", raw),
            }
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_no_endpoint() {
        let config = AppConfig::default();
        assert!(config.api_url.is_none());
        assert!(!config.mock);
        assert_eq!(config.timeout_seconds, 30);
    }
}
