use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Interface to bind
    pub host: String,
    /// Port to bind
    pub port: u16,
    /// Maximum accepted size of the uploaded catalog file, in bytes
    pub max_upload_bytes: usize,
    /// Maximum number of candidates rendered into a single prompt
    pub max_candidates: usize,
    /// Per-client admission control
    pub rate_limit: RateLimitConfig,
    /// Completion backend configuration
    pub llm: LlmConfig,
}

/// Sliding-window admission limits, applied per resolved client IP.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Requests admitted per window
    pub max_requests: usize,
    /// Window length in seconds
    pub window_secs: u64,
}

impl RateLimitConfig {
    pub fn window(&self) -> Duration {
        Duration::from_secs(self.window_secs)
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 20,
            window_secs: 60 * 60,
        }
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// "openai" or "ollama"
    pub provider: String,
    /// Base URL for the LLM API
    pub base_url: String,
    /// Model name used for selection
    pub chat_model: String,
    /// Bearer credential (only needed for cloud providers)
    pub api_key: Option<String>,
    /// Upper bound on a single completion call, in seconds
    pub timeout_secs: u64,
    /// Output-length cap sent with every call
    pub max_tokens: u32,
}

impl std::fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmConfig")
            .field("provider", &self.provider)
            .field("base_url", &self.base_url)
            .field("chat_model", &self.chat_model)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("timeout_secs", &self.timeout_secs)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

impl LlmConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

const MAX_LLM_TIMEOUT_SECS: u64 = 300;

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8003,
            max_upload_bytes: 20 * 1024 * 1024,
            max_candidates: 800,
            rate_limit: RateLimitConfig::default(),
            llm: LlmConfig::default(),
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            base_url: "https://api.openai.com".to_string(),
            chat_model: "gpt-4o-mini".to_string(),
            api_key: None,
            timeout_secs: 60,
            max_tokens: 200,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(host) = std::env::var("FILE_SELECTOR_HOST") {
            config.host = host;
        }
        if let Ok(val) = std::env::var("FILE_SELECTOR_PORT") {
            if let Ok(v) = val.parse() {
                config.port = v;
            }
        }
        if let Ok(val) = std::env::var("FILE_SELECTOR_MAX_UPLOAD_BYTES") {
            if let Ok(v) = val.parse() {
                config.max_upload_bytes = v;
            }
        }
        if let Ok(val) = std::env::var("FILE_SELECTOR_MAX_CANDIDATES") {
            if let Ok(v) = val.parse() {
                config.max_candidates = v;
            }
        }
        if let Ok(val) = std::env::var("FILE_SELECTOR_RATE_LIMIT_MAX_REQUESTS") {
            if let Ok(v) = val.parse() {
                config.rate_limit.max_requests = v;
            }
        }
        if let Ok(val) = std::env::var("FILE_SELECTOR_RATE_LIMIT_WINDOW_SECS") {
            if let Ok(v) = val.parse() {
                config.rate_limit.window_secs = v;
            }
        }

        // Completion backend
        if let Ok(provider) = std::env::var("LLM_PROVIDER") {
            config.llm.provider = provider;
        }
        if let Ok(url) = std::env::var("LLM_BASE_URL") {
            config.llm.base_url = url;
        }
        if let Ok(model) = std::env::var("LLM_CHAT_MODEL") {
            config.llm.chat_model = model;
        }
        if let Ok(key) = std::env::var("LLM_API_KEY") {
            config.llm.api_key = Some(key);
        }
        if let Ok(val) = std::env::var("LLM_TIMEOUT_SECS") {
            if let Ok(v) = val.parse::<u64>() {
                config.llm.timeout_secs = v.min(MAX_LLM_TIMEOUT_SECS);
            }
        }
        if let Ok(val) = std::env::var("LLM_MAX_TOKENS") {
            if let Ok(v) = val.parse() {
                config.llm.max_tokens = v;
            }
        }

        config
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_service_limits() {
        let config = Config::default();
        assert_eq!(config.port, 8003);
        assert_eq!(config.max_upload_bytes, 20 * 1024 * 1024);
        assert_eq!(config.max_candidates, 800);
        assert_eq!(config.rate_limit.max_requests, 20);
        assert_eq!(config.rate_limit.window(), Duration::from_secs(3600));
        assert_eq!(config.llm.chat_model, "gpt-4o-mini");
        assert_eq!(config.llm.max_tokens, 200);
    }

    #[test]
    fn test_bind_addr_joins_host_and_port() {
        let config = Config {
            host: "127.0.0.1".into(),
            port: 9100,
            ..Config::default()
        };
        assert_eq!(config.bind_addr(), "127.0.0.1:9100");
    }

    #[test]
    fn test_llm_debug_redacts_api_key() {
        let llm = LlmConfig {
            api_key: Some("sk-secret".into()),
            ..LlmConfig::default()
        };
        let rendered = format!("{llm:?}");
        assert!(!rendered.contains("sk-secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
