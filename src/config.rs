//! Environment-driven configuration.
//!
//! Every knob has a default and an environment override; no config files.
//! The API key is read from the environment only and is never logged.

use std::env;
use std::time::Duration;

/// Settings for the agent and its server binary.
#[derive(Debug, Clone)]
pub struct AgentConfig {
    /// OpenAI-compatible endpoint base, e.g. `https://api.openai.com/v1`.
    pub base_url: String,
    pub api_key: Option<String>,
    /// Model used when a request does not name one.
    pub model: String,
    /// Default round-trip bound for runs that do not specify one.
    pub max_iterations: u32,
    /// Address the HTTP server binds to.
    pub bind_addr: String,
    /// Timeout for each individual model call.
    pub http_timeout: Duration,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            api_key: None,
            model: "gpt-4".to_string(),
            max_iterations: crate::orchestrator::DEFAULT_MAX_ITERATIONS,
            bind_addr: "127.0.0.1:8000".to_string(),
            http_timeout: Duration::from_secs(60),
        }
    }
}

impl AgentConfig {
    /// Load settings from the environment, falling back to defaults.
    ///
    /// Recognized variables: `OPENAI_BASE_URL`, `OPENAI_API_KEY`,
    /// `FILE_AGENT_MODEL`, `FILE_AGENT_MAX_ITERATIONS`, `FILE_AGENT_BIND`,
    /// `FILE_AGENT_HTTP_TIMEOUT_SECS`.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            base_url: env::var("OPENAI_BASE_URL").unwrap_or(defaults.base_url),
            api_key: env::var("OPENAI_API_KEY").ok(),
            model: env::var("FILE_AGENT_MODEL").unwrap_or(defaults.model),
            max_iterations: parse_env("FILE_AGENT_MAX_ITERATIONS")
                .unwrap_or(defaults.max_iterations),
            bind_addr: env::var("FILE_AGENT_BIND").unwrap_or(defaults.bind_addr),
            http_timeout: parse_env("FILE_AGENT_HTTP_TIMEOUT_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.http_timeout),
        }
    }
}

fn parse_env<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|s| s.parse::<T>().ok())
}
