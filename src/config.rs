use serde::Deserialize;
use std::collections::HashSet;
use std::time::Duration;

use crate::error::ConfigError;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// NATS server URL for the chat platform bridge
    #[serde(default = "default_nats_url")]
    pub nats_url: String,

    /// Comma-separated whitelist of thread identifiers to transcribe in
    pub threads: String,

    /// Object-storage bucket the normalized audio is uploaded to
    pub bucket: String,

    /// Bearer token for the storage and speech APIs
    pub api_token: String,

    /// Language code for speech recognition
    #[serde(default = "default_language")]
    pub language: String,

    /// Identity cache TTL in seconds
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
}

fn default_nats_url() -> String {
    "nats://localhost:4222".to_string()
}

fn default_language() -> String {
    "fr-FR".to_string()
}

fn default_cache_ttl_secs() -> u64 {
    7200
}

impl Config {
    /// Load configuration from `SCRIBE_`-prefixed environment variables.
    /// A missing required variable is a fatal startup error.
    pub fn from_env() -> Result<Self, ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::Environment::with_prefix("SCRIBE").try_parsing(true))
            .build()?;

        let cfg: Config = settings.try_deserialize()?;

        if cfg.thread_whitelist().is_empty() {
            return Err(ConfigError::Invalid {
                field: "threads".to_string(),
                reason: "whitelist must name at least one thread".to_string(),
            });
        }

        Ok(cfg)
    }

    /// Thread whitelist parsed from the comma-separated `threads` value.
    pub fn thread_whitelist(&self) -> HashSet<String> {
        self.threads
            .split(',')
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect()
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}
