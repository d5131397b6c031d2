use std::time::Duration;

use brew_common::{parse_number, Secret};
use log::*;

pub const DEFAULT_BLOCKONOMICS_URL: &str = "https://www.blockonomics.co";
pub const DEFAULT_PUSH_URL: &str = "wss://www.blockonomics.co/payment";
pub const DEFAULT_CALLBACK_URL: &str = "localhost:3001/callback";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct BlockonomicsConfig {
    /// Base URL for REST calls, without a trailing slash.
    pub base_url: String,
    /// Base URL of the websocket push channel. The payment address is appended as the last path segment.
    pub push_url: String,
    pub api_key: Secret<String>,
    /// The value sent as `match_callback`. Blockonomics uses it to pick the store whose callback receives updates.
    pub callback_url: String,
    /// Upper bound on every outbound request.
    pub timeout: Duration,
}

impl Default for BlockonomicsConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BLOCKONOMICS_URL.to_string(),
            push_url: DEFAULT_PUSH_URL.to_string(),
            api_key: Secret::default(),
            callback_url: DEFAULT_CALLBACK_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl BlockonomicsConfig {
    pub fn new_from_env_or_default() -> Self {
        let base_url = std::env::var("BBC_BLOCKONOMICS_URL")
            .map(|s| s.trim_end_matches('/').to_string())
            .unwrap_or_else(|_| DEFAULT_BLOCKONOMICS_URL.to_string());
        let push_url = std::env::var("BBC_PUSH_URL")
            .map(|s| s.trim_end_matches('/').to_string())
            .unwrap_or_else(|_| DEFAULT_PUSH_URL.to_string());
        let api_key = Secret::new(std::env::var("BLOCKONOMICS_API_KEY").unwrap_or_else(|_| {
            error!("🪛️ BLOCKONOMICS_API_KEY is not set. Address generation and monitoring requests will be rejected.");
            String::default()
        }));
        let callback_url = std::env::var("BBC_CALLBACK_URL").unwrap_or_else(|_| {
            warn!("🪛️ BBC_CALLBACK_URL not set, using {DEFAULT_CALLBACK_URL} as the match_callback value");
            DEFAULT_CALLBACK_URL.to_string()
        });
        let timeout = parse_number::<u64>(std::env::var("BBC_UPSTREAM_TIMEOUT").ok())
            .map_err(|e| warn!("🪛️ Invalid value for BBC_UPSTREAM_TIMEOUT. {e}"))
            .ok()
            .flatten()
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TIMEOUT);
        Self { base_url, push_url, api_key, callback_url, timeout }
    }
}
