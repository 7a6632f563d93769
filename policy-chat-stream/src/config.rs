//! Client configuration.

use std::time::Duration;

use crate::error::ClientError;

/// Default API base URL (the dashboard's dev server).
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

/// Default pause between processed chunks.
pub const DEFAULT_PACING: Duration = Duration::from_millis(20);

/// Environment variable overriding [`ClientConfig::base_url`].
pub const BASE_URL_ENV: &str = "POLICY_CHAT_BASE_URL";

/// Environment variable overriding [`ClientConfig::pacing`], in milliseconds.
pub const PACING_ENV: &str = "POLICY_CHAT_PACING_MS";

/// Where the chat endpoints live and how their streams are consumed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// API base URL, without a trailing slash.
    pub base_url: String,
    /// Single-policy chat endpoint (plain framing).
    pub chat_path: String,
    /// Comparison chat endpoint (NDJSON framing).
    pub compare_path: String,
    /// Recent conversations listing.
    pub conversations_path: String,
    /// Pause after each processed chunk. Zero disables pacing.
    pub pacing: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            chat_path: "/api/chat/stream".into(),
            compare_path: "/api/chat/compare".into(),
            conversations_path: "/api/chat/conversations".into(),
            pacing: DEFAULT_PACING,
        }
    }
}

impl ClientConfig {
    /// Defaults overridden by `POLICY_CHAT_BASE_URL` and `POLICY_CHAT_PACING_MS`.
    pub fn from_env() -> Result<Self, ClientError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ClientError> {
        let mut config = Self::default();
        if let Some(url) = lookup(BASE_URL_ENV).filter(|v| !v.trim().is_empty()) {
            config = config.base_url(url);
        }
        if let Some(raw) = lookup(PACING_ENV) {
            let ms: u64 = raw.trim().parse().map_err(|e| {
                ClientError::Config(format!("{PACING_ENV}={raw:?} is not a number of milliseconds: {e}"))
            })?;
            config.pacing = Duration::from_millis(ms);
        }
        Ok(config)
    }

    /// Override the API base URL. A trailing slash is dropped.
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        let url = url.into();
        self.base_url = url.trim().trim_end_matches('/').to_string();
        self
    }

    /// Override the pause between processed chunks.
    #[must_use]
    pub fn pacing(mut self, pacing: Duration) -> Self {
        self.pacing = pacing;
        self
    }

    /// Override the single-policy chat path.
    #[must_use]
    pub fn chat_path(mut self, path: impl Into<String>) -> Self {
        self.chat_path = path.into();
        self
    }

    /// Override the comparison chat path.
    #[must_use]
    pub fn compare_path(mut self, path: impl Into<String>) -> Self {
        self.compare_path = path.into();
        self
    }

    /// Override the conversations listing path.
    #[must_use]
    pub fn conversations_path(mut self, path: impl Into<String>) -> Self {
        self.conversations_path = path.into();
        self
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}
