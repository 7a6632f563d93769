//! HTTP client for the dashboard's chat endpoints.

use std::time::Duration;

use policy_chat_types::{
    ChatRequest, CompareRequest, ConversationSummary, FramingMode, StreamError,
};
use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::config::ClientConfig;
use crate::consumer::consume;
use crate::error::{ClientError, map_http_status, map_reqwest_error, payload_message};
use crate::handle::StreamHandle;

/// Client for the policy dashboard chat API.
///
/// # Example
///
/// ```no_run
/// use policy_chat_stream::ChatClient;
/// use policy_chat_types::ChatRequest;
/// use tokio_util::sync::CancellationToken;
///
/// # async fn run() {
/// let client = ChatClient::new().base_url("http://localhost:5000");
/// let handle = client
///     .chat(&ChatRequest::new("Am I covered for hail?").policy(3), CancellationToken::new())
///     .await;
/// let transcript = handle.collect().await;
/// println!("{}", transcript.text);
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ChatClient {
    config: ClientConfig,
    client: reqwest::Client,
}

impl ChatClient {
    /// A client with [`ClientConfig::default`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(ClientConfig::default())
    }

    /// A client with an explicit configuration.
    #[must_use]
    pub fn with_config(config: ClientConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    /// A client configured from the environment. See [`ClientConfig::from_env`].
    pub fn from_env() -> Result<Self, ClientError> {
        ClientConfig::from_env().map(Self::with_config)
    }

    /// Override the API base URL.
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config = self.config.base_url(url);
        self
    }

    /// Override the pause between processed chunks.
    #[must_use]
    pub fn pacing(mut self, pacing: Duration) -> Self {
        self.config = self.config.pacing(pacing);
        self
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Ask about a single policy. The answer streams in plain framing.
    ///
    /// Never fails directly: transport errors arrive as the handle's only
    /// event.
    pub async fn chat(&self, request: &ChatRequest, cancel: CancellationToken) -> StreamHandle {
        self.open_stream(&self.config.chat_path, request, FramingMode::Plain, cancel)
            .await
    }

    /// Compare several policies. The answer streams in NDJSON framing.
    pub async fn compare(
        &self,
        request: &CompareRequest,
        cancel: CancellationToken,
    ) -> StreamHandle {
        self.open_stream(&self.config.compare_path, request, FramingMode::Ndjson, cancel)
            .await
    }

    /// List recent conversations, newest first as returned by the server.
    pub async fn conversations(&self) -> Result<Vec<ConversationSummary>, ClientError> {
        let url = self.config.url(&self.config.conversations_path);
        tracing::debug!(url = %url, "fetching recent conversations");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(ClientError::Network)?;

        let status = response.status();
        let body = response.text().await.map_err(ClientError::Network)?;

        if !status.is_success() {
            return Err(ClientError::Http {
                status: status.as_u16(),
                message: payload_message(&body)
                    .unwrap_or_else(|| "Failed to fetch recent chats.".into()),
            });
        }

        serde_json::from_str(&body)
            .map_err(|e| ClientError::InvalidResponse(format!("conversation list: {e}")))
    }

    async fn open_stream<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        mode: FramingMode,
        cancel: CancellationToken,
    ) -> StreamHandle {
        let url = self.config.url(path);
        tracing::debug!(url = %url, %mode, "sending streaming chat request");

        let send = self.client.post(&url).json(body).send();
        let result = tokio::select! {
            biased;
            () = cancel.cancelled() => {
                tracing::debug!(url = %url, "cancelled before response");
                return StreamHandle::empty(cancel);
            }
            result = send => result,
        };

        let response = match result {
            Ok(response) => response,
            Err(e) => {
                tracing::debug!(url = %url, error = %e, "chat request failed");
                return StreamHandle::failed(map_reqwest_error(&e), cancel);
            }
        };

        let status = response.status();
        if !status.is_success() {
            let text = tokio::select! {
                biased;
                () = cancel.cancelled() => {
                    tracing::debug!(url = %url, "cancelled while reading error body");
                    return StreamHandle::empty(cancel);
                }
                text = response.text() => text.unwrap_or_default(),
            };
            let error = map_http_status(status, &text);
            tracing::debug!(url = %url, status = status.as_u16(), error = %error, "chat request rejected");
            return StreamHandle::failed(error, cancel);
        }

        if status == reqwest::StatusCode::NO_CONTENT || response.content_length() == Some(0) {
            tracing::debug!(url = %url, "chat response has no body");
            return StreamHandle::failed(StreamError::EmptyBody, cancel);
        }

        let events = consume(response.bytes_stream(), mode, self.config.pacing, cancel.clone());
        StreamHandle::new(events, cancel)
    }
}

impl Default for ChatClient {
    fn default() -> Self {
        Self::new()
    }
}
