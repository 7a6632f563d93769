//! A chat session as seen by the UI: one active stream at a time.

use policy_chat_types::{ChatRequest, CompareRequest, StreamEvent};
use tokio_util::sync::CancellationToken;

use crate::client::ChatClient;
use crate::handle::StreamHandle;

/// Conversation state owned by one chat or comparison view.
///
/// Starting a new query supersedes the previous one: its token is cancelled,
/// so its consumer stops reading and emits nothing further. Dropping the
/// thread (the view being torn down) cancels the active stream too.
#[derive(Debug, Default)]
pub struct ChatThread {
    conversation_id: Option<String>,
    active: Option<CancellationToken>,
}

impl ChatThread {
    /// A thread with no conversation yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Continue a conversation picked from the recent chats list.
    #[must_use]
    pub fn resume(conversation_id: impl Into<String>) -> Self {
        Self {
            conversation_id: Some(conversation_id.into()),
            active: None,
        }
    }

    /// The conversation identifier learned so far.
    #[must_use]
    pub fn conversation_id(&self) -> Option<&str> {
        self.conversation_id.as_deref()
    }

    /// Whether a stream started by this thread may still be running.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active.as_ref().is_some_and(|t| !t.is_cancelled())
    }

    /// Cancel the active stream, if any, and return a token for the next one.
    pub fn supersede(&mut self) -> CancellationToken {
        self.cancel();
        let token = CancellationToken::new();
        self.active = Some(token.clone());
        token
    }

    /// Cancel the active stream, if any. Idempotent.
    pub fn cancel(&mut self) {
        if let Some(previous) = self.active.take() {
            if !previous.is_cancelled() {
                tracing::debug!("superseding active chat stream");
            }
            previous.cancel();
        }
    }

    /// Record what an event says about the conversation.
    pub fn observe(&mut self, event: &StreamEvent) {
        if let StreamEvent::ConversationId(id) = event {
            self.conversation_id = Some(id.clone());
        }
    }

    /// Ask a single-policy question in this conversation.
    pub async fn ask(
        &mut self,
        client: &ChatClient,
        message: impl Into<String>,
        policy_id: Option<i64>,
    ) -> StreamHandle {
        let request = ChatRequest {
            message: message.into(),
            policy_id,
            conversation_id: self.conversation_id.clone(),
        };
        let cancel = self.supersede();
        client.chat(&request, cancel).await
    }

    /// Ask a comparison question in this conversation.
    pub async fn compare(
        &mut self,
        client: &ChatClient,
        message: impl Into<String>,
        policy_ids: impl IntoIterator<Item = i64>,
    ) -> StreamHandle {
        let mut request = CompareRequest::new(message, policy_ids);
        request.conversation_id = self.conversation_id.clone();
        let cancel = self.supersede();
        client.compare(&request, cancel).await
    }
}

impl Drop for ChatThread {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn supersede_cancels_previous_token() {
        let mut thread = ChatThread::new();
        let first = thread.supersede();
        let second = thread.supersede();
        assert!(first.is_cancelled());
        assert!(!second.is_cancelled());
        assert!(thread.is_active());
    }

    #[test]
    fn cancel_is_idempotent() {
        let mut thread = ChatThread::new();
        let token = thread.supersede();
        thread.cancel();
        thread.cancel();
        assert!(token.is_cancelled());
        assert!(!thread.is_active());
    }

    #[test]
    fn drop_cancels_active_stream() {
        let mut thread = ChatThread::new();
        let token = thread.supersede();
        drop(thread);
        assert!(token.is_cancelled());
    }

    #[test]
    fn observe_records_conversation_id() {
        let mut thread = ChatThread::new();
        thread.observe(&StreamEvent::ConversationId("c-7".into()));
        assert_eq!(thread.conversation_id(), Some("c-7"));
    }

    #[test]
    fn resume_starts_with_id() {
        let thread = ChatThread::resume("c-1");
        assert_eq!(thread.conversation_id(), Some("c-1"));
        assert!(!thread.is_active());
    }
}
