//! Handle to an in-flight streamed response.

use std::pin::Pin;

use futures::{Stream, StreamExt};
use policy_chat_types::{StreamError, StreamEvent};
use tokio_util::sync::CancellationToken;

/// Handle to a streaming chat response.
///
/// Events are read from `receiver`. Cancelling stops the consumer and
/// releases the response body; the receiver then ends without further events.
pub struct StreamHandle {
    /// The stream of events. Consume with `StreamExt::next()`.
    pub receiver: Pin<Box<dyn Stream<Item = StreamEvent> + Send>>,
    cancel: CancellationToken,
}

impl StreamHandle {
    /// Wrap an event stream and the token that cancels it.
    pub fn new(
        receiver: impl Stream<Item = StreamEvent> + Send + 'static,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            receiver: Box::pin(receiver),
            cancel,
        }
    }

    /// A handle whose only event is `error`.
    pub fn failed(error: StreamError, cancel: CancellationToken) -> Self {
        Self::new(futures::stream::once(async move { StreamEvent::Error(error) }), cancel)
    }

    /// A handle that emits nothing. Used when cancelled before a response arrived.
    pub fn empty(cancel: CancellationToken) -> Self {
        Self::new(futures::stream::empty::<StreamEvent>(), cancel)
    }

    /// Stop consuming. Safe to call any number of times.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Whether [`StreamHandle::cancel`] (or the owning token) has fired.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// A clone of the cancellation token, for cancelling from elsewhere.
    #[must_use]
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Drain every event into a [`Transcript`].
    pub async fn collect(mut self) -> Transcript {
        let mut transcript = Transcript::default();
        while let Some(event) = self.receiver.next().await {
            transcript.record(event);
        }
        transcript
    }
}

impl std::fmt::Debug for StreamHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamHandle")
            .field("cancelled", &self.cancel.is_cancelled())
            .finish_non_exhaustive()
    }
}

/// Everything a fully drained stream produced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Transcript {
    /// Text of the last render event.
    pub text: String,
    /// Conversation identifier, if the stream delivered one.
    pub conversation_id: Option<String>,
    /// The error that ended the stream, if any.
    pub error: Option<StreamError>,
    /// Number of render events seen.
    pub renders: usize,
    /// Whether the final render event (`still_streaming: false`) arrived.
    pub completed: bool,
}

impl Transcript {
    fn record(&mut self, event: StreamEvent) {
        match event {
            StreamEvent::Render(render) => {
                self.renders += 1;
                self.completed = !render.still_streaming;
                self.text = render.text;
            }
            StreamEvent::ConversationId(id) => self.conversation_id = Some(id),
            StreamEvent::Error(e) => self.error = Some(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use policy_chat_types::RenderEvent;

    use super::*;

    #[tokio::test]
    async fn failed_handle_yields_single_error() {
        let handle = StreamHandle::failed(StreamError::EmptyBody, CancellationToken::new());
        let transcript = handle.collect().await;
        assert_eq!(transcript.error, Some(StreamError::EmptyBody));
        assert_eq!(transcript.renders, 0);
        assert!(!transcript.completed);
    }

    #[tokio::test]
    async fn empty_handle_yields_nothing() {
        let transcript = StreamHandle::empty(CancellationToken::new()).collect().await;
        assert_eq!(transcript, Transcript::default());
    }

    #[tokio::test]
    async fn collect_keeps_last_render() {
        let events = vec![
            StreamEvent::ConversationId("c".into()),
            StreamEvent::Render(RenderEvent {
                text: "He".into(),
                still_streaming: true,
            }),
            StreamEvent::Render(RenderEvent {
                text: "Hello".into(),
                still_streaming: false,
            }),
        ];
        let handle = StreamHandle::new(futures::stream::iter(events), CancellationToken::new());
        let transcript = handle.collect().await;
        assert_eq!(transcript.text, "Hello");
        assert_eq!(transcript.conversation_id.as_deref(), Some("c"));
        assert_eq!(transcript.renders, 2);
        assert!(transcript.completed);
    }

    #[test]
    fn cancel_is_idempotent() {
        let handle = StreamHandle::empty(CancellationToken::new());
        handle.cancel();
        handle.cancel();
        assert!(handle.is_cancelled());
        assert!(handle.cancel_token().is_cancelled());
    }
}
