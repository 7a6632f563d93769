//! Events emitted by the stream consumer.

use serde::{Deserialize, Serialize};

use crate::error::StreamError;

/// A snapshot of the display text.
///
/// `text` is always the full accumulated buffer, not a delta, so a renderer
/// can replace its view wholesale on every event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderEvent {
    /// Cumulative decoded display text.
    pub text: String,
    /// `false` only on the final event of a completed stream.
    pub still_streaming: bool,
}

/// An event emitted while consuming a streamed response.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    /// The display text changed, or the stream completed.
    Render(RenderEvent),
    /// The server assigned a conversation identifier. Emitted at most once.
    ConversationId(String),
    /// The request or the body read failed. Always the last event.
    Error(StreamError),
}

impl StreamEvent {
    /// The render payload, if this is a [`StreamEvent::Render`].
    #[must_use]
    pub fn as_render(&self) -> Option<&RenderEvent> {
        match self {
            Self::Render(r) => Some(r),
            _ => None,
        }
    }

    /// Whether no further events follow this one.
    #[must_use]
    pub fn is_final(&self) -> bool {
        match self {
            Self::Render(r) => !r.still_streaming,
            Self::ConversationId(_) => false,
            Self::Error(_) => true,
        }
    }
}
