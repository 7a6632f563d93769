//! Per-request stream state.

use serde::{Deserialize, Serialize};

use crate::event::RenderEvent;

/// Where a [`StreamSession`] is in its lifecycle.
///
/// Transitions only move forward: `AwaitingHeader -> Streaming -> Done`,
/// or to `Failed` from any non-terminal phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// No display text has been accepted yet; metadata may still arrive.
    #[default]
    AwaitingHeader,
    /// Display text is being accumulated.
    Streaming,
    /// The body ended normally.
    Done,
    /// The request or the body read failed.
    Failed,
}

impl Phase {
    /// Whether no further transition is possible.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }
}

/// Accumulated state of one streamed response.
///
/// Created when a request is issued and mutated once per received chunk.
/// The buffer only grows, and the conversation identifier can be recorded
/// at most once, before any display text is accepted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StreamSession {
    raw_buffer: String,
    conversation_id: Option<String>,
    phase: Phase,
}

impl StreamSession {
    /// A fresh session in [`Phase::AwaitingHeader`] with an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The current phase.
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The decoded display text accumulated so far.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.raw_buffer
    }

    /// The conversation identifier, once the stream has delivered one.
    #[must_use]
    pub fn conversation_id(&self) -> Option<&str> {
        self.conversation_id.as_deref()
    }

    /// Record the conversation identifier.
    ///
    /// Returns `false` (and leaves the session untouched) when an identifier
    /// is already recorded or the session has left [`Phase::AwaitingHeader`].
    pub fn record_conversation_id(&mut self, id: impl Into<String>) -> bool {
        if self.phase != Phase::AwaitingHeader || self.conversation_id.is_some() {
            return false;
        }
        self.conversation_id = Some(id.into());
        true
    }

    /// Move from [`Phase::AwaitingHeader`] to [`Phase::Streaming`].
    ///
    /// No-op in any other phase.
    pub fn begin_streaming(&mut self) {
        if self.phase == Phase::AwaitingHeader {
            self.phase = Phase::Streaming;
        }
    }

    /// Append display text, entering [`Phase::Streaming`] if needed.
    ///
    /// Returns `false` if the session is terminal or `text` is empty.
    pub fn append(&mut self, text: &str) -> bool {
        if self.phase.is_terminal() || text.is_empty() {
            return false;
        }
        self.begin_streaming();
        self.raw_buffer.push_str(text);
        true
    }

    /// Mark the body as fully consumed.
    ///
    /// Returns `false` if the session was already terminal.
    pub fn finish(&mut self) -> bool {
        if self.phase.is_terminal() {
            return false;
        }
        self.phase = Phase::Done;
        true
    }

    /// Mark the session as failed.
    ///
    /// Returns `false` if the session was already terminal.
    pub fn fail(&mut self) -> bool {
        if self.phase.is_terminal() {
            return false;
        }
        self.phase = Phase::Failed;
        true
    }

    /// Snapshot the buffer as a [`RenderEvent`].
    #[must_use]
    pub fn render(&self) -> RenderEvent {
        RenderEvent {
            text: self.raw_buffer.clone(),
            still_streaming: !self.phase.is_terminal(),
        }
    }

    /// Consume the session, returning the accumulated text.
    #[must_use]
    pub fn into_text(self) -> String {
        self.raw_buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_session_awaits_header() {
        let session = StreamSession::new();
        assert_eq!(session.phase(), Phase::AwaitingHeader);
        assert_eq!(session.text(), "");
        assert!(session.conversation_id().is_none());
    }

    #[test]
    fn conversation_id_recorded_once() {
        let mut session = StreamSession::new();
        assert!(session.record_conversation_id("c-1"));
        assert!(!session.record_conversation_id("c-2"));
        assert_eq!(session.conversation_id(), Some("c-1"));
    }

    #[test]
    fn conversation_id_rejected_after_streaming_starts() {
        let mut session = StreamSession::new();
        session.append("Hello");
        assert!(!session.record_conversation_id("late"));
        assert!(session.conversation_id().is_none());
    }

    #[test]
    fn append_enters_streaming() {
        let mut session = StreamSession::new();
        assert!(session.append("Hi"));
        assert_eq!(session.phase(), Phase::Streaming);
        assert_eq!(session.text(), "Hi");
    }

    #[test]
    fn empty_append_is_ignored() {
        let mut session = StreamSession::new();
        assert!(!session.append(""));
        assert_eq!(session.phase(), Phase::AwaitingHeader);
    }

    #[test]
    fn finish_is_terminal() {
        let mut session = StreamSession::new();
        session.append("text");
        assert!(session.finish());
        assert!(!session.finish());
        assert!(!session.fail());
        assert!(!session.append("more"));
        assert_eq!(session.phase(), Phase::Done);
        assert_eq!(session.text(), "text");
    }

    #[test]
    fn fail_from_awaiting_header() {
        let mut session = StreamSession::new();
        assert!(session.fail());
        assert_eq!(session.phase(), Phase::Failed);
        session.begin_streaming();
        assert_eq!(session.phase(), Phase::Failed);
    }

    #[test]
    fn render_reflects_terminal_phase() {
        let mut session = StreamSession::new();
        session.append("a");
        assert!(session.render().still_streaming);
        session.finish();
        let event = session.render();
        assert!(!event.still_streaming);
        assert_eq!(event.text, "a");
    }

    #[test]
    fn phase_serializes_snake_case() {
        let json = serde_json::to_string(&Phase::AwaitingHeader).expect("serialize");
        assert_eq!(json, r#""awaiting_header""#);
    }
}
