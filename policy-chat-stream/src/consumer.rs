//! The stream consumer: decodes a chunked body into [`StreamEvent`]s.
//!
//! [`ChunkConsumer`] is the synchronous state machine. It owns the
//! [`StreamSession`], the incremental decoder and the framing strategy, and
//! turns each chunk into zero or more events. [`consume`] drives it from an
//! async byte stream, adding pacing and cancellation.

use std::fmt::Display;
use std::pin::Pin;
use std::time::Duration;

use bytes::Bytes;
use futures::{Stream, StreamExt};
use policy_chat_types::{FramingMode, StreamError, StreamEvent, StreamSession};
use tokio_util::sync::CancellationToken;

use crate::decoder::Utf8Decoder;
use crate::parser::FrameParser;

/// Synchronous core of the consumer.
///
/// Replaying the same bytes through a fresh instance yields the same final
/// text regardless of how they are split into chunks.
#[derive(Debug)]
pub struct ChunkConsumer {
    session: StreamSession,
    decoder: Utf8Decoder,
    parser: FrameParser,
}

impl ChunkConsumer {
    /// A consumer for a body in the given framing.
    #[must_use]
    pub fn new(mode: FramingMode) -> Self {
        Self {
            session: StreamSession::new(),
            decoder: Utf8Decoder::new(),
            parser: FrameParser::new(mode),
        }
    }

    /// The session being built.
    #[must_use]
    pub fn session(&self) -> &StreamSession {
        &self.session
    }

    /// Consume the consumer, returning its session.
    #[must_use]
    pub fn into_session(self) -> StreamSession {
        self.session
    }

    /// Process one chunk.
    ///
    /// Emits a conversation id event the first time one is recorded, and a
    /// render event whenever the display text grew. Chunks arriving after
    /// the session is terminal are ignored.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<StreamEvent> {
        if self.session.phase().is_terminal() {
            return Vec::new();
        }
        let text = self.decoder.decode(chunk);
        let applied = self.parser.feed(&text, &mut self.session);

        let mut events = Vec::new();
        if let Some(id) = applied.conversation_id {
            events.push(StreamEvent::ConversationId(id));
        }
        if applied.text_changed {
            events.push(StreamEvent::Render(self.session.render()));
        }
        events
    }

    /// The body ended normally.
    ///
    /// Applies any line still buffered by the framing, then emits the final
    /// render event with `still_streaming: false`.
    pub fn finish(&mut self) -> Vec<StreamEvent> {
        if self.session.phase().is_terminal() {
            return Vec::new();
        }

        let dropped = self.decoder.reset();
        if dropped > 0 {
            tracing::warn!(bytes = dropped, "body ended inside a multi-byte character");
        }

        let mut events = Vec::new();
        let applied = self.parser.flush(&mut self.session);
        if let Some(id) = applied.conversation_id {
            events.push(StreamEvent::ConversationId(id));
        }
        if applied.text_changed {
            events.push(StreamEvent::Render(self.session.render()));
        }

        self.session.finish();
        events.push(StreamEvent::Render(self.session.render()));
        events
    }

    /// The transport failed. Returns the single error event to surface.
    pub fn fail(&mut self, error: StreamError) -> Option<StreamEvent> {
        self.session
            .fail()
            .then_some(StreamEvent::Error(error))
    }
}

/// Owns the body reader and releases it exactly once.
///
/// Release happens on [`ReaderGuard::release`] or on drop, whichever comes
/// first, so every exit path of the consumer (completion, error, cancellation,
/// or the event stream itself being dropped) frees the connection.
struct ReaderGuard<S> {
    reader: Option<Pin<Box<S>>>,
}

impl<S> ReaderGuard<S> {
    fn new(reader: S) -> Self {
        Self {
            reader: Some(Box::pin(reader)),
        }
    }

    fn release(&mut self) {
        if self.reader.take().is_some() {
            tracing::trace!("body reader released");
        }
    }
}

impl<S: Stream> ReaderGuard<S> {
    async fn next(&mut self) -> Option<S::Item> {
        match self.reader.as_mut() {
            Some(reader) => reader.next().await,
            None => None,
        }
    }
}

impl<S> Drop for ReaderGuard<S> {
    fn drop(&mut self) {
        self.release();
    }
}

enum Step<T> {
    Cancelled,
    Item(Option<T>),
}

/// Drive a [`ChunkConsumer`] from an async byte stream.
///
/// `pacing` is slept after each chunk is processed; [`Duration::ZERO`]
/// disables it. Once `cancel` fires, reading stops, the reader is released
/// and the returned stream ends without emitting anything further.
pub fn consume<S, E>(
    body: S,
    mode: FramingMode,
    pacing: Duration,
    cancel: CancellationToken,
) -> impl Stream<Item = StreamEvent> + Send + 'static
where
    S: Stream<Item = Result<Bytes, E>> + Send + 'static,
    E: Display + Send + 'static,
{
    async_stream::stream! {
        let mut reader = ReaderGuard::new(body);
        let mut consumer = ChunkConsumer::new(mode);

        loop {
            let step = tokio::select! {
                biased;
                () = cancel.cancelled() => Step::Cancelled,
                item = reader.next() => Step::Item(item),
            };

            match step {
                Step::Cancelled => {
                    tracing::debug!(phase = ?consumer.session().phase(), "stream cancelled");
                    reader.release();
                    return;
                }
                Step::Item(None) => {
                    reader.release();
                    tracing::debug!(
                        %mode,
                        bytes = consumer.session().text().len(),
                        "stream complete"
                    );
                    for event in consumer.finish() {
                        if cancel.is_cancelled() {
                            return;
                        }
                        yield event;
                    }
                    return;
                }
                Step::Item(Some(Err(e))) => {
                    reader.release();
                    tracing::debug!(error = %e, "stream read failed");
                    if let Some(event) = consumer.fail(StreamError::Read(e.to_string())) {
                        yield event;
                    }
                    return;
                }
                Step::Item(Some(Ok(chunk))) => {
                    tracing::trace!(bytes = chunk.len(), "received chunk");
                    for event in consumer.push(&chunk) {
                        if cancel.is_cancelled() {
                            reader.release();
                            return;
                        }
                        yield event;
                    }
                }
            }

            if !pacing.is_zero() {
                tokio::select! {
                    biased;
                    () = cancel.cancelled() => {}
                    () = tokio::time::sleep(pacing) => {}
                }
            }
        }
    }
}
