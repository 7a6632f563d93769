//! Framing strategies for decoded chunk text.
//!
//! Both chat endpoints stream display text, but frame it differently:
//!
//! ```text
//! plain:   {"conversationId":"c-42"}            <- optional header, first chunk only
//!          Your deductible is $500 per claim...
//!
//! ndjson:  {"conversation_id":"c-42"}
//!          {"content_chunk":"Policy A covers "}
//!          {"content_chunk":"flood damage."}
//! ```
//!
//! A [`FrameParser`] applies decoded text to a [`StreamSession`] and reports
//! what changed. The consumer loop is the same for both strategies.

use policy_chat_types::{FramingMode, StreamSession};

/// Field carrying the display text in NDJSON lines.
const CONTENT_FIELD: &str = "content_chunk";

/// Field names accepted for the conversation identifier.
const CONVERSATION_ID_FIELDS: [&str; 2] = ["conversationId", "conversation_id"];

/// What applying a piece of text did to the session.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Applied {
    /// A conversation identifier recorded by this call.
    pub conversation_id: Option<String>,
    /// Whether display text was appended.
    pub text_changed: bool,
}

impl Applied {
    fn merge(&mut self, other: Applied) {
        if self.conversation_id.is_none() {
            self.conversation_id = other.conversation_id;
        }
        self.text_changed |= other.text_changed;
    }
}

/// Framing strategy selected by [`FramingMode`].
#[derive(Debug)]
pub enum FrameParser {
    /// Raw text with an optional JSON header chunk.
    Plain(PlainParser),
    /// Newline-delimited JSON.
    Ndjson(NdjsonParser),
}

impl FrameParser {
    /// A fresh parser for `mode`.
    #[must_use]
    pub fn new(mode: FramingMode) -> Self {
        match mode {
            FramingMode::Plain => Self::Plain(PlainParser::default()),
            FramingMode::Ndjson => Self::Ndjson(NdjsonParser::default()),
        }
    }

    /// The framing this parser handles.
    #[must_use]
    pub fn mode(&self) -> FramingMode {
        match self {
            Self::Plain(_) => FramingMode::Plain,
            Self::Ndjson(_) => FramingMode::Ndjson,
        }
    }

    /// Apply one chunk's decoded text.
    pub fn feed(&mut self, text: &str, session: &mut StreamSession) -> Applied {
        match self {
            Self::Plain(p) => p.feed(text, session),
            Self::Ndjson(p) => p.feed(text, session),
        }
    }

    /// Apply anything still buffered once the body has ended.
    pub fn flush(&mut self, session: &mut StreamSession) -> Applied {
        match self {
            Self::Plain(_) => Applied::default(),
            Self::Ndjson(p) => p.flush(session),
        }
    }
}

/// Plain framing: header detection on the first chunk, raw text afterwards.
#[derive(Debug, Default)]
pub struct PlainParser {
    header_checked: bool,
}

impl PlainParser {
    fn feed(&mut self, text: &str, session: &mut StreamSession) -> Applied {
        let mut applied = Applied::default();
        if text.is_empty() {
            return applied;
        }

        if !self.header_checked {
            self.header_checked = true;
            let header = serde_json::from_str::<serde_json::Value>(text.trim())
                .ok()
                .filter(serde_json::Value::is_object)
                .and_then(|v| conversation_id_of(&v));
            if let Some(id) = header {
                if session.record_conversation_id(id.clone()) {
                    applied.conversation_id = Some(id);
                }
                session.begin_streaming();
                return applied;
            }
            session.begin_streaming();
        }

        applied.text_changed = session.append(text);
        applied
    }
}

/// NDJSON framing: one JSON object per line.
///
/// A line split across chunks is held until its newline arrives. Lines that
/// are not valid JSON are appended to the display text verbatim.
#[derive(Debug, Default)]
pub struct NdjsonParser {
    line_buf: String,
}

impl NdjsonParser {
    fn feed(&mut self, text: &str, session: &mut StreamSession) -> Applied {
        let mut applied = Applied::default();
        self.line_buf.push_str(text);

        while let Some(newline_pos) = self.line_buf.find('\n') {
            let line = self.line_buf[..newline_pos]
                .trim_end_matches('\r')
                .to_string();
            self.line_buf.drain(..=newline_pos);
            applied.merge(apply_line(&line, session));
        }
        applied
    }

    fn flush(&mut self, session: &mut StreamSession) -> Applied {
        let remaining = std::mem::take(&mut self.line_buf);
        apply_line(remaining.trim_end_matches('\r'), session)
    }
}

fn apply_line(line: &str, session: &mut StreamSession) -> Applied {
    let mut applied = Applied::default();
    if line.trim().is_empty() {
        return applied;
    }

    let json: serde_json::Value = match serde_json::from_str(line) {
        Ok(v) => v,
        Err(e) => {
            // Kept as display text; shares the content buffer.
            tracing::debug!(error = %e, "ndjson line is not JSON, appending verbatim");
            applied.text_changed = session.append(line);
            return applied;
        }
    };

    if let Some(id) = conversation_id_of(&json) {
        if session.record_conversation_id(id.clone()) {
            applied.conversation_id = Some(id);
        } else {
            tracing::warn!(conversation_id = %id, "ignoring conversation id received after content");
        }
    }

    if let Some(content) = json.get(CONTENT_FIELD).and_then(serde_json::Value::as_str) {
        applied.text_changed = session.append(content);
    }

    applied
}

fn conversation_id_of(json: &serde_json::Value) -> Option<String> {
    CONVERSATION_ID_FIELDS
        .iter()
        .find_map(|field| json.get(field)?.as_str())
        .filter(|id| !id.is_empty())
        .map(str::to_string)
}
