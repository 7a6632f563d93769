//! Body framing conventions used by the chat endpoints.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// How a streamed response body is structured.
///
/// Chosen by endpoint, never negotiated with the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FramingMode {
    /// Raw display text, optionally preceded by a single JSON header chunk.
    /// Used by the single-policy chat.
    Plain,
    /// One JSON object per line. Used by the comparison chat.
    Ndjson,
}

impl fmt::Display for FramingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Plain => f.write_str("plain"),
            Self::Ndjson => f.write_str("ndjson"),
        }
    }
}

impl FromStr for FramingMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "plain" => Ok(Self::Plain),
            "ndjson" => Ok(Self::Ndjson),
            other => Err(format!("unknown framing mode: {other}")),
        }
    }
}
