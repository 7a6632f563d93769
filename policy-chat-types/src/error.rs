//! Error types surfaced to the UI by the stream consumer.
//!
//! Malformed NDJSON lines are not errors: the consumer recovers from them
//! locally and they never appear here.

/// A failure that ends a stream.
///
/// The [`Display`](std::fmt::Display) output is meant to be shown to the user
/// as-is.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StreamError {
    /// The server answered with a non-success status.
    ///
    /// `message` comes from the error payload's `detail` or `message` field
    /// when present, otherwise it is a generic description of the status.
    #[error("{message}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Human-readable message.
        message: String,
    },
    /// The request never produced a response (connection refused, DNS, timeout).
    #[error("network error: {0}")]
    Network(String),
    /// The server accepted the request but sent no body to stream.
    #[error("the server returned an empty response")]
    EmptyBody,
    /// Reading the body failed after streaming had started.
    #[error("stream read error: {0}")]
    Read(String),
}

impl StreamError {
    /// Whether retrying the same request might succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(_) | Self::Read(_) => true,
            Self::Http { status, .. } => *status == 429 || (500..=599).contains(status),
            Self::EmptyBody => false,
        }
    }

    /// The HTTP status, for [`StreamError::Http`].
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_error_displays_message_only() {
        let err = StreamError::Http {
            status: 400,
            message: "bad request".into(),
        };
        assert_eq!(err.to_string(), "bad request");
        assert_eq!(err.status(), Some(400));
    }

    #[test]
    fn server_errors_are_retryable() {
        let err = StreamError::Http {
            status: 503,
            message: "unavailable".into(),
        };
        assert!(err.is_retryable());
    }

    #[test]
    fn client_errors_are_not_retryable() {
        let err = StreamError::Http {
            status: 404,
            message: "Policy not found".into(),
        };
        assert!(!err.is_retryable());
    }

    #[test]
    fn empty_body_is_terminal() {
        assert!(!StreamError::EmptyBody.is_retryable());
        assert!(StreamError::EmptyBody.status().is_none());
    }

    #[test]
    fn read_error_display() {
        let err = StreamError::Read("connection reset".into());
        assert_eq!(err.to_string(), "stream read error: connection reset");
        assert!(err.is_retryable());
    }
}
