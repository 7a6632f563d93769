//! Error mapping for the dashboard API.

use policy_chat_types::StreamError;

/// Errors from the non-streaming client calls and configuration.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The server answered with a non-success status.
    #[error("{message}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Message from the error payload, or a generic fallback.
        message: String,
    },
    /// The request could not be sent or the response could not be read.
    #[error("network error: {0}")]
    Network(#[source] reqwest::Error),
    /// The response body did not have the expected shape.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
    /// A configuration value could not be used.
    #[error("invalid configuration: {0}")]
    Config(String),
}

/// Pull a human-readable message out of an error payload.
///
/// Looks for a string `detail` field, then a string `message` field.
pub(crate) fn payload_message(body: &str) -> Option<String> {
    let json: serde_json::Value = serde_json::from_str(body).ok()?;
    ["detail", "message"]
        .iter()
        .find_map(|field| json.get(field)?.as_str())
        .map(str::trim)
        .filter(|msg| !msg.is_empty())
        .map(str::to_string)
}

/// Map a non-success response to the [`StreamError`] surfaced to the UI.
pub(crate) fn map_http_status(status: reqwest::StatusCode, body: &str) -> StreamError {
    let message = payload_message(body)
        .unwrap_or_else(|| format!("Request failed with status {}", status.as_u16()));
    StreamError::Http {
        status: status.as_u16(),
        message,
    }
}

/// Map a [`reqwest::Error`] raised before any body was read.
pub(crate) fn map_reqwest_error(err: &reqwest::Error) -> StreamError {
    if err.is_timeout() {
        StreamError::Network("request timed out".into())
    } else if err.is_connect() {
        StreamError::Network(format!("could not connect to server: {err}"))
    } else {
        StreamError::Network(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detail_field_is_used() {
        let err = map_http_status(reqwest::StatusCode::BAD_REQUEST, r#"{"detail":"bad request"}"#);
        assert_eq!(err.to_string(), "bad request");
        assert_eq!(err.status(), Some(400));
    }

    #[test]
    fn message_field_is_used() {
        let err = map_http_status(
            reqwest::StatusCode::NOT_FOUND,
            r#"{"message":"Policy not found"}"#,
        );
        assert_eq!(err.to_string(), "Policy not found");
    }

    #[test]
    fn detail_wins_over_message() {
        let msg = payload_message(r#"{"message":"second","detail":"first"}"#);
        assert_eq!(msg.as_deref(), Some("first"));
    }

    #[test]
    fn non_string_detail_falls_back_to_message() {
        let msg = payload_message(r#"{"detail":[{"loc":["body"]}],"message":"Invalid policy data"}"#);
        assert_eq!(msg.as_deref(), Some("Invalid policy data"));
    }

    #[test]
    fn non_json_body_uses_generic_message() {
        let err = map_http_status(reqwest::StatusCode::BAD_GATEWAY, "<html>bad gateway</html>");
        assert_eq!(err.to_string(), "Request failed with status 502");
        assert!(err.is_retryable());
    }

    #[test]
    fn empty_body_uses_generic_message() {
        let err = map_http_status(reqwest::StatusCode::INTERNAL_SERVER_ERROR, "");
        assert_eq!(err.to_string(), "Request failed with status 500");
    }

    #[test]
    fn blank_detail_is_ignored() {
        assert!(payload_message(r#"{"detail":"   "}"#).is_none());
    }
}
