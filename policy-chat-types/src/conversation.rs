//! Request bodies and conversation listings for the chat API.

use serde::{Deserialize, Serialize};

/// A question about a single policy. Answered in plain framing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    /// The user's question.
    pub message: String,
    /// The policy being discussed, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy_id: Option<i64>,
    /// Identifier of the conversation this message continues.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<String>,
}

impl ChatRequest {
    /// A new question with no policy or conversation attached.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Default::default()
        }
    }

    /// Attach the policy under discussion.
    #[must_use]
    pub fn policy(mut self, policy_id: i64) -> Self {
        self.policy_id = Some(policy_id);
        self
    }

    /// Continue an existing conversation.
    #[must_use]
    pub fn conversation(mut self, id: impl Into<String>) -> Self {
        self.conversation_id = Some(id.into());
        self
    }
}

/// A question comparing several policies. Answered in NDJSON framing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompareRequest {
    /// The user's question.
    pub message: String,
    /// Policies to compare.
    pub policy_ids: Vec<i64>,
    /// Identifier of the conversation this message continues.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<String>,
}

impl CompareRequest {
    /// A new comparison question over `policy_ids`.
    #[must_use]
    pub fn new(message: impl Into<String>, policy_ids: impl IntoIterator<Item = i64>) -> Self {
        Self {
            message: message.into(),
            policy_ids: policy_ids.into_iter().collect(),
            conversation_id: None,
        }
    }

    /// Continue an existing conversation.
    #[must_use]
    pub fn conversation(mut self, id: impl Into<String>) -> Self {
        self.conversation_id = Some(id.into());
        self
    }
}

/// One entry of the recent conversations listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationSummary {
    /// Conversation identifier, usable as `conversation_id` on later requests.
    pub id: String,
    /// Display title.
    pub title: String,
    /// Last update time as sent by the server.
    pub updated_at: String,
    /// Which chat produced the conversation (single policy or comparison).
    #[serde(default)]
    pub workflow: String,
}
