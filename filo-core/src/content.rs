//! Conversation content types.

use serde::{Deserialize, Serialize};

/// Who authored a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    /// The person using the app.
    User,
    /// The companion model.
    Model,
}

impl ChatRole {
    /// Wire name expected by the generative-language API.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Model => "model",
        }
    }
}

/// One turn of the empathetic-chat conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Turn author.
    pub role: ChatRole,
    /// Turn text.
    pub text: String,
}

impl ChatMessage {
    /// Create a user turn.
    pub fn user(text: impl Into<String>) -> Self {
        Self { role: ChatRole::User, text: text.into() }
    }

    /// Create a model turn.
    pub fn model(text: impl Into<String>) -> Self {
        Self { role: ChatRole::Model, text: text.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_wire_names() {
        assert_eq!(ChatRole::User.as_str(), "user");
        assert_eq!(ChatRole::Model.as_str(), "model");
    }

    #[test]
    fn test_message_serialization() {
        let msg = ChatMessage::user("hello");
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains(r#""role":"user""#));
        assert!(json.contains(r#""text":"hello""#));
    }
}
