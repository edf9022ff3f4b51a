//! Conversation state for the empathetic chat.

use filo_core::{ChatMessage, ChatModel};

/// Reply substituted when the chat request fails.
///
/// This is the one place the client tolerates failure without tearing down
/// state: the conversation simply continues.
pub const FALLBACK_REPLY: &str =
    "I'm having a technical issue. I'm still here for you, but my response might be limited.";

/// A running chat conversation.
#[derive(Debug, Default)]
pub struct Conversation {
    history: Vec<ChatMessage>,
}

impl Conversation {
    /// Start an empty conversation.
    pub fn new() -> Self {
        Self::default()
    }

    /// All turns so far, oldest first.
    pub fn history(&self) -> &[ChatMessage] {
        &self.history
    }

    /// Send a user message and record the exchange.
    ///
    /// The request carries the history as it stood before this message. On
    /// failure the fixed fallback reply is substituted; the user message and
    /// the reply are appended to the history either way.
    pub async fn send(&mut self, model: &dyn ChatModel, text: impl Into<String>) -> String {
        let text = text.into();
        let reply = match model.reply(&self.history, &text).await {
            Ok(reply) => reply,
            Err(e) => {
                tracing::error!(model = model.name(), error = %e, "Chat request failed");
                FALLBACK_REPLY.to_string()
            }
        };

        self.history.push(ChatMessage::user(text));
        self.history.push(ChatMessage::model(reply.clone()));
        reply
    }
}
