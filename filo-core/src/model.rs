//! The seam to the text-chat collaborator.

use crate::content::ChatMessage;
use crate::error::Result;
use async_trait::async_trait;

/// A generative-language model that answers one user message at a time.
///
/// Each call is a single request/response: the full prior turn history plus
/// the new message go out, one text reply comes back. There is no streaming
/// and no retry at this seam; callers decide how a failure is absorbed.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Model identifier, for logging.
    fn name(&self) -> &str;

    /// Generate a reply to `message` given the prior `history`.
    async fn reply(&self, history: &[ChatMessage], message: &str) -> Result<String>;
}
