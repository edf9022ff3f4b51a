//! # filo-chat
//!
//! The empathetic text-chat collaborator for the FILO client.
//!
//! One request per user message (full prior history + the new message), one
//! text response, no streaming and no retry. A failed request is absorbed
//! locally: the fixed [`FALLBACK_REPLY`] is substituted and the conversation
//! continues.
//!
//! ```rust,ignore
//! use filo_chat::{Conversation, GeminiChatClient};
//!
//! let client = GeminiChatClient::from_env()?;
//! let mut conversation = Conversation::new();
//! let reply = conversation.send(&client, "I had a rough day.").await;
//! ```

pub mod client;
pub mod config;
pub mod conversation;

pub use client::{EMPTY_REPLY, GeminiChatClient};
pub use config::{ChatConfig, DEFAULT_CHAT_MODEL, SYSTEM_INSTRUCTION};
pub use conversation::{Conversation, FALLBACK_REPLY};
