//! Chat client configuration.

pub(crate) const GENERATIVE_LANGUAGE_API_BASE: &str =
    "https://generativelanguage.googleapis.com/v1beta";

/// Default chat model.
pub const DEFAULT_CHAT_MODEL: &str = "gemini-3-flash-preview";

/// The companion persona sent as the system instruction on every request.
pub const SYSTEM_INSTRUCTION: &str = "You are FILO, an empathetic wellness companion. \
Your goal is to help users understand their stress, loneliness, and work-life balance. \
Keep responses calm, supportive, and concise. \
IMPORTANT: Always include a disclaimer that you are an AI and not a medical professional. \
If a user expresses severe distress, provide links to international crisis hotlines.";

/// Configuration for the chat client.
#[derive(Debug, Clone)]
pub struct ChatConfig {
    /// API credential. May be empty; requests will then be rejected by the
    /// endpoint rather than failing construction.
    pub api_key: String,
    /// Model name.
    pub model: String,
    /// Sampling temperature.
    pub temperature: f32,
    /// Nucleus sampling parameter.
    pub top_p: f32,
    /// Override for the API base URL (tests).
    pub base_url: Option<String>,
}

impl ChatConfig {
    /// Create a configuration with an explicit API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_CHAT_MODEL.to_string(),
            temperature: 0.7,
            top_p: 0.8,
            base_url: None,
        }
    }

    /// Read the API key from `FILO_API_KEY` / `GOOGLE_API_KEY`.
    ///
    /// An absent credential does not block construction; the first request
    /// fails instead.
    pub fn from_env() -> Self {
        let api_key = std::env::var("FILO_API_KEY")
            .or_else(|_| std::env::var("GOOGLE_API_KEY"))
            .unwrap_or_default();
        Self::new(api_key)
    }

    /// Set the model name.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the API base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ChatConfig::new("key");
        assert_eq!(config.model, DEFAULT_CHAT_MODEL);
        assert_eq!(config.temperature, 0.7);
        assert_eq!(config.top_p, 0.8);
        assert!(config.base_url.is_none());
    }
}
