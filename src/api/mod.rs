use serde::{Deserialize, Serialize};

use crate::core::constants::FALLBACK_REPLY;

#[derive(Serialize, Clone, Debug)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

/// Request body for OpenAI-compatible chat-completion endpoints.
#[derive(Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
    pub temperature: f32,
    pub top_p: f32,
}

#[derive(Deserialize)]
pub struct ChatResponseMessage {
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Deserialize)]
pub struct ChatResponseChoice {
    #[serde(default)]
    pub message: Option<ChatResponseMessage>,
}

#[derive(Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<ChatResponseChoice>,
}

impl ChatResponse {
    /// Text of the first choice, or the fixed fallback when any link in the
    /// payload is missing. A thin payload never fails the turn.
    pub fn reply_text(self) -> String {
        self.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .unwrap_or_else(|| FALLBACK_REPLY.to_string())
    }
}

/// Request body for bare proxy endpoints: just the newest user text.
#[derive(Serialize)]
pub struct ProxyRequest {
    pub text: String,
}

#[derive(Deserialize)]
pub struct ProxyResponse {
    #[serde(default)]
    pub response: Option<String>,
}

impl ProxyResponse {
    pub fn reply_text(self) -> String {
        self.response
            .unwrap_or_else(|| FALLBACK_REPLY.to_string())
    }
}
