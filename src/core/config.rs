//! Static session configuration.
//!
//! There is no config file and no environment lookup: the defaults below are
//! the in-source record of endpoint, credentials, and generation parameters.
//! The CLI can override individual fields before the session starts.

use crate::utils::url::construct_api_url;

/// Which wire shape the completion endpoint speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiFlavor {
    /// Bare proxy: `{"text": ...}` in, `{"response": ...}` out, no auth.
    Proxy,
    /// OpenAI-compatible chat completions with a bearer token.
    OpenAi,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub flavor: ApiFlavor,
    /// For [`ApiFlavor::OpenAi`] this is the API base URL; for
    /// [`ApiFlavor::Proxy`] it is the full endpoint URL.
    pub endpoint: String,
    pub api_key: Option<String>,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub top_p: f32,
    /// Fixed instruction prepended to every OpenAI-flavor context window.
    pub system_instruction: Option<String>,
    /// Number of prior messages included alongside the new user turn.
    pub history_window: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            flavor: ApiFlavor::OpenAi,
            endpoint: "https://api.openai.com/v1".to_string(),
            api_key: None,
            model: "gpt-4o-mini".to_string(),
            max_tokens: 512,
            temperature: 0.7,
            top_p: 0.9,
            system_instruction: Some(
                "You are a helpful assistant. Keep replies short and friendly.".to_string(),
            ),
            history_window: 10,
        }
    }
}

impl Config {
    /// Full URL the turn request is posted to.
    pub fn request_url(&self) -> String {
        match self.flavor {
            ApiFlavor::Proxy => self.endpoint.clone(),
            ApiFlavor::OpenAi => construct_api_url(&self.endpoint, "chat/completions"),
        }
    }
}
