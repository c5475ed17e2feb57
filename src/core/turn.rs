//! One-shot turn requests.
//!
//! Each turn is a single HTTP round trip performed on a spawned task. The
//! outcome comes back over an unbounded channel tagged with the turn id that
//! was current when the turn started; the event loop hands it to the
//! conversation controller, which decides whether the id is still current.

use tokio::sync::mpsc;

use crate::api::{ChatMessage, ChatRequest, ChatResponse, ProxyRequest, ProxyResponse};
use crate::core::config::{ApiFlavor, Config};

#[derive(Clone, Debug)]
pub enum TurnEvent {
    /// The assistant's reply text, already defaulted to the fallback string
    /// when the payload carried no text field.
    Reply(String),
    /// Transport error or non-2xx response; the string is diagnostic only.
    Failed(String),
}

pub struct TurnParams {
    pub client: reqwest::Client,
    pub config: Config,
    /// Newest user text, sent alone to proxy-flavor endpoints.
    pub text: String,
    /// Assembled context window, sent to OpenAI-flavor endpoints.
    pub api_messages: Vec<ChatMessage>,
    pub turn_id: u64,
}

#[derive(Clone)]
pub struct TurnService {
    tx: mpsc::UnboundedSender<(TurnEvent, u64)>,
}

impl TurnService {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<(TurnEvent, u64)>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    pub fn spawn_turn(&self, params: TurnParams) {
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let turn_id = params.turn_id;
            let event = match run_turn(params).await {
                Ok(reply) => TurnEvent::Reply(reply),
                Err(reason) => TurnEvent::Failed(reason),
            };
            let _ = tx.send((event, turn_id));
        });
    }

    #[cfg(test)]
    pub fn send_for_test(&self, event: TurnEvent, turn_id: u64) {
        let _ = self.tx.send((event, turn_id));
    }
}

async fn run_turn(params: TurnParams) -> Result<String, String> {
    let request = params
        .client
        .post(params.config.request_url())
        .header("Content-Type", "application/json");

    let response = match params.config.flavor {
        ApiFlavor::Proxy => {
            request
                .json(&ProxyRequest { text: params.text })
                .send()
                .await
        }
        ApiFlavor::OpenAi => {
            let request = match &params.config.api_key {
                Some(key) => request.header("Authorization", format!("Bearer {key}")),
                None => request,
            };
            let body = ChatRequest {
                model: params.config.model.clone(),
                messages: params.api_messages,
                max_tokens: params.config.max_tokens,
                temperature: params.config.temperature,
                top_p: params.config.top_p,
            };
            request.json(&body).send().await
        }
    };

    let response = response.map_err(|e| e.to_string())?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<no body>".to_string());
        return Err(format!("request failed with status {status}: {body}"));
    }

    match params.config.flavor {
        ApiFlavor::Proxy => response
            .json::<ProxyResponse>()
            .await
            .map(ProxyResponse::reply_text)
            .map_err(|e| e.to_string()),
        ApiFlavor::OpenAi => response
            .json::<ChatResponse>()
            .await
            .map(ChatResponse::reply_text)
            .map_err(|e| e.to_string()),
    }
}
