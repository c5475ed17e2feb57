use reqwest::Client;

use crate::core::config::Config;
use crate::utils::logging::LoggingState;

/// Everything a conversation needs besides its transcript: the HTTP client,
/// the static configuration, the transcript log, and the turn generation
/// counter used to recognize stale responses.
pub struct SessionContext {
    pub client: Client,
    pub config: Config,
    pub logging: LoggingState,
    pub current_turn_id: u64,
}

impl SessionContext {
    pub fn new(config: Config, log_file: Option<String>) -> Result<Self, Box<dyn std::error::Error>> {
        Ok(Self {
            client: Client::new(),
            config,
            logging: LoggingState::new(log_file)?,
            current_turn_id: 0,
        })
    }

    /// Allocate the id for a new turn. An outcome is applied only while its
    /// id still equals `current_turn_id`.
    pub fn next_turn_id(&mut self) -> u64 {
        self.current_turn_id += 1;
        self.current_turn_id
    }

    /// Invalidate whatever turn may still be in flight. The request itself is
    /// not cancelled; its outcome arrives tagged with a stale id and is
    /// dropped.
    pub fn discard_pending_turn(&mut self) {
        self.current_turn_id += 1;
    }
}
