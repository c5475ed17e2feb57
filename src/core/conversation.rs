use std::time::Instant;

use crate::api::ChatMessage;
use crate::core::constants::{ERROR_BANNER_TTL, REQUEST_FAILED_BANNER};
use crate::core::message::Message;
use crate::core::session::SessionContext;
use crate::core::turn::TurnEvent;

/// Conversation state owned by the controller: the transcript, the
/// single-flight flag, and the transient status banner. The rendered view is
/// always a straight projection of this struct.
#[derive(Default)]
pub struct ConversationState {
    pub messages: Vec<Message>,
    pub is_loading: bool,
    pub status: Option<String>,
    pub status_set_at: Option<Instant>,
}

/// Payload for a turn the controller has accepted. The caller hands it to
/// `TurnService::spawn_turn`; nothing network-related happens before that.
pub struct PendingTurn {
    pub text: String,
    pub api_messages: Vec<ChatMessage>,
    pub turn_id: u64,
}

pub struct ConversationController<'a> {
    session: &'a mut SessionContext,
    state: &'a mut ConversationState,
}

impl<'a> ConversationController<'a> {
    pub fn new(session: &'a mut SessionContext, state: &'a mut ConversationState) -> Self {
        Self { session, state }
    }

    /// Begin a new turn: append the user message, raise the single-flight
    /// flag, and hand back the outbound payload. Returns `None` when the
    /// trimmed input is empty or a turn is already in flight; rejected sends
    /// are not queued.
    pub fn send_turn(&mut self, text: &str) -> Option<PendingTurn> {
        let text = text.trim();
        if text.is_empty() || self.state.is_loading {
            return None;
        }

        self.clear_status();

        if let Err(e) = self.session.logging.log_message(&format!("You: {text}")) {
            tracing::warn!("failed to log message: {e}");
        }

        self.state.messages.push(Message::user(text));
        self.state.is_loading = true;

        let api_messages = self.context_window();
        let turn_id = self.session.next_turn_id();

        Some(PendingTurn {
            text: text.to_string(),
            api_messages,
            turn_id,
        })
    }

    /// Context window for OpenAI-flavor requests: the fixed system
    /// instruction (when configured), then the last `history_window` prior
    /// messages, then the user turn just appended.
    fn context_window(&self) -> Vec<ChatMessage> {
        let mut api_messages = Vec::new();

        if let Some(system) = &self.session.config.system_instruction {
            api_messages.push(ChatMessage {
                role: "system".to_string(),
                content: system.clone(),
            });
        }

        let window = self.session.config.history_window;
        let start = self.state.messages.len().saturating_sub(window + 1);
        for msg in &self.state.messages[start..] {
            api_messages.push(ChatMessage {
                role: msg.role.as_str().to_string(),
                content: msg.content.clone(),
            });
        }

        api_messages
    }

    /// Apply a turn outcome. An outcome whose id no longer matches the
    /// session's counter belongs to a cleared or superseded conversation and
    /// is dropped without touching state.
    pub fn apply_turn_event(&mut self, event: TurnEvent, turn_id: u64) {
        if turn_id != self.session.current_turn_id {
            tracing::debug!(turn_id, "dropping stale turn outcome");
            return;
        }

        self.state.is_loading = false;

        match event {
            TurnEvent::Reply(content) => {
                if let Err(e) = self.session.logging.log_message(&content) {
                    tracing::warn!("failed to log response: {e}");
                }
                self.state.messages.push(Message::assistant(content));
            }
            TurnEvent::Failed(reason) => {
                tracing::error!("turn request failed: {reason}");
                self.set_status(REQUEST_FAILED_BANNER);
            }
        }
    }

    /// Reset the transcript. No network effect: an in-flight request keeps
    /// running, but its id goes stale so the late outcome cannot resurrect
    /// the cleared conversation.
    pub fn clear_conversation(&mut self) {
        self.state.messages.clear();
        self.state.is_loading = false;
        self.clear_status();
        self.session.discard_pending_turn();
    }

    pub fn set_status<S: Into<String>>(&mut self, s: S) {
        self.state.status = Some(s.into());
        self.state.status_set_at = Some(Instant::now());
    }

    pub fn clear_status(&mut self) {
        self.state.status = None;
        self.state.status_set_at = None;
    }

    /// Dismiss the banner once it has been visible for its full TTL.
    pub fn expire_status(&mut self, now: Instant) {
        if let Some(set_at) = self.state.status_set_at {
            if now.duration_since(set_at) >= ERROR_BANNER_TTL {
                self.clear_status();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::Config;

    fn fixtures() -> (SessionContext, ConversationState) {
        let session = SessionContext::new(Config::default(), None).expect("session");
        (session, ConversationState::default())
    }

    fn fixtures_with(config: Config) -> (SessionContext, ConversationState) {
        let session = SessionContext::new(config, None).expect("session");
        (session, ConversationState::default())
    }

    #[test]
    fn send_turn_appends_exactly_one_user_message() {
        let (mut session, mut state) = fixtures();
        let mut controller = ConversationController::new(&mut session, &mut state);

        let pending = controller.send_turn("  hello  ").expect("pending turn");
        assert_eq!(pending.text, "hello");

        assert_eq!(state.messages.len(), 1);
        assert!(state.messages[0].is_user());
        assert_eq!(state.messages[0].content, "hello");
        assert!(state.is_loading);
    }

    #[test]
    fn empty_input_is_rejected() {
        let (mut session, mut state) = fixtures();
        let mut controller = ConversationController::new(&mut session, &mut state);

        assert!(controller.send_turn("").is_none());
        assert!(controller.send_turn("   \n  ").is_none());
        assert!(state.messages.is_empty());
        assert!(!state.is_loading);
    }

    #[test]
    fn sends_while_loading_are_noops() {
        let (mut session, mut state) = fixtures();
        let mut controller = ConversationController::new(&mut session, &mut state);

        controller.send_turn("first").expect("pending turn");
        assert!(controller.send_turn("second").is_none());

        assert_eq!(state.messages.len(), 1);
        assert_eq!(state.messages[0].content, "first");
    }

    #[test]
    fn reply_appends_one_assistant_message_and_clears_loading() {
        let (mut session, mut state) = fixtures();
        let mut controller = ConversationController::new(&mut session, &mut state);

        let pending = controller.send_turn("hello").expect("pending turn");
        controller.apply_turn_event(TurnEvent::Reply("hi".to_string()), pending.turn_id);

        assert_eq!(state.messages.len(), 2);
        assert!(state.messages[1].is_assistant());
        assert_eq!(state.messages[1].content, "hi");
        assert!(!state.is_loading);
        assert!(state.status.is_none());
    }

    #[test]
    fn failure_raises_banner_without_assistant_message() {
        let (mut session, mut state) = fixtures();
        let mut controller = ConversationController::new(&mut session, &mut state);

        let pending = controller.send_turn("hello").expect("pending turn");
        controller.apply_turn_event(TurnEvent::Failed("boom".to_string()), pending.turn_id);

        assert_eq!(state.messages.len(), 1);
        assert!(!state.is_loading);
        assert_eq!(state.status.as_deref(), Some(REQUEST_FAILED_BANNER));
    }

    #[test]
    fn banner_expires_after_its_ttl() {
        let (mut session, mut state) = fixtures();
        let mut controller = ConversationController::new(&mut session, &mut state);

        let pending = controller.send_turn("hello").expect("pending turn");
        controller.apply_turn_event(TurnEvent::Failed("boom".to_string()), pending.turn_id);

        let set_at = state.status_set_at.expect("banner timestamp");
        let mut controller = ConversationController::new(&mut session, &mut state);
        controller.expire_status(set_at + ERROR_BANNER_TTL / 2);
        assert!(state.status.is_some());

        let mut controller = ConversationController::new(&mut session, &mut state);
        controller.expire_status(set_at + ERROR_BANNER_TTL);
        assert!(state.status.is_none());
        assert!(state.status_set_at.is_none());
    }

    #[test]
    fn clear_empties_the_transcript() {
        let (mut session, mut state) = fixtures();
        let mut controller = ConversationController::new(&mut session, &mut state);

        let pending = controller.send_turn("hello").expect("pending turn");
        controller.apply_turn_event(TurnEvent::Reply("hi".to_string()), pending.turn_id);
        controller.clear_conversation();

        assert!(state.messages.is_empty());
        assert!(!state.is_loading);
        assert!(state.status.is_none());
    }

    #[test]
    fn late_outcome_after_clear_is_discarded() {
        let (mut session, mut state) = fixtures();
        let mut controller = ConversationController::new(&mut session, &mut state);

        let pending = controller.send_turn("hello").expect("pending turn");
        controller.clear_conversation();
        controller.apply_turn_event(TurnEvent::Reply("late".to_string()), pending.turn_id);

        assert!(state.messages.is_empty());
        assert!(!state.is_loading);
    }

    #[test]
    fn context_window_includes_system_and_new_turn() {
        let config = Config {
            system_instruction: Some("be terse".to_string()),
            ..Default::default()
        };
        let (mut session, mut state) = fixtures_with(config);
        let mut controller = ConversationController::new(&mut session, &mut state);

        let pending = controller.send_turn("hello").expect("pending turn");

        assert_eq!(pending.api_messages.len(), 2);
        assert_eq!(pending.api_messages[0].role, "system");
        assert_eq!(pending.api_messages[0].content, "be terse");
        assert_eq!(pending.api_messages[1].role, "user");
        assert_eq!(pending.api_messages[1].content, "hello");
    }

    #[test]
    fn context_window_slides_over_long_transcripts() {
        let config = Config {
            system_instruction: None,
            history_window: 4,
            ..Default::default()
        };
        let (mut session, mut state) = fixtures_with(config);

        for i in 0..6 {
            let mut controller = ConversationController::new(&mut session, &mut state);
            let pending = controller
                .send_turn(&format!("question {i}"))
                .expect("pending turn");
            let mut controller = ConversationController::new(&mut session, &mut state);
            controller.apply_turn_event(TurnEvent::Reply(format!("answer {i}")), pending.turn_id);
        }

        let mut controller = ConversationController::new(&mut session, &mut state);
        let pending = controller.send_turn("latest").expect("pending turn");

        // 4 prior messages plus the new user turn, oldest history dropped.
        assert_eq!(pending.api_messages.len(), 5);
        assert_eq!(pending.api_messages[0].content, "question 4");
        assert_eq!(pending.api_messages.last().unwrap().content, "latest");
    }

    #[test]
    fn send_after_failure_clears_the_banner() {
        let (mut session, mut state) = fixtures();
        let mut controller = ConversationController::new(&mut session, &mut state);

        let pending = controller.send_turn("hello").expect("pending turn");
        controller.apply_turn_event(TurnEvent::Failed("boom".to_string()), pending.turn_id);
        assert!(state.status.is_some());

        let mut controller = ConversationController::new(&mut session, &mut state);
        controller.send_turn("again").expect("pending turn");
        assert!(state.status.is_none());
    }
}
