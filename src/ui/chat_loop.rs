//! Main chat event loop.
//!
//! Drives the terminal UI: polls crossterm events, forwards accepted input to
//! the turn service, drains turn outcomes back into the conversation, and
//! redraws. The single-flight guard lives in the controller; this loop only
//! wires events to it.

use std::{
    error::Error,
    io,
    time::{Duration, Instant},
};

use ratatui::crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use crate::core::config::Config;
use crate::core::conversation::{ConversationController, ConversationState};
use crate::core::session::SessionContext;
use crate::core::turn::{TurnParams, TurnService};
use crate::ui::render::{
    available_transcript_height, build_display_lines, max_scroll_offset, ui,
};

pub async fn run_chat(config: Config, log_file: Option<String>) -> Result<(), Box<dyn Error>> {
    let mut session = SessionContext::new(config, log_file)?;
    let mut state = ConversationState::default();
    let (turn_service, mut rx) = TurnService::new();

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut input = String::new();
    let mut scroll_offset: u16 = 0;
    let mut auto_scroll = true;

    let result = loop {
        ConversationController::new(&mut session, &mut state).expire_status(Instant::now());

        terminal.draw(|f| ui(f, &state, &input, scroll_offset))?;

        let term_height = terminal.size().map(|s| s.height).unwrap_or(0);
        let available_height = available_transcript_height(term_height, state.status.is_some());

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match key.code {
                        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                            break Ok(());
                        }
                        KeyCode::Char('l') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                            ConversationController::new(&mut session, &mut state)
                                .clear_conversation();
                            scroll_offset = 0;
                            auto_scroll = true;
                        }
                        KeyCode::Enter => {
                            let pending = ConversationController::new(&mut session, &mut state)
                                .send_turn(&input);
                            if let Some(pending) = pending {
                                input.clear();
                                auto_scroll = true;
                                turn_service.spawn_turn(TurnParams {
                                    client: session.client.clone(),
                                    config: session.config.clone(),
                                    text: pending.text,
                                    api_messages: pending.api_messages,
                                    turn_id: pending.turn_id,
                                });
                            }
                        }
                        KeyCode::Char(c) => {
                            input.push(c);
                        }
                        KeyCode::Backspace => {
                            input.pop();
                        }
                        KeyCode::Up => {
                            auto_scroll = false;
                            scroll_offset = scroll_offset.saturating_sub(1);
                        }
                        KeyCode::Down => {
                            let total_lines = build_display_lines(&state).len() as u16;
                            let max_offset = max_scroll_offset(total_lines, available_height);
                            scroll_offset = scroll_offset.saturating_add(1).min(max_offset);
                            if scroll_offset >= max_offset {
                                auto_scroll = true;
                            }
                        }
                        _ => {}
                    }
                }
            }
        }

        while let Ok((turn_event, turn_id)) = rx.try_recv() {
            ConversationController::new(&mut session, &mut state)
                .apply_turn_event(turn_event, turn_id);
        }

        if auto_scroll {
            let total_lines = build_display_lines(&state).len() as u16;
            scroll_offset = max_scroll_offset(total_lines, available_height);
        }
    };

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}
