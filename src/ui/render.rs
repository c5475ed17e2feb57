//! Transcript rendering.
//!
//! `build_display_lines` is a pure projection of [`ConversationState`] into a
//! declarative list of styled lines; the event loop hands the result to
//! ratatui unchanged. Keeping it pure keeps the view testable without a
//! terminal.

use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph, Wrap},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::core::conversation::ConversationState;

/// Pending marker shown while a turn is in flight.
pub const TYPING_INDICATOR: &str = "· · ·";

pub fn build_display_lines(state: &ConversationState) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    for msg in &state.messages {
        if msg.is_user() {
            lines.push(Line::from(vec![
                Span::styled(
                    "You: ",
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(msg.content.clone(), Style::default().fg(Color::Cyan)),
            ]));
            lines.push(Line::from(""));
        } else {
            for content_line in msg.content.lines() {
                if content_line.trim().is_empty() {
                    lines.push(Line::from(""));
                } else {
                    lines.push(Line::from(Span::styled(
                        content_line.to_string(),
                        Style::default().fg(Color::White),
                    )));
                }
            }
            lines.push(Line::from(""));
        }
    }

    if state.is_loading {
        lines.push(Line::from(Span::styled(
            TYPING_INDICATOR,
            Style::default().fg(Color::DarkGray),
        )));
        lines.push(Line::from(""));
    }

    lines
}

pub fn max_scroll_offset(total_lines: u16, available_height: u16) -> u16 {
    total_lines.saturating_sub(available_height)
}

/// Transcript height for a given terminal height: everything minus the title
/// row, the input box, and the banner row when one is showing.
pub fn available_transcript_height(term_height: u16, has_banner: bool) -> u16 {
    let banner_rows = if has_banner { 1 } else { 0 };
    term_height.saturating_sub(3 + 1 + banner_rows)
}

pub fn ui(f: &mut Frame, state: &ConversationState, input: &str, scroll_offset: u16) {
    let has_banner = state.status.is_some();

    let mut constraints = vec![Constraint::Min(0)];
    if has_banner {
        constraints.push(Constraint::Length(1));
    }
    constraints.push(Constraint::Length(3));

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(f.area());

    let lines = build_display_lines(state);
    let available_height = chunks[0].height.saturating_sub(1);
    let max_offset = max_scroll_offset(lines.len() as u16, available_height);

    let transcript = Paragraph::new(lines)
        .block(Block::default().title("Causette"))
        .wrap(Wrap { trim: true })
        .scroll((scroll_offset.min(max_offset), 0));
    f.render_widget(transcript, chunks[0]);

    if let Some(status) = &state.status {
        let banner = Paragraph::new(status.as_str()).style(
            Style::default()
                .fg(Color::Red)
                .add_modifier(Modifier::BOLD),
        );
        f.render_widget(banner, chunks[1]);
    }

    let input_area = chunks[chunks.len() - 1];
    let input_box = Paragraph::new(input)
        .style(Style::default().fg(Color::Yellow))
        .block(
            Block::bordered().title("Type your message (Enter to send, Ctrl+L to clear, Ctrl+C to quit)"),
        );
    f.render_widget(input_box, input_area);

    f.set_cursor_position((
        input_area.x + input.width() as u16 + 1,
        input_area.y + 1,
    ));
}
