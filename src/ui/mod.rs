pub mod widgets;

use crate::app::{App, Page};
use crate::grammar::CheckerState;
use ratatui::{
    layout::{Constraint, Direction, Layout},
    Frame,
};

/// Height of the input box for `text`, borders included.
#[allow(clippy::cast_possible_truncation)]
fn input_height(text: &str, width: u16, screen_height: u16) -> u16 {
    let available_width = (width.saturating_sub(2) as usize).max(1);
    let input_lines = text.chars().count().div_ceil(available_width);

    // Clamp lines: min 1, max about half the screen
    let max_lines = (screen_height as usize / 2).saturating_sub(2).max(1);
    let actual_lines = input_lines.clamp(1, max_lines);

    (actual_lines + 2) as u16
}

pub fn render(frame: &mut Frame, app: &mut App, grammar: &CheckerState) {
    let area = frame.area();
    let input = match app.page {
        Page::Chat => Some(app.input_buffer.as_str()),
        Page::Grammar => Some(app.grammar_input.as_str()),
        Page::Profile => None,
    };
    let input_height = input.map_or(0, |text| input_height(text, area.width, area.height));

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),            // Page tabs
            Constraint::Min(0),               // Page body
            Constraint::Length(1),            // Status line
            Constraint::Length(input_height), // Input field
            Constraint::Length(1),            // Bottom keymap bar
        ])
        .split(area);

    widgets::render_tab_bar(frame, app.page, chunks[0]);
    match app.page {
        Page::Chat => {
            widgets::render_chat_history(frame, app, chunks[1]);
            widgets::render_chat_status(frame, app, chunks[2]);
            widgets::render_input_field(
                frame,
                &app.input_buffer,
                "Type your question...",
                !app.chat.is_loading,
                chunks[3],
            );
        }
        Page::Grammar => {
            widgets::render_grammar_result(frame, grammar, chunks[1]);
            widgets::render_grammar_status(frame, grammar, chunks[2]);
            widgets::render_input_field(
                frame,
                &app.grammar_input,
                "Type an English sentence, e.g. She don't like apples.",
                true,
                chunks[3],
            );
        }
        Page::Profile => {
            widgets::render_profile(frame, app, chunks[1]);
            widgets::render_profile_status(frame, app, chunks[2]);
        }
    }
    widgets::render_bottom_bar(frame, app, chunks[4]);

    if app.show_help {
        widgets::render_help_window(frame, app.debounce_ms, area);
    }
}
