use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, Page};
use crate::grammar::{CheckerState, Verdict};
use crate::models::MessageRole;

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let x = area.width.saturating_sub(width) / 2;
    let y = area.height.saturating_sub(height) / 2;
    Rect {
        x: area.x + x,
        y: area.y + y,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}

fn field(label: &str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            format!("{label:<12}"),
            Style::default().fg(Color::DarkGray),
        ),
        Span::raw(value),
    ])
}

fn pause_label(debounce_ms: u64) -> String {
    if debounce_ms % 1000 == 0 {
        format!("{}s", debounce_ms / 1000)
    } else {
        format!("{debounce_ms}ms")
    }
}

pub fn render_help_window(frame: &mut Frame, debounce_ms: u64, area: Rect) {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let help_text = vec![
        Line::from(Span::styled(
            "Tanya - Keyboard Shortcuts",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled("General:", bold)),
        Line::from("  Tab           - Next page"),
        Line::from("  Ctrl+H        - Show/hide this help"),
        Line::from("  Ctrl+Q        - Quit application"),
        Line::from("  Ctrl+C        - Quit (press twice to confirm)"),
        Line::from(""),
        Line::from(Span::styled("Chat:", bold)),
        Line::from("  Enter         - Send message"),
        Line::from("  Up/Down       - Scroll history"),
        Line::from("  PgUp/PgDn     - Scroll history"),
        Line::from("  Home/End      - Jump to start/end"),
        Line::from(""),
        Line::from(Span::styled("Grammar Checker:", bold)),
        Line::from(format!(
            "  Typing        - Checked after {} pause",
            pause_label(debounce_ms)
        )),
        Line::from("  Ctrl+L        - Clear text"),
        Line::from(""),
        Line::from(Span::styled("Random Profile:", bold)),
        Line::from("  Enter/Ctrl+R  - Generate another profile"),
        Line::from(""),
        Line::from(Span::styled(
            "Press Ctrl+H or Esc to close",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let help_paragraph = Paragraph::new(help_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Help ")
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .wrap(Wrap { trim: false });

    let popup_area = centered(area, 60, 25);
    frame.render_widget(Clear, popup_area);
    frame.render_widget(help_paragraph, popup_area);
}

pub fn render_tab_bar(frame: &mut Frame, current: Page, area: Rect) {
    let mut spans = Vec::new();
    for page in [Page::Chat, Page::Grammar, Page::Profile] {
        let style = if page == current {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Cyan)
        };
        spans.push(Span::styled(format!(" {} ", page.title()), style));
        spans.push(Span::raw(" "));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

pub fn render_bottom_bar(frame: &mut Frame, app: &App, area: Rect) {
    let (text, style) = if app.exit_pending {
        (
            "Press Ctrl+C again to exit, Esc to cancel",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )
    } else {
        let keys = match app.page {
            Page::Chat => "Ctrl+C: Quit | Ctrl+H: Help | Tab: Next page | Enter: Send",
            Page::Grammar => "Ctrl+C: Quit | Ctrl+H: Help | Tab: Next page | Ctrl+L: Clear",
            Page::Profile => "Ctrl+C: Quit | Ctrl+H: Help | Tab: Next page | Ctrl+R: New profile",
        };
        (keys, Style::default().fg(Color::DarkGray))
    };

    let bar = Paragraph::new(text)
        .alignment(Alignment::Center)
        .style(style);

    frame.render_widget(bar, area);
}

fn render_status_line(frame: &mut Frame, text: &str, color: Color, area: Rect) {
    let status = Paragraph::new(text.to_string())
        .alignment(Alignment::Right)
        .style(Style::default().fg(color).add_modifier(Modifier::BOLD));
    frame.render_widget(status, area);
}

pub fn render_chat_status(frame: &mut Frame, app: &App, area: Rect) {
    if app.chat.is_loading {
        render_status_line(frame, "AI is typing...", Color::Yellow, area);
    } else if let Some(error) = &app.chat.error {
        render_status_line(frame, error, Color::Red, area);
    }
}

pub fn render_grammar_status(frame: &mut Frame, state: &CheckerState, area: Rect) {
    if state.latest_text.trim().is_empty() {
        return;
    }
    if state.is_checking {
        render_status_line(frame, "Checking grammar...", Color::Yellow, area);
    } else if state.is_waiting {
        render_status_line(frame, "Waiting for you to stop typing...", Color::DarkGray, area);
    } else if let Some(checked_at) = state.last_checked_at {
        let text = format!("Last checked: {}", checked_at.format("%H:%M:%S"));
        render_status_line(frame, &text, Color::Green, area);
    }
}

pub fn render_profile_status(frame: &mut Frame, app: &App, area: Rect) {
    if app.profile.is_loading {
        render_status_line(frame, "Generating profile...", Color::Yellow, area);
    }
}

pub fn render_chat_history(frame: &mut Frame, app: &mut App, area: Rect) {
    if app.messages.is_empty() {
        let welcome_text = vec![
            Line::from(Span::styled(
                "Ask the AI anything",
                Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                "Type a question below and press Enter",
                Style::default().fg(Color::Cyan),
            )),
        ];
        let welcome_paragraph = Paragraph::new(welcome_text).alignment(Alignment::Center);

        // Sit at the bottom of the history area
        let welcome_height = 2;
        let welcome_area = Rect {
            x: area.x,
            y: area.y + area.height.saturating_sub(welcome_height),
            width: area.width,
            height: welcome_height.min(area.height),
        };

        frame.render_widget(welcome_paragraph, welcome_area);
        return;
    }

    let mut lines = Vec::new();
    for message in &app.messages {
        let (role, color) = match message.role {
            MessageRole::User => ("You", Color::Cyan),
            MessageRole::Model => ("AI", Color::Green),
        };

        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("## {role}"),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )));
        for content_line in message.content.lines() {
            lines.push(Line::from(content_line.to_string()));
        }
    }
    if app.chat.is_loading {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "...",
            Style::default().fg(Color::DarkGray),
        )));
    }

    // Visual height after wrapping decides how far we can scroll
    let available_width = (area.width as usize).max(1);
    let total_visual_lines: usize = lines
        .iter()
        .map(|line| line.width().div_ceil(available_width).max(1))
        .sum();

    let max_scroll = total_visual_lines.saturating_sub(area.height as usize);
    let actual_scroll = app.scroll_offset.min(max_scroll);
    app.scroll_offset = actual_scroll;

    let chat_history = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((u16::try_from(actual_scroll).unwrap_or(u16::MAX), 0));

    frame.render_widget(chat_history, area);
}

pub fn render_grammar_result(frame: &mut Frame, state: &CheckerState, area: Rect) {
    let mut lines = Vec::new();

    if let Some(error) = &state.last_error {
        lines.push(Line::from(Span::styled(
            format!("! {error}"),
            Style::default().fg(Color::Red),
        )));
        lines.push(Line::from(""));
    }

    match &state.last_result {
        Some(result) if !state.is_checking => {
            let (badge, color, heading) = match result.status {
                Verdict::Correct => ("Correct", Color::Green, "Explanation"),
                Verdict::Incorrect => ("Incorrect", Color::Red, "Correction"),
            };
            lines.push(Line::from(Span::styled(
                format!(" {badge} "),
                Style::default()
                    .fg(Color::Black)
                    .bg(color)
                    .add_modifier(Modifier::BOLD),
            )));
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                "Original text",
                Style::default().fg(Color::DarkGray),
            )));
            lines.push(Line::from(Span::styled(
                format!("\"{}\"", result.original_text),
                Style::default().add_modifier(Modifier::ITALIC),
            )));
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                heading,
                Style::default().fg(Color::DarkGray),
            )));
            lines.push(Line::from(Span::styled(
                result.correction.clone(),
                Style::default().fg(color),
            )));
        }
        _ if lines.is_empty() => {
            lines.push(Line::from(Span::styled(
                "Type in English below. The AI checks your grammar once you stop typing.",
                Style::default().fg(Color::DarkGray),
            )));
        }
        _ => {}
    }

    let result = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Grammar ")
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .wrap(Wrap { trim: false });
    frame.render_widget(result, area);
}

pub fn render_profile(frame: &mut Frame, app: &App, area: Rect) {
    let mut lines = Vec::new();

    if let Some(error) = app.profile.error.as_ref().filter(|_| !app.profile.is_loading) {
        lines.push(Line::from(Span::styled(
            format!("! {error}"),
            Style::default().fg(Color::Red),
        )));
        lines.push(Line::from(Span::styled(
            "Press Ctrl+R to try again",
            Style::default().fg(Color::DarkGray),
        )));
        lines.push(Line::from(""));
    }

    if let Some(profile) = &app.profile.value {
        lines.push(Line::from(Span::styled(
            profile.full_name(),
            Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(""));
        lines.push(field("Email", profile.email.clone()));
        lines.push(field("Phone", profile.phone.clone()));
        lines.push(field("Cell", profile.cell.clone()));
        lines.push(field(
            "Born",
            format!("{} (age {})", profile.birth_date(), profile.dob.age),
        ));
        lines.push(field("Address", profile.full_address()));
        lines.push(field("Gender", profile.gender.clone()));
        lines.push(field("Nationality", profile.nat.clone()));
        lines.push(field("Picture", profile.picture.large.clone()));
    } else if !app.profile.is_loading && lines.is_empty() {
        lines.push(Line::from(Span::styled(
            "Press Ctrl+R to generate a profile",
            Style::default().fg(Color::DarkGray),
        )));
    }

    let card = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Profile ")
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .wrap(Wrap { trim: false });
    frame.render_widget(card, area);
}

pub fn render_input_field(
    frame: &mut Frame,
    text: &str,
    placeholder: &str,
    enabled: bool,
    area: Rect,
) {
    let (input_text, input_style) = if text.is_empty() {
        (placeholder, Style::default().fg(Color::Gray))
    } else {
        (
            text,
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )
    };
    let border = if enabled { Color::Cyan } else { Color::DarkGray };

    let input = Paragraph::new(input_text.to_string())
        .style(input_style)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border)),
        )
        .wrap(Wrap { trim: false });

    frame.render_widget(input, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiError;
    use crate::grammar::CheckerState;
    use crate::ui::tests::draw;

    #[test]
    fn test_centered_popup_fits_area() {
        let area = Rect::new(0, 0, 40, 10);
        let popup = centered(area, 60, 25);
        assert_eq!(popup.width, 40);
        assert_eq!(popup.height, 10);

        let popup = centered(Rect::new(0, 0, 100, 30), 60, 20);
        assert_eq!((popup.x, popup.y), (20, 5));
    }

    #[test]
    fn test_chat_history_shows_messages_and_clamps_scroll() {
        let mut app = App::new();
        app.input_buffer = "Hello there".to_string();
        app.start_chat();
        app.finish_chat(Ok("General Kenobi".to_string()));

        let screen = draw(&mut app, &CheckerState::default());
        assert!(screen.contains("## You"));
        assert!(screen.contains("General Kenobi"));
        assert_ne!(app.scroll_offset, usize::MAX);
    }

    #[test]
    fn test_profile_error_offers_retry() {
        let mut app = App::new();
        app.page = Page::Profile;
        app.start_profile();
        app.profile.settle(Err(ApiError::Status {
            status: 500,
            body: String::new(),
        }));

        let screen = draw(&mut app, &CheckerState::default());
        assert!(screen.contains("Something went wrong. Please try again."));
        assert!(screen.contains("Press Ctrl+R to try again"));
    }

    #[test]
    fn test_grammar_result_hidden_while_checking() {
        let mut app = App::new();
        app.page = Page::Grammar;
        app.grammar_input = "Hello".to_string();
        let state = CheckerState {
            latest_text: "Hello".to_string(),
            is_checking: true,
            last_result: Some(crate::grammar::CheckResult {
                status: Verdict::Correct,
                correction: "Looks fine".to_string(),
                original_text: "Hello".to_string(),
            }),
            ..CheckerState::default()
        };

        let screen = draw(&mut app, &state);
        assert!(screen.contains("Checking grammar..."));
        assert!(!screen.contains("Looks fine"));
    }

    #[test]
    fn test_help_window_shows_configured_pause() {
        let mut app = App::new();
        app.show_help = true;
        app.debounce_ms = 750;
        let screen = draw(&mut app, &CheckerState::default());
        assert!(screen.contains("Checked after 750ms pause"));
        assert!(screen.contains("press twice to confirm"));
        assert!(screen.contains("Enter/Ctrl+R"));

        assert_eq!(pause_label(1000), "1s");
        assert_eq!(pause_label(2000), "2s");
    }
}
