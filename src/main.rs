mod api;
mod app;
mod config;
mod events;
mod grammar;
mod models;
mod request;
mod ui;

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::Backend, prelude::*};
use std::fs::OpenOptions;
use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use api::{GeminiClient, ProfileClient};
use app::{App, Page};
use events::AppEvent;
use grammar::{DebouncedChecker, GrammarEvent};

type Checker = DebouncedChecker<GeminiClient>;

/// Clients plus the channel background requests report back on.
struct Services {
    gemini: Arc<GeminiClient>,
    profiles: ProfileClient,
    events: mpsc::UnboundedSender<AppEvent>,
}

impl Services {
    fn send_chat(&self, prompt: String) {
        let gemini = Arc::clone(&self.gemini);
        let tx = self.events.clone();
        tokio::spawn(async move {
            let outcome = gemini.generate(&prompt).await;
            let _ = tx.send(AppEvent::ChatReplied(outcome));
        });
    }

    fn fetch_profile(&self) {
        let profiles = self.profiles.clone();
        let tx = self.events.clone();
        tokio::spawn(async move {
            let outcome = profiles.fetch().await;
            let _ = tx.send(AppEvent::ProfileFetched(outcome));
        });
    }
}

fn init_logging() -> Result<()> {
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(config::get_log_path()?)
        .context("Failed to open log file")?;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tanya=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(log_file))
        .with_ansi(false)
        .init();

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging()?;
    let config = config::load_config()?;
    if config.gemini_api_key.is_none() {
        tracing::warn!("no API key configured; set {} or edit the config file", config::API_KEY_ENV);
    }

    let http = api::http_client(config.request_timeout_secs)
        .context("Failed to create HTTP client")?;
    let gemini = Arc::new(GeminiClient::new(
        config.gemini_url.clone(),
        config.gemini_api_key.clone(),
        http.clone(),
    ));

    let (tx, mut rx) = mpsc::unbounded_channel::<AppEvent>();
    let (grammar_tx, mut grammar_rx) = mpsc::unbounded_channel::<GrammarEvent>();

    let services = Services {
        gemini: Arc::clone(&gemini),
        profiles: ProfileClient::new(config.profile_url.clone(), http),
        events: tx,
    };
    let mut checker = DebouncedChecker::new(
        gemini,
        Duration::from_millis(config.debounce_ms),
        grammar_tx,
    );

    let mut app = App::new();
    app.debounce_ms = config.debounce_ms;
    if app.start_profile() {
        services.fetch_profile();
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    tracing::info!("tanya started");
    let res = run_app(
        &mut terminal,
        &mut app,
        &mut checker,
        &services,
        &mut rx,
        &mut grammar_rx,
    );
    checker.dispose();

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!(error = ?err, "terminated with error");
        eprintln!("Error: {err:?}");
    }

    Ok(())
}

/// Keys that work on every page. Returns `true` when the key was consumed.
fn handle_global_keys(app: &mut App, key: KeyCode, modifiers: KeyModifiers) -> bool {
    let ctrl = modifiers.contains(KeyModifiers::CONTROL);
    match key {
        KeyCode::Char('c') if ctrl => {
            if app.exit_pending {
                app.quit();
            } else {
                app.exit_pending = true;
            }
            true
        }
        KeyCode::Char('q') if ctrl => {
            app.quit();
            true
        }
        KeyCode::Char('h') if ctrl => {
            app.toggle_help();
            true
        }
        KeyCode::Esc => {
            if app.show_help {
                app.show_help = false;
            } else if app.exit_pending {
                app.exit_pending = false;
            }
            true
        }
        _ if app.show_help => true,
        _ if app.exit_pending => {
            // Any other key cancels pending exit and is then handled normally
            app.exit_pending = false;
            false
        }
        KeyCode::Tab => {
            app.next_page();
            true
        }
        _ => false,
    }
}

/// Whether a key press should be typed into a text field.
const fn is_typed(modifiers: KeyModifiers) -> bool {
    !modifiers.contains(KeyModifiers::CONTROL)
}

fn handle_chat_keys(app: &mut App, key: KeyCode, modifiers: KeyModifiers, services: &Services) {
    match key {
        KeyCode::Up => app.scroll_up(1),
        KeyCode::Down => app.scroll_down(1),
        KeyCode::PageUp => app.scroll_up(10),
        KeyCode::PageDown => app.scroll_down(10),
        KeyCode::Home => app.scroll_to_top(),
        KeyCode::End => app.scroll_to_bottom(),
        KeyCode::Backspace => {
            app.input_buffer.pop();
        }
        KeyCode::Enter => {
            if let Some(prompt) = app.start_chat() {
                services.send_chat(prompt);
            }
        }
        KeyCode::Char(c) if is_typed(modifiers) => app.input_buffer.push(c),
        _ => {}
    }
}

fn handle_grammar_keys(app: &mut App, checker: &mut Checker, key: KeyCode, modifiers: KeyModifiers) {
    match key {
        KeyCode::Char('l') if modifiers.contains(KeyModifiers::CONTROL) => {
            app.grammar_input.clear();
            checker.clear();
        }
        KeyCode::Backspace => {
            if app.grammar_input.pop().is_some() {
                checker.on_input(&app.grammar_input);
            }
        }
        KeyCode::Char(c) if is_typed(modifiers) => {
            app.grammar_input.push(c);
            checker.on_input(&app.grammar_input);
        }
        _ => {}
    }
}

fn handle_profile_keys(app: &mut App, key: KeyCode, modifiers: KeyModifiers, services: &Services) {
    let regenerate = matches!(key, KeyCode::Enter)
        || (key == KeyCode::Char('r') && modifiers.contains(KeyModifiers::CONTROL));
    if regenerate && app.start_profile() {
        services.fetch_profile();
    }
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    checker: &mut Checker,
    services: &Services,
    event_rx: &mut mpsc::UnboundedReceiver<AppEvent>,
    grammar_rx: &mut mpsc::UnboundedReceiver<GrammarEvent>,
) -> Result<()> {
    loop {
        terminal.draw(|f| ui::render(f, app, checker.state()))?;

        // Apply finished background work before reading keys
        while let Ok(app_event) = event_rx.try_recv() {
            app.handle_event(app_event);
        }
        while let Ok(grammar_event) = grammar_rx.try_recv() {
            checker.apply(grammar_event);
        }

        // ~60fps
        if event::poll(Duration::from_millis(16))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press
                    && !handle_global_keys(app, key.code, key.modifiers)
                {
                    match app.page {
                        Page::Chat => handle_chat_keys(app, key.code, key.modifiers, services),
                        Page::Grammar => {
                            handle_grammar_keys(app, checker, key.code, key.modifiers);
                        }
                        Page::Profile => {
                            handle_profile_keys(app, key.code, key.modifiers, services);
                        }
                    }
                }
            }
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctrl() -> KeyModifiers {
        KeyModifiers::CONTROL
    }

    #[test]
    fn test_ctrl_c_needs_confirmation() {
        let mut app = App::new();
        assert!(handle_global_keys(&mut app, KeyCode::Char('c'), ctrl()));
        assert!(app.exit_pending);
        assert!(!app.should_quit);
        assert!(handle_global_keys(&mut app, KeyCode::Char('c'), ctrl()));
        assert!(app.should_quit);
    }

    #[test]
    fn test_other_key_cancels_exit_and_falls_through() {
        let mut app = App::new();
        handle_global_keys(&mut app, KeyCode::Char('c'), ctrl());
        assert!(!handle_global_keys(&mut app, KeyCode::Char('x'), KeyModifiers::NONE));
        assert!(!app.exit_pending);
    }

    #[test]
    fn test_help_swallows_keys() {
        let mut app = App::new();
        handle_global_keys(&mut app, KeyCode::Char('h'), ctrl());
        assert!(app.show_help);
        assert!(handle_global_keys(&mut app, KeyCode::Tab, KeyModifiers::NONE));
        assert_eq!(app.page, Page::Chat);
        assert!(handle_global_keys(&mut app, KeyCode::Esc, KeyModifiers::NONE));
        assert!(!app.show_help);
    }

    #[test]
    fn test_tab_switches_page() {
        let mut app = App::new();
        assert!(handle_global_keys(&mut app, KeyCode::Tab, KeyModifiers::NONE));
        assert_eq!(app.page, Page::Grammar);
    }

    fn unreachable_gemini() -> Arc<GeminiClient> {
        Arc::new(GeminiClient::new(
            "http://127.0.0.1:1/generate".to_string(),
            None,
            api::http_client(None).unwrap(),
        ))
    }

    fn offline_services() -> Services {
        let (tx, _rx) = mpsc::unbounded_channel();
        Services {
            gemini: unreachable_gemini(),
            profiles: ProfileClient::new(
                "http://127.0.0.1:1/api/".to_string(),
                api::http_client(None).unwrap(),
            ),
            events: tx,
        }
    }

    #[test]
    fn test_shift_and_plain_keys_are_typed() {
        assert!(is_typed(KeyModifiers::NONE));
        assert!(is_typed(KeyModifiers::SHIFT));
        assert!(!is_typed(KeyModifiers::CONTROL));
        assert!(!is_typed(KeyModifiers::CONTROL | KeyModifiers::SHIFT));
    }

    #[tokio::test(start_paused = true)]
    async fn test_grammar_keys_feed_checker() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut checker =
            DebouncedChecker::new(unreachable_gemini(), Duration::from_millis(1000), tx);
        let mut app = App::new();

        for c in "Hi".chars() {
            handle_grammar_keys(&mut app, &mut checker, KeyCode::Char(c), KeyModifiers::NONE);
        }
        assert_eq!(app.grammar_input, "Hi");
        assert_eq!(checker.state().latest_text, "Hi");
        assert!(checker.state().is_waiting);

        handle_grammar_keys(&mut app, &mut checker, KeyCode::Char('l'), ctrl());
        assert!(app.grammar_input.is_empty());
        assert!(!checker.state().is_waiting);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unbound_ctrl_keys_do_not_edit_grammar_text() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut checker =
            DebouncedChecker::new(unreachable_gemini(), Duration::from_millis(1000), tx);
        let mut app = App::new();

        for c in "I go".chars() {
            handle_grammar_keys(&mut app, &mut checker, KeyCode::Char(c), KeyModifiers::NONE);
        }
        handle_grammar_keys(&mut app, &mut checker, KeyCode::Char('r'), ctrl());

        assert_eq!(app.grammar_input, "I go");
        assert_eq!(checker.state().latest_text, "I go");
    }

    #[tokio::test]
    async fn test_unbound_ctrl_keys_do_not_edit_chat_message() {
        let services = offline_services();
        let mut app = App::new();

        for c in "Hi".chars() {
            handle_chat_keys(&mut app, KeyCode::Char(c), KeyModifiers::NONE, &services);
        }
        handle_chat_keys(&mut app, KeyCode::Char('!'), KeyModifiers::SHIFT, &services);
        handle_chat_keys(&mut app, KeyCode::Char('l'), ctrl(), &services);
        handle_chat_keys(&mut app, KeyCode::Char('r'), ctrl(), &services);

        assert_eq!(app.input_buffer, "Hi!");
        assert!(!app.chat.is_loading);
    }
}
