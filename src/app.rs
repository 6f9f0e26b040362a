use crate::api::ApiError;
use crate::events::AppEvent;
use crate::models::{AppConfig, Message, Profile};
use crate::request::OneShot;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Chat,
    Grammar,
    Profile,
}

impl Page {
    pub const fn title(self) -> &'static str {
        match self {
            Self::Chat => "Chat",
            Self::Grammar => "Grammar Checker",
            Self::Profile => "Random Profile",
        }
    }

    pub const fn next(self) -> Self {
        match self {
            Self::Chat => Self::Grammar,
            Self::Grammar => Self::Profile,
            Self::Profile => Self::Chat,
        }
    }
}

#[derive(Debug)]
pub struct App {
    pub page: Page,
    pub should_quit: bool,
    pub show_help: bool,
    pub exit_pending: bool,

    // Chat
    pub messages: Vec<Message>,
    pub input_buffer: String,
    pub scroll_offset: usize,
    pub chat: OneShot<String>,

    // Grammar checker input; results live in the checker
    pub grammar_input: String,
    /// Quiet period before a check, shown in the help window.
    pub debounce_ms: u64,

    pub profile: OneShot<Profile>,
}

impl App {
    pub fn new() -> Self {
        Self {
            page: Page::Chat,
            should_quit: false,
            show_help: false,
            exit_pending: false,
            messages: Vec::new(),
            input_buffer: String::new(),
            scroll_offset: 0,
            chat: OneShot::default(),
            grammar_input: String::new(),
            debounce_ms: AppConfig::default().debounce_ms,
            profile: OneShot::default(),
        }
    }

    pub const fn quit(&mut self) {
        self.should_quit = true;
    }

    pub const fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    pub const fn next_page(&mut self) {
        self.page = self.page.next();
    }

    pub const fn scroll_up(&mut self, amount: usize) {
        self.scroll_offset = self.scroll_offset.saturating_sub(amount);
    }

    pub const fn scroll_down(&mut self, amount: usize) {
        self.scroll_offset = self.scroll_offset.saturating_add(amount);
    }

    pub const fn scroll_to_top(&mut self) {
        self.scroll_offset = 0;
    }

    pub const fn scroll_to_bottom(&mut self) {
        // The renderer clamps this to the real maximum
        self.scroll_offset = usize::MAX;
    }

    /// Move the chat input into the history and return the prompt to send.
    /// `None` when the input is blank or a reply is still pending.
    pub fn start_chat(&mut self) -> Option<String> {
        if self.input_buffer.trim().is_empty() || !self.chat.begin() {
            return None;
        }
        let prompt = std::mem::take(&mut self.input_buffer);
        self.messages.push(Message::user(prompt.clone()));
        self.scroll_to_bottom();
        Some(prompt)
    }

    pub fn finish_chat(&mut self, outcome: Result<String, ApiError>) {
        match &outcome {
            Ok(reply) => self.messages.push(Message::model(reply.clone())),
            Err(err) if !err.is_cancelled() => {
                self.messages.push(Message::model(err.user_message().to_string()));
            }
            Err(_) => {}
        }
        self.chat.settle(outcome);
        self.scroll_to_bottom();
    }

    /// Returns whether a profile request should be sent.
    pub fn start_profile(&mut self) -> bool {
        self.profile.begin()
    }

    pub fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::ChatReplied(outcome) => self.finish_chat(outcome),
            AppEvent::ProfileFetched(outcome) => self.profile.settle(outcome),
        }
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}
