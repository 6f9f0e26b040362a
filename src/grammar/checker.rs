// Debounced, cancellable grammar checking
//
// Keystrokes restart a quiet-period timer. When the timer fires the checker issues
// one request and aborts whichever request was still outstanding. Background tasks
// never touch state directly: they send `GrammarEvent`s back to the owner, which
// applies them through `DebouncedChecker::apply`. Timer generations and request ids
// tag every event so anything superseded is dropped on arrival.

use chrono::{DateTime, Local};
use futures::future::{AbortHandle, Abortable};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::Instant;

use super::{CheckResult, GrammarBackend};
use crate::api::ApiError;

#[derive(Debug)]
pub enum GrammarEvent {
    /// The quiet period for `text` elapsed.
    Settled { generation: u64, text: String },
    /// A dispatched request resolved.
    Finished {
        request: u64,
        outcome: Result<CheckResult, ApiError>,
    },
}

/// What the presentation layer reads.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckerState {
    pub latest_text: String,
    pub is_waiting: bool,
    pub is_checking: bool,
    pub last_result: Option<CheckResult>,
    pub last_error: Option<String>,
    pub last_checked_at: Option<DateTime<Local>>,
}

#[derive(Debug)]
struct PendingRequest {
    id: u64,
    text: String,
    abort: AbortHandle,
}

pub struct DebouncedChecker<B> {
    backend: Arc<B>,
    debounce: Duration,
    events: UnboundedSender<GrammarEvent>,
    generation: u64,
    last_request_id: u64,
    timer: Option<JoinHandle<()>>,
    pending: Option<PendingRequest>,
    last_dispatched: Option<String>,
    disposed: bool,
    state: CheckerState,
}

impl<B> DebouncedChecker<B> {
    pub const fn state(&self) -> &CheckerState {
        &self.state
    }

    #[cfg(test)]
    pub const fn has_pending_request(&self) -> bool {
        self.pending.is_some()
    }

    /// Cancel the timer and the outstanding request. Every later call is a no-op.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        self.cancel_timer();
        self.cancel_request();
        tracing::debug!("grammar checker disposed");
    }

    fn cancel_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
        // A settle already queued by the old timer must not match any more.
        self.generation += 1;
    }

    fn cancel_request(&mut self) {
        if let Some(pending) = self.pending.take() {
            tracing::debug!(request = pending.id, text = %pending.text, "aborting grammar check");
            pending.abort.abort();
        }
    }
}

impl<B: GrammarBackend> DebouncedChecker<B> {
    pub fn new(backend: Arc<B>, debounce: Duration, events: UnboundedSender<GrammarEvent>) -> Self {
        Self {
            backend,
            debounce,
            events,
            generation: 0,
            last_request_id: 0,
            timer: None,
            pending: None,
            last_dispatched: None,
            disposed: false,
            state: CheckerState::default(),
        }
    }

    /// Feed the current content of the text field.
    pub fn on_input(&mut self, text: &str) {
        if self.disposed {
            return;
        }
        self.state.latest_text = text.to_string();
        self.cancel_timer();

        if text.trim().is_empty() {
            self.reset();
            return;
        }

        self.state.is_waiting = true;

        let generation = self.generation;
        let deadline = Instant::now() + self.debounce;
        let events = self.events.clone();
        let text = text.to_string();
        self.timer = Some(tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            let _ = events.send(GrammarEvent::Settled { generation, text });
        }));
    }

    /// Empty the field, dropping any scheduled or outstanding check.
    pub fn clear(&mut self) {
        self.on_input("");
    }

    /// Apply an event from a background task. Returns whether state changed.
    pub fn apply(&mut self, event: GrammarEvent) -> bool {
        if self.disposed {
            return false;
        }
        match event {
            GrammarEvent::Settled { generation, text } => {
                if generation != self.generation {
                    tracing::trace!(generation, "ignoring stale settle");
                    return false;
                }
                self.timer = None;
                if self.last_dispatched.as_deref() == Some(text.as_str()) {
                    tracing::debug!("text unchanged since last check");
                    self.state.is_waiting = false;
                    return true;
                }
                self.dispatch(text);
                true
            }
            GrammarEvent::Finished { request, outcome } => {
                if self.pending.as_ref().map(|p| p.id) != Some(request) {
                    tracing::debug!(request, "discarding superseded grammar result");
                    return false;
                }
                self.pending = None;
                self.state.is_checking = false;
                match outcome {
                    Ok(result) => {
                        tracing::info!(request, status = ?result.status, "grammar check finished");
                        self.state.last_result = Some(result);
                        self.state.last_checked_at = Some(Local::now());
                    }
                    Err(err) if err.is_cancelled() => {}
                    Err(err) => {
                        tracing::warn!(request, error = %err, "grammar check failed");
                        self.state.last_error = Some(err.user_message().to_string());
                        // Allow the same text to be checked again.
                        self.last_dispatched = None;
                    }
                }
                true
            }
        }
    }

    fn dispatch(&mut self, text: String) {
        self.cancel_request();

        self.last_request_id += 1;
        let id = self.last_request_id;
        let (abort, registration) = AbortHandle::new_pair();
        let backend = Arc::clone(&self.backend);
        let events = self.events.clone();
        let query = text.clone();

        tracing::info!(request = id, "dispatching grammar check");
        tokio::spawn(async move {
            match Abortable::new(backend.check_grammar(&query), registration).await {
                Ok(outcome) => {
                    let _ = events.send(GrammarEvent::Finished {
                        request: id,
                        outcome,
                    });
                }
                Err(_aborted) => tracing::trace!(request = id, "grammar check aborted"),
            }
        });

        self.pending = Some(PendingRequest { id, text: text.clone(), abort });
        self.last_dispatched = Some(text);
        self.state.is_waiting = false;
        self.state.is_checking = true;
        self.state.last_error = None;
    }

    fn reset(&mut self) {
        self.cancel_request();
        self.last_dispatched = None;
        self.state.is_waiting = false;
        self.state.is_checking = false;
        self.state.last_result = None;
        self.state.last_error = None;
        self.state.last_checked_at = None;
    }
}

impl<B> Drop for DebouncedChecker<B> {
    fn drop(&mut self) {
        self.dispose();
    }
}
