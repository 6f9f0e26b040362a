// State for requests fired once per user action

use crate::api::ApiError;

/// Outcome of the latest one-shot request plus whether one is outstanding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OneShot<T> {
    pub value: Option<T>,
    pub error: Option<String>,
    pub is_loading: bool,
}

impl<T> Default for OneShot<T> {
    fn default() -> Self {
        Self {
            value: None,
            error: None,
            is_loading: false,
        }
    }
}

impl<T> OneShot<T> {
    /// Mark a request as started. Returns `false` while one is already outstanding,
    /// in which case the caller must not send anything.
    pub fn begin(&mut self) -> bool {
        if self.is_loading {
            return false;
        }
        self.is_loading = true;
        self.error = None;
        true
    }

    /// Record the outcome. A failed request keeps the previous value.
    pub fn settle(&mut self, outcome: Result<T, ApiError>) {
        self.is_loading = false;
        match outcome {
            Ok(value) => {
                self.value = Some(value);
                self.error = None;
            }
            Err(err) if err.is_cancelled() => {}
            Err(err) => {
                tracing::warn!(error = %err, "request failed");
                self.error = Some(err.user_message().to_string());
            }
        }
    }
}
