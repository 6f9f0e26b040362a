// Live grammar checking

pub mod checker;
pub mod parser;

use async_trait::async_trait;
use serde::Deserialize;

use crate::api::ApiError;

pub use checker::{CheckerState, DebouncedChecker, GrammarEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum Verdict {
    Correct,
    Incorrect,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckResult {
    pub status: Verdict,
    pub correction: String,
    pub original_text: String,
}

/// Remote side of a grammar check.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GrammarBackend: Send + Sync + 'static {
    async fn check_grammar(&self, text: &str) -> Result<CheckResult, ApiError>;
}
