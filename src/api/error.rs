// Error taxonomy for the remote APIs

use reqwest::StatusCode;

/// Coarse classification used to pick a user-facing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Network,
    BadRequest,
    Unauthorized,
    RateLimited,
    Unknown,
    Cancelled,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("API request failed with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Malformed response: {0}")]
    Decode(String),

    #[error("Request cancelled")]
    Cancelled,
}

impl ApiError {
    pub fn from_status(status: StatusCode, body: String) -> Self {
        Self::Status {
            status: status.as_u16(),
            body,
        }
    }

    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Transport(_) => ErrorKind::Network,
            Self::Status { status, .. } => match *status {
                400 => ErrorKind::BadRequest,
                401 | 403 => ErrorKind::Unauthorized,
                429 => ErrorKind::RateLimited,
                _ => ErrorKind::Unknown,
            },
            Self::Decode(_) => ErrorKind::Unknown,
            Self::Cancelled => ErrorKind::Cancelled,
        }
    }

    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// Human-readable message for the status line. Cancellation has none.
    pub const fn user_message(&self) -> &'static str {
        match self.kind() {
            ErrorKind::Network => "Could not reach the server. Check your connection.",
            ErrorKind::BadRequest => "The request was rejected as invalid.",
            ErrorKind::Unauthorized => "The API key was rejected. Check your configuration.",
            ErrorKind::RateLimited => "Too many requests. Wait a moment and try again.",
            ErrorKind::Unknown => "Something went wrong. Please try again.",
            ErrorKind::Cancelled => "",
        }
    }
}
