use thiserror::Error;

use crate::core::board::BoardId;

/// Core error types for forumkit
#[derive(Debug, Error)]
pub enum Error {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The API client reported a failure
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Ancestor walk hit a board that is missing from the index, or revisited
    /// a board already on the chain
    #[error("Ancestor chain of board {board} is broken after {depth} step(s): cycle or missing node")]
    AncestorCycleOrMissingNode { board: BoardId, depth: usize },

    /// Configuration could not be located or is invalid
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Failure returned by any API client call.
///
/// Replaces the numeric status code of the raw response: a response is either
/// `Ok(payload)` or this value carrying the non-success code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("request failed with code {code}{}", message_suffix(.message))]
pub struct ApiError {
    pub code: i32,
    pub message: Option<String>,
}

impl ApiError {
    pub fn new(code: i32) -> Self {
        Self {
            code,
            message: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

fn message_suffix(message: &Option<String>) -> String {
    message.as_deref().map(|m| format!(": {m}")).unwrap_or_default()
}

pub type Result<T> = std::result::Result<T, Error>;
