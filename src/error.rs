//! Client error types
//!
//! Every failure the dashboard can see collapses into one of two kinds:
//! the backend could not be reached or answered garbage (transport), or the
//! backend answered with `success: false` (application).

use thiserror::Error;

/// Errors that can occur while talking to the banking backend
#[derive(Error, Debug)]
pub enum ClientError {
    /// Network unreachable, connection refused, timeout
    #[error("Transport error: {0}")]
    Transport(String),

    /// Response body was not a JSON envelope
    #[error("Decode error: {0}")]
    Decode(String),

    /// Backend answered `success: false`
    #[error("Application error: {}", .message.as_deref().unwrap_or("request rejected"))]
    Application { message: Option<String> },

    /// An operation needed the authenticated user but none is stored
    #[error("No active session")]
    NoSession,

    /// Session storage could not be read or written
    #[error("Session storage error: {0}")]
    Session(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

/// The two failure kinds surfaced to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Transport,
    Application,
}

impl ClientError {
    /// Collapse the error into its user-facing kind
    pub fn kind(&self) -> FailureKind {
        match self {
            ClientError::Transport(_) | ClientError::Decode(_) | ClientError::Session(_) => {
                FailureKind::Transport
            }
            ClientError::Application { .. } | ClientError::NoSession | ClientError::Config(_) => {
                FailureKind::Application
            }
        }
    }

    /// Message supplied by the backend, if any
    pub fn backend_message(&self) -> Option<&str> {
        match self {
            ClientError::Application { message } => message.as_deref(),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ClientError::Transport("request timed out".to_string())
        } else if err.is_connect() {
            ClientError::Transport(format!("backend unreachable: {}", err))
        } else {
            ClientError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Decode(err.to_string())
    }
}

/// Result type alias for client operations
pub type ClientResult<T> = Result<T, ClientError>;
