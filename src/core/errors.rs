use thiserror::Error;

/// Code reported when a response body cannot be decoded into the API envelope.
pub const DECODE_FAILURE_CODE: i32 = -1;

#[derive(Error, Debug)]
pub enum AnyPayError {
    /// Malformed input, rejected before any hashing or network activity
    #[error("Invalid parameters: {0}")]
    Validation(String),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("HTTP status error: {code} - {message}")]
    HttpStatus { code: i32, message: String },

    #[error("Decode error: {code} - {message}")]
    Decode { code: i32, message: String },

    /// Error object returned verbatim by the remote service
    #[error("API error: {code} - {message}")]
    Api { code: i32, message: String },

    #[error("Configuration error: {0}")]
    Config(#[from] crate::core::config::ConfigError),
}

impl AnyPayError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Numeric code carried by status, decode and API errors
    pub fn code(&self) -> Option<i32> {
        match self {
            Self::HttpStatus { code, .. } | Self::Decode { code, .. } | Self::Api { code, .. } => {
                Some(*code)
            }
            _ => None,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Transport(TransportError::Cancelled))
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Transport(TransportError::TimedOut))
    }
}

/// Failure kinds reported by a [`Transport`](crate::core::kernel::Transport)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("Request timed out")]
    TimedOut,

    #[error("Request cancelled")]
    Cancelled,

    #[error("Exception during making request: {0}")]
    Failed(String),
}
