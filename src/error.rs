//! Error kinds surfaced by the request pipeline.
//!
//! Every variant is terminal: `main` prints it to stderr and exits non-zero.

use std::fmt;
use std::time::Duration;

use thiserror::Error;

/// Machine-readable reason a method constructor rejected its arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgErrorCode {
    /// Too few or too many parameters.
    NumParams,
    /// A parameter could not be parsed as the declared type.
    InvalidType,
    /// A parameter parsed but is outside the accepted range.
    InvalidValue,
}

impl fmt::Display for ArgErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ArgErrorCode::NumParams => "ErrNumParams",
            ArgErrorCode::InvalidType => "ErrInvalidType",
            ArgErrorCode::InvalidValue => "ErrInvalidValue",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Error)]
pub enum CtlError {
    #[error("Unrecognized command {0:?}")]
    UnknownCommand(String),

    #[error("The '{0}' command is unusable")]
    UnusableCommand(String),

    #[error("Not enough lines provided on stdin")]
    InsufficientStdin,

    #[error("Failed to read data from stdin: {0}")]
    StdinRead(#[source] std::io::Error),

    #[error("{method} command: {message} (code: {code})")]
    InvalidArguments {
        method: String,
        code: ArgErrorCode,
        message: String,
    },

    #[error("failed to encode request: {0}")]
    Encoding(#[source] serde_json::Error),

    #[error("dial failed: {0}")]
    Dial(String),

    #[error("{code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("call cancelled")]
    Cancelled,

    #[error("call timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("Failed to unmarshal result: {0}")]
    Render(#[source] serde_json::Error),
}

impl CtlError {
    pub fn dial(msg: impl fmt::Display) -> Self {
        CtlError::Dial(msg.to_string())
    }

    pub fn transport(msg: impl fmt::Display) -> Self {
        CtlError::Transport(msg.to_string())
    }

    /// Whether the resolved method's usage text should accompany this error.
    pub fn wants_usage(&self) -> bool {
        matches!(self, CtlError::InvalidArguments { .. })
    }
}
