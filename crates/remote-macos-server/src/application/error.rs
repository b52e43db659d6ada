//! The error taxonomy tool callers see.

use remote_macos_core::{ConfigError, InputError};
use thiserror::Error;

use super::session::SessionError;

/// Why a tool call failed.
///
/// | Variant           | Raised                                      |
/// |-------------------|---------------------------------------------|
/// | `Config`          | before any connection attempt               |
/// | `InvalidArgument` | before connecting, or inside the session    |
/// |                   | before any input is sent (`send_keys`)      |
/// | `Transport`       | connect, primitive or disconnect failure    |
/// | `Encode`          | PNG encoding of a captured frame            |
#[derive(Debug, Error)]
pub enum ToolError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    InvalidArgument(#[from] InputError),
    #[error(transparent)]
    Transport(SessionError),
    #[error("screen encoding failed: {0}")]
    Encode(String),
}

impl ToolError {
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }
}

impl From<SessionError> for ToolError {
    fn from(err: SessionError) -> Self {
        match err {
            // An unsendable key is a caller mistake, not a transport failure.
            SessionError::UnknownKey(key) => Self::InvalidArgument(InputError::UnknownKey(key)),
            other => Self::Transport(other),
        }
    }
}
