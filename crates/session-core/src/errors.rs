use thiserror::Error;

use crate::types::CallState;

/// Result type for session operations
pub type Result<T> = std::result::Result<T, SessionError>;

/// Session-related errors
///
/// Nothing here is fatal to the hosting process; transition and session
/// errors are reported to the command surface, which decides on any
/// user-visible messaging.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("No active call session")]
    NoActiveSession,

    #[error("Invalid state transition: {from} -> {to}")]
    InvalidTransition { from: CallState, to: CallState },

    #[error("Unknown call state tag: {0}")]
    UnknownState(String),
}
