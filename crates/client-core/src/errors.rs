use thiserror::Error;

use rcall_session_core::SessionError;

/// Result type for client operations
pub type ClientResult<T> = std::result::Result<T, ClientError>;

/// Client-layer errors
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    #[error("Invalid command: {reason}")]
    InvalidCommand { reason: String },
}
