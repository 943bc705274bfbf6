//! Client event stream
//!
//! Everything the session core emits, plus the incoming-call ringer's
//! present/dismiss notices, re-broadcast to however many consumers care.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use rcall_session_core::{SessionId, StatusView};

/// Events broadcast to client subscribers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ClientEvent {
    /// The live session was re-projected; render this view.
    StatusChanged {
        session_id: SessionId,
        view: StatusView,
        timestamp: DateTime<Utc>,
    },

    /// The session is gone; dismiss the status surface.
    SessionEnded {
        session_id: SessionId,
        timestamp: DateTime<Utc>,
    },

    /// A not-yet-accepted call wants the one-shot incoming surface.
    IncomingCall {
        caller_name: String,
        caller_number: String,
        timestamp: DateTime<Utc>,
    },

    /// The incoming surface should be taken down.
    IncomingCallDismissed {
        timestamp: DateTime<Utc>,
    },
}
