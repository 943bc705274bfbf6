//! Core types for the call session layer
//!
//! Defines the session identifier, the closed call-state enumeration and
//! the single authoritative `CallSession` value owned by the coordinator.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tokio::time::Instant;
use uuid::Uuid;

use crate::errors::SessionError;

/// Unique identifier for a call session
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub String);

impl SessionId {
    pub fn new() -> Self {
        Self(format!("session-{}", Uuid::new_v4()))
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Call states
///
/// `Ended` is terminal. `Connected` is stable; the other states are
/// transient stops on the way there.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallState {
    Dialing,
    Ringing,
    Connecting,
    Connected,
    OnHold,
    Ended,
}

impl CallState {
    /// Check if this is a final state (call is over)
    pub fn is_final(&self) -> bool {
        matches!(self, CallState::Ended)
    }

    /// Check if the call is in progress
    pub fn is_in_progress(&self) -> bool {
        !self.is_final()
    }

    /// Position in the nominal ordering:
    /// Dialing -> Ringing/Connecting -> Connected -> OnHold.
    fn tier(&self) -> u8 {
        match self {
            CallState::Dialing => 0,
            CallState::Ringing | CallState::Connecting => 1,
            CallState::Connected => 2,
            CallState::OnHold => 3,
            CallState::Ended => 4,
        }
    }

    /// Whether a transition from `self` to `to` is accepted.
    ///
    /// Any state may go directly to `Ended`, `OnHold` and `Connected` are
    /// bidirectional, and otherwise a transition may never move backward
    /// in the nominal ordering.
    pub fn can_advance_to(&self, to: CallState) -> bool {
        if to == CallState::Ended {
            return true;
        }
        if *self == CallState::OnHold && to == CallState::Connected {
            return true;
        }
        to.tier() >= self.tier()
    }
}

impl fmt::Display for CallState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallState::Dialing => write!(f, "Dialing"),
            CallState::Ringing => write!(f, "Ringing"),
            CallState::Connecting => write!(f, "Connecting"),
            CallState::Connected => write!(f, "Connected"),
            CallState::OnHold => write!(f, "On Hold"),
            CallState::Ended => write!(f, "Ended"),
        }
    }
}

impl FromStr for CallState {
    type Err = SessionError;

    /// Parse the wire tag used by the command surface. Unknown tags are
    /// rejected here so free-form strings never reach the core.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dialing" => Ok(CallState::Dialing),
            "ringing" => Ok(CallState::Ringing),
            "connecting" => Ok(CallState::Connecting),
            "connected" => Ok(CallState::Connected),
            "on_hold" => Ok(CallState::OnHold),
            "ended" => Ok(CallState::Ended),
            other => Err(SessionError::UnknownState(other.to_string())),
        }
    }
}

/// Complete state of the one live call session
#[derive(Debug, Clone)]
pub struct CallSession {
    // Identity
    pub id: SessionId,
    pub remote_identity: Option<String>,

    // Current state
    pub state: CallState,

    // Flags, meaningful once the call is connected
    pub muted: bool,
    pub on_hold: bool,

    // Timestamps
    pub connected_at: Option<Instant>,
    pub started_at: Instant,
}

impl CallSession {
    /// Create a new session in `Dialing`
    pub fn new(remote_identity: Option<String>) -> Self {
        Self {
            id: SessionId::new(),
            remote_identity,
            state: CallState::Dialing,
            muted: false,
            on_hold: false,
            connected_at: None,
            started_at: Instant::now(),
        }
    }

    /// Move to a new state, stamping `connected_at` on the first entry
    /// into `Connected`. Re-entry never re-stamps.
    pub fn enter_state(&mut self, state: CallState, now: Instant) {
        self.state = state;
        if state == CallState::Connected && self.connected_at.is_none() {
            self.connected_at = Some(now);
        }
    }
}
