//! Status projection
//!
//! Pure mapping from the authoritative `CallSession` to the
//! presentation-ready `StatusView`. Deterministic: the same session and
//! clock reading always produce an identical view, which is what makes
//! the projection table-testable.

use serde::{Deserialize, Serialize};
use tokio::time::Instant;

use crate::types::{CallSession, CallState};

/// Actions the status surface may offer back to the command surface
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum StatusAction {
    Mute,
    Unmute,
    Hold,
    Unhold,
    HangUp,
}

/// Derived, presentation-ready summary of the current session
///
/// A value type with no identity: never mutated in place, only replaced
/// by the next projection. The title carries the remote identity when
/// one is known and stays empty otherwise; placeholder text belongs to
/// the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusView {
    pub title: String,
    pub detail: String,
    pub actions: Vec<StatusAction>,
}

/// Project a session into its status view.
///
/// `now` is passed in rather than read from the clock so the projection
/// stays referentially transparent.
pub fn project(session: &CallSession, now: Instant) -> StatusView {
    let title = match &session.remote_identity {
        Some(identity) if !identity.is_empty() => identity.clone(),
        _ => String::new(),
    };

    let detail = match session.state {
        CallState::Dialing => "Dialing…".to_string(),
        CallState::Ringing => "Ringing…".to_string(),
        CallState::Connecting => "Connecting…".to_string(),
        CallState::Connected => {
            let elapsed = session
                .connected_at
                .map(|connected_at| now.duration_since(connected_at))
                .unwrap_or_default();
            let total = elapsed.as_secs();
            let mut detail = format!("{:02}:{:02}", total / 60, total % 60);
            // Hold wins over mute; only one suffix at a time.
            if session.on_hold {
                detail.push_str(" • On Hold");
            } else if session.muted {
                detail.push_str(" • Muted");
            }
            detail
        }
        CallState::OnHold => "On Hold".to_string(),
        CallState::Ended => "Call ended".to_string(),
    };

    // Mute/hold controls are only offered while connected; a parked call
    // exposes resume paths through the command surface, not here.
    let actions = match session.state {
        CallState::Connected => vec![
            if session.muted { StatusAction::Unmute } else { StatusAction::Mute },
            if session.on_hold { StatusAction::Unhold } else { StatusAction::Hold },
            StatusAction::HangUp,
        ],
        CallState::Ended => vec![],
        _ => vec![StatusAction::HangUp],
    };

    StatusView { title, detail, actions }
}
