//! Command surface
//!
//! The wire-level commands a UI or bridge layer sends at the session
//! core, one variant per controller operation. Call state arrives as a
//! string tag and is parsed at this boundary; unknown tags are rejected
//! here and never reach the core.

use serde::{Deserialize, Serialize};

use crate::errors::{ClientError, ClientResult};

/// Commands accepted by the client manager
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "camelCase")]
pub enum CallCommand {
    /// Start (or replace) the call session
    #[serde(rename_all = "camelCase")]
    StartCall {
        #[serde(default)]
        call_number: Option<String>,
    },

    /// End the call session
    StopCall,

    /// Apply a state transition, e.g. `"connected"` or `"on_hold"`
    UpdateCallState { state: String },

    SetCallMuted { muted: bool },

    #[serde(rename_all = "camelCase")]
    SetCallHeld { on_hold: bool },

    /// Set or replace the remote party label
    #[serde(rename_all = "camelCase")]
    UpdateCallNumber { call_number: String },

    /// Present the one-shot incoming-call surface
    #[serde(rename_all = "camelCase")]
    ShowIncomingCall {
        caller_name: String,
        caller_number: String,
    },

    /// Take the incoming-call surface down
    DismissIncomingCall,
}

impl CallCommand {
    /// Parse a command from its JSON wire form
    pub fn from_json(payload: &str) -> ClientResult<Self> {
        serde_json::from_str(payload)
            .map_err(|e| ClientError::InvalidCommand { reason: e.to_string() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commands_parse_from_wire_form() {
        let cmd = CallCommand::from_json(r#"{"command":"startCall","callNumber":"+15551234"}"#)
            .unwrap();
        assert_eq!(
            cmd,
            CallCommand::StartCall { call_number: Some("+15551234".to_string()) }
        );

        let cmd = CallCommand::from_json(r#"{"command":"startCall"}"#).unwrap();
        assert_eq!(cmd, CallCommand::StartCall { call_number: None });

        let cmd = CallCommand::from_json(r#"{"command":"updateCallState","state":"on_hold"}"#)
            .unwrap();
        assert_eq!(cmd, CallCommand::UpdateCallState { state: "on_hold".to_string() });

        let cmd = CallCommand::from_json(r#"{"command":"setCallHeld","onHold":true}"#).unwrap();
        assert_eq!(cmd, CallCommand::SetCallHeld { on_hold: true });
    }

    #[test]
    fn test_unknown_command_rejected() {
        let err = CallCommand::from_json(r#"{"command":"teleport"}"#).unwrap_err();
        assert!(matches!(err, ClientError::InvalidCommand { .. }));
    }
}
