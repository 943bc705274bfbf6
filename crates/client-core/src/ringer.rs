//! Incoming-call ringer
//!
//! The one-shot, higher-priority surface for a call that has not been
//! accepted yet: a present/dismiss toggle carrying only the caller
//! label. It shares no state with the session core; answering or
//! declining goes back through the manager's start/stop entry points.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::events::ClientEvent;

/// A not-yet-accepted call waiting on the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomingCall {
    pub caller_name: String,
    pub caller_number: String,
}

/// Present/dismiss toggle for the incoming-call surface
pub struct IncomingCallRinger {
    current: Mutex<Option<IncomingCall>>,
    event_tx: broadcast::Sender<ClientEvent>,
}

impl IncomingCallRinger {
    pub(crate) fn new(event_tx: broadcast::Sender<ClientEvent>) -> Self {
        Self { current: Mutex::new(None), event_tx }
    }

    /// Present the surface for a caller, replacing any previous one
    pub async fn present(&self, caller_name: String, caller_number: String) {
        info!("Incoming call from {} ({})", caller_name, caller_number);
        let call = IncomingCall { caller_name, caller_number };
        *self.current.lock().await = Some(call.clone());
        let _ = self.event_tx.send(ClientEvent::IncomingCall {
            caller_name: call.caller_name,
            caller_number: call.caller_number,
            timestamp: Utc::now(),
        });
    }

    /// Take the surface down. No-op when nothing is presented.
    pub async fn dismiss(&self) {
        if self.take().await.is_some() {
            debug!("Incoming call surface dismissed");
        }
    }

    pub async fn current(&self) -> Option<IncomingCall> {
        self.current.lock().await.clone()
    }

    /// Clear and return the pending call, emitting the dismissal notice
    pub(crate) async fn take(&self) -> Option<IncomingCall> {
        let taken = self.current.lock().await.take();
        if taken.is_some() {
            let _ = self
                .event_tx
                .send(ClientEvent::IncomingCallDismissed { timestamp: Utc::now() });
        }
        taken
    }
}
