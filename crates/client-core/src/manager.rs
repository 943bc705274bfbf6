//! Client manager
//!
//! High-level entry point for a UI or bridge layer. The `ClientManager`
//! owns the session coordinator, re-broadcasts every emitted status view
//! as a [`ClientEvent`] for any number of subscribers, and maps the
//! command surface 1:1 onto coordinator operations.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::broadcast;
use tracing::{debug, info};

use rcall_session_core::{
    CallState, CoordinatorConfig, PlatformResources, RevocationSender, SessionCoordinator,
    SessionError, SessionId, StatusSink, StatusView,
};

use crate::commands::CallCommand;
use crate::errors::{ClientError, ClientResult};
use crate::events::ClientEvent;
use crate::ringer::IncomingCallRinger;

const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Forwards core emissions into the client broadcast channel
struct BroadcastSink {
    event_tx: broadcast::Sender<ClientEvent>,
}

#[async_trait]
impl StatusSink for BroadcastSink {
    async fn on_status(&self, session_id: SessionId, view: StatusView) {
        // send only fails with no subscribers, which is fine
        let _ = self.event_tx.send(ClientEvent::StatusChanged {
            session_id,
            view,
            timestamp: Utc::now(),
        });
    }

    async fn on_session_ended(&self, session_id: SessionId) {
        let _ = self
            .event_tx
            .send(ClientEvent::SessionEnded { session_id, timestamp: Utc::now() });
    }
}

/// High-level client over the call session core
pub struct ClientManager {
    coordinator: Arc<SessionCoordinator>,
    ringer: IncomingCallRinger,
    event_tx: broadcast::Sender<ClientEvent>,
}

impl ClientManager {
    /// Create a manager around a platform resource provider.
    ///
    /// Must be called from within a tokio runtime; the coordinator spawns
    /// its revocation pump on construction.
    pub fn new(platform: Arc<dyn PlatformResources>, config: CoordinatorConfig) -> Arc<Self> {
        let (event_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let sink = Arc::new(BroadcastSink { event_tx: event_tx.clone() });
        let coordinator = SessionCoordinator::new(platform, sink, config);
        let ringer = IncomingCallRinger::new(event_tx.clone());
        info!("ClientManager created");
        Arc::new(Self { coordinator, ringer, event_tx })
    }

    /// Subscribe to the client event stream
    pub fn subscribe_events(&self) -> broadcast::Receiver<ClientEvent> {
        self.event_tx.subscribe()
    }

    /// Handle for the platform adapter to report revoked resources
    pub fn revocation_handle(&self) -> RevocationSender {
        self.coordinator.revocation_handle()
    }

    pub fn coordinator(&self) -> &Arc<SessionCoordinator> {
        &self.coordinator
    }

    /// Start (or replace) the call session. An empty number is treated
    /// as absent, matching the bridge's historical default.
    pub async fn start_call(&self, call_number: Option<String>) -> ClientResult<SessionId> {
        let identity = call_number.filter(|number| !number.is_empty());
        Ok(self.coordinator.start_session(identity).await)
    }

    pub async fn stop_call(&self) -> ClientResult<()> {
        self.coordinator.end_session().await.map_err(Into::into)
    }

    /// Apply a state transition given its wire tag
    pub async fn update_call_state(&self, tag: &str) -> ClientResult<()> {
        let state: CallState = tag.parse().map_err(ClientError::Session)?;
        self.coordinator.set_state(state).await.map_err(Into::into)
    }

    pub async fn set_call_muted(&self, muted: bool) -> ClientResult<()> {
        self.coordinator.set_muted(muted).await.map_err(Into::into)
    }

    pub async fn set_call_held(&self, on_hold: bool) -> ClientResult<()> {
        self.coordinator.set_hold(on_hold).await.map_err(Into::into)
    }

    pub async fn update_call_number(&self, call_number: String) -> ClientResult<()> {
        self.coordinator.set_identity(call_number).await.map_err(Into::into)
    }

    pub async fn is_call_active(&self) -> bool {
        self.coordinator.is_session_active().await
    }

    /// Present the incoming-call surface
    pub async fn show_incoming_call(&self, caller_name: String, caller_number: String) {
        self.ringer.present(caller_name, caller_number).await;
    }

    pub async fn dismiss_incoming_call(&self) {
        self.ringer.dismiss().await;
    }

    pub fn ringer(&self) -> &IncomingCallRinger {
        &self.ringer
    }

    /// Accept the pending incoming call: dismisses the surface and
    /// starts a session toward the caller. Returns `None` when no call
    /// was pending.
    pub async fn answer_incoming(&self) -> ClientResult<Option<SessionId>> {
        let Some(call) = self.ringer.take().await else {
            debug!("Answer with no pending incoming call");
            return Ok(None);
        };
        let id = self.start_call(Some(call.caller_number)).await?;
        Ok(Some(id))
    }

    /// Reject the pending incoming call: dismisses the surface and ends
    /// any live session. Declining with no session is not an error.
    pub async fn decline_incoming(&self) -> ClientResult<()> {
        self.ringer.take().await;
        match self.coordinator.end_session().await {
            Ok(()) | Err(SessionError::NoActiveSession) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Dispatch a wire-level command to its operation
    pub async fn execute(&self, command: CallCommand) -> ClientResult<()> {
        match command {
            CallCommand::StartCall { call_number } => {
                self.start_call(call_number).await?;
                Ok(())
            }
            CallCommand::StopCall => self.stop_call().await,
            CallCommand::UpdateCallState { state } => self.update_call_state(&state).await,
            CallCommand::SetCallMuted { muted } => self.set_call_muted(muted).await,
            CallCommand::SetCallHeld { on_hold } => self.set_call_held(on_hold).await,
            CallCommand::UpdateCallNumber { call_number } => {
                self.update_call_number(call_number).await
            }
            CallCommand::ShowIncomingCall { caller_name, caller_number } => {
                self.show_incoming_call(caller_name, caller_number).await;
                Ok(())
            }
            CallCommand::DismissIncomingCall => {
                self.dismiss_incoming_call().await;
                Ok(())
            }
        }
    }
}
