//! Call session coordination
//!
//! The coordinator owns the single live `CallSession`, drives the
//! resource arbiter on every lifecycle edge and re-projects the session
//! into a `StatusView` after each accepted mutation. All state lives
//! behind one mutex: commands and the revocation pump serialize through
//! it, so no two transitions can ever interleave and every mutation ends
//! with exactly one emission.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::errors::{Result, SessionError};
use crate::resources::{
    revocation_channel, PlatformResources, ResourceArbiter, ResourceKind, RevocationSender,
    DEFAULT_WAKE_MAX,
};
use crate::status::{project, StatusView};
use crate::types::{CallSession, CallState, SessionId};

/// Receiver for every emitted status view
///
/// Implementations render the view as a persistent, low-priority status
/// surface. Callbacks run inside the coordinator's serialization
/// boundary, so they are totally ordered with mutations; they must not
/// call back into the coordinator.
#[async_trait]
pub trait StatusSink: Send + Sync {
    async fn on_status(&self, session_id: SessionId, view: StatusView);

    /// The session is gone; the status surface should be dismissed.
    async fn on_session_ended(&self, session_id: SessionId);
}

/// Coordinator configuration
#[derive(Debug, Clone)]
pub struct CoordinatorConfig {
    /// Maximum duration of a single wake assertion. Renewed proactively
    /// while the session lives.
    pub wake_max: Duration,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self { wake_max: DEFAULT_WAKE_MAX }
    }
}

struct Inner {
    session: Option<CallSession>,
    arbiter: ResourceArbiter,
    renew_task: Option<JoinHandle<()>>,
}

/// The call session controller
pub struct SessionCoordinator {
    inner: Arc<Mutex<Inner>>,
    sink: Arc<dyn StatusSink>,
    revocations: RevocationSender,
    pump_task: JoinHandle<()>,
}

impl SessionCoordinator {
    pub fn new(
        platform: Arc<dyn PlatformResources>,
        sink: Arc<dyn StatusSink>,
        config: CoordinatorConfig,
    ) -> Arc<Self> {
        let (revocations, mut revoke_rx) = revocation_channel();
        let inner = Arc::new(Mutex::new(Inner {
            session: None,
            arbiter: ResourceArbiter::new(platform, config.wake_max),
            renew_task: None,
        }));

        // Funnel platform revocations through the same lock as commands.
        let pump_inner = Arc::clone(&inner);
        let pump_task = tokio::spawn(async move {
            while let Some(kind) = revoke_rx.recv().await {
                let mut inner = pump_inner.lock().await;
                info!("Platform revoked {}", kind);
                inner.arbiter.mark_revoked(kind);
                // The projected view does not depend on grant state, so a
                // revocation triggers no re-emission. Extension point for
                // surfacing degraded audio to the user.
            }
        });

        Arc::new(Self { inner, sink, revocations, pump_task })
    }

    /// Handle for the platform adapter to report revoked resources
    pub fn revocation_handle(&self) -> RevocationSender {
        self.revocations.clone()
    }

    /// Start a new session in `Dialing`, replacing any live one.
    ///
    /// Both resources are acquired best-effort: a denial leaves the
    /// session running degraded, never aborts it.
    pub async fn start_session(&self, identity: Option<String>) -> SessionId {
        let mut inner = self.inner.lock().await;
        if inner.session.is_some() {
            info!("Replacing live call session");
            self.end_session_locked(&mut inner).await;
        }

        let session = CallSession::new(identity);
        let id = session.id.clone();
        info!("Starting call session {}", id);

        if let Err(e) = inner.arbiter.acquire(ResourceKind::WakeAssertion).await {
            warn!("Session {} continuing without wake assertion: {}", id, e);
        }
        if let Err(e) = inner.arbiter.acquire(ResourceKind::AudioPriority).await {
            warn!("Session {} continuing without audio priority: {}", id, e);
        }

        inner.session = Some(session);
        inner.renew_task = Some(self.spawn_wake_renewal());
        self.emit(&inner).await;
        id
    }

    /// Apply a state transition.
    ///
    /// Re-entering the current state is a silent no-op except for
    /// `Connected`, which re-emits without re-stamping the connect time.
    /// `Ended` from any state performs full end-of-session semantics.
    /// Backward transitions are rejected and leave the state untouched.
    pub async fn set_state(&self, to: CallState) -> Result<()> {
        let mut inner = self.inner.lock().await;
        let from = match inner.session.as_ref() {
            Some(session) => session.state,
            None => return Err(SessionError::NoActiveSession),
        };

        if to == from && to != CallState::Connected {
            return Ok(());
        }
        if to == CallState::Ended {
            self.end_session_locked(&mut inner).await;
            return Ok(());
        }
        if !from.can_advance_to(to) {
            return Err(SessionError::InvalidTransition { from, to });
        }

        let now = Instant::now();
        if let Some(session) = inner.session.as_mut() {
            session.enter_state(to, now);
            debug!("Session {} transitioned {} -> {}", session.id, from, to);
        }
        self.emit(&inner).await;
        Ok(())
    }

    pub async fn set_muted(&self, muted: bool) -> Result<()> {
        self.mutate_session(|session| session.muted = muted).await
    }

    pub async fn set_hold(&self, on_hold: bool) -> Result<()> {
        self.mutate_session(|session| session.on_hold = on_hold).await
    }

    /// Set or replace the remote identity label
    pub async fn set_identity(&self, label: impl Into<String>) -> Result<()> {
        let label = label.into();
        self.mutate_session(|session| session.remote_identity = Some(label)).await
    }

    /// End the live session: releases both resources unconditionally,
    /// destroys the session and stops emitting. Safe from any state,
    /// including immediately after `start_session`.
    pub async fn end_session(&self) -> Result<()> {
        let mut inner = self.inner.lock().await;
        if inner.session.is_none() {
            return Err(SessionError::NoActiveSession);
        }
        self.end_session_locked(&mut inner).await;
        Ok(())
    }

    pub async fn is_session_active(&self) -> bool {
        self.inner.lock().await.session.is_some()
    }

    pub async fn current_state(&self) -> Option<CallState> {
        self.inner.lock().await.session.as_ref().map(|s| s.state)
    }

    pub async fn is_resource_held(&self, kind: ResourceKind) -> bool {
        self.inner.lock().await.arbiter.is_held(kind)
    }

    async fn mutate_session<F: FnOnce(&mut CallSession)>(&self, f: F) -> Result<()> {
        let mut inner = self.inner.lock().await;
        match inner.session.as_mut() {
            Some(session) => f(session),
            None => return Err(SessionError::NoActiveSession),
        }
        self.emit(&inner).await;
        Ok(())
    }

    async fn end_session_locked(&self, inner: &mut Inner) {
        if let Some(task) = inner.renew_task.take() {
            task.abort();
        }
        inner.arbiter.release_all().await;
        if let Some(session) = inner.session.take() {
            info!("Ended call session {}", session.id);
            self.sink.on_session_ended(session.id).await;
        }
    }

    async fn emit(&self, inner: &Inner) {
        if let Some(session) = &inner.session {
            let view = project(session, Instant::now());
            self.sink.on_status(session.id.clone(), view).await;
        }
    }

    /// Keep the time-bounded wake assertion alive for the session's
    /// duration instead of letting the platform expire it mid-call.
    fn spawn_wake_renewal(&self) -> JoinHandle<()> {
        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            loop {
                let (deadline, margin) = {
                    let guard = inner.lock().await;
                    if guard.session.is_none() {
                        break;
                    }
                    (guard.arbiter.wake_deadline(), guard.arbiter.wake_max() / 10)
                };
                let Some(deadline) = deadline else { break };

                tokio::time::sleep_until(deadline - margin).await;

                let mut guard = inner.lock().await;
                if guard.session.is_none() {
                    break;
                }
                if guard.arbiter.renew_wake().await.is_err() {
                    // Denied: the current assertion keeps its original
                    // bound and lapses on its own.
                    break;
                }
            }
        })
    }
}

impl Drop for SessionCoordinator {
    fn drop(&mut self) {
        self.pump_task.abort();
        if let Ok(mut inner) = self.inner.try_lock() {
            if let Some(task) = inner.renew_task.take() {
                task.abort();
            }
        }
    }
}
