//! Platform resource arbitration
//!
//! The arbiter owns exclusive acquisition and release of the two scarce
//! platform resources a call needs: the wake assertion (keeps the device
//! from suspending, time-bounded, never platform-revoked) and audio
//! priority (the voice output path, unbounded but revocable by the
//! platform at any moment). The two have different lifecycles, so each
//! gets its own grant slot.
//!
//! Acquire and release are idempotent. Release failures are logged and
//! absorbed: from the caller's point of view a released resource is
//! released, so the coordinator can never get stuck believing it holds
//! something it cannot act on.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{debug, warn};

/// Safety bound on a single wake assertion. A runaway session cannot
/// keep the device awake past this; the coordinator renews before it
/// lapses while the call is live.
pub const DEFAULT_WAKE_MAX: Duration = Duration::from_secs(10 * 60);

const REVOCATION_CHANNEL_CAPACITY: usize = 16;

/// The two platform resources a call holds
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum ResourceKind {
    WakeAssertion,
    AudioPriority,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceKind::WakeAssertion => write!(f, "wake assertion"),
            ResourceKind::AudioPriority => write!(f, "audio priority"),
        }
    }
}

/// Opaque token the platform hands back for a granted resource
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlatformHandle(pub u64);

/// Resource-related errors
#[derive(Debug, Error)]
pub enum ResourceError {
    /// The platform refused the acquisition. Non-fatal: the session
    /// continues degraded, without the corresponding guarantee.
    #[error("Platform denied {0} acquisition")]
    Denied(ResourceKind),

    #[error("Platform error: {0}")]
    Platform(String),
}

/// Platform resource provider consumed by the arbiter
///
/// Request/release calls are short and bounded; the only asynchronous
/// entry into the core is the revocation stream, delivered through a
/// [`RevocationSender`].
#[async_trait]
pub trait PlatformResources: Send + Sync {
    async fn request_wake(&self, max_duration: Duration) -> Result<PlatformHandle, ResourceError>;
    async fn release_wake(&self, handle: PlatformHandle) -> Result<(), ResourceError>;
    async fn request_audio_priority(&self) -> Result<PlatformHandle, ResourceError>;
    async fn release_audio_priority(&self, handle: PlatformHandle) -> Result<(), ResourceError>;
}

/// Handle the platform adapter uses to report a revoked resource
///
/// Cloneable and cheap; safe to invoke from any thread. The event is
/// queued into the coordinator's serialization point, never executed
/// inline on the caller's thread.
#[derive(Debug, Clone)]
pub struct RevocationSender {
    tx: mpsc::Sender<ResourceKind>,
}

impl RevocationSender {
    pub fn revoke(&self, kind: ResourceKind) {
        // try_send so a platform callback thread never blocks on the core
        match self.tx.try_send(kind) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(_)) => {
                warn!("Revocation channel full, dropping {} revocation", kind);
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                debug!("Revocation channel closed, coordinator already shut down");
            }
        }
    }
}

pub(crate) fn revocation_channel() -> (RevocationSender, mpsc::Receiver<ResourceKind>) {
    let (tx, rx) = mpsc::channel(REVOCATION_CHANNEL_CAPACITY);
    (RevocationSender { tx }, rx)
}

/// One grant slot per resource kind
///
/// Invariant: `held` exactly when `handle` is present.
#[derive(Debug, Default)]
pub struct ResourceGrant {
    pub held: bool,
    pub handle: Option<PlatformHandle>,
}

impl ResourceGrant {
    fn grant(&mut self, handle: PlatformHandle) {
        self.held = true;
        self.handle = Some(handle);
    }

    fn clear(&mut self) -> Option<PlatformHandle> {
        self.held = false;
        self.handle.take()
    }
}

/// Guards exclusive acquisition and release of the platform resources
pub struct ResourceArbiter {
    platform: Arc<dyn PlatformResources>,
    wake: ResourceGrant,
    audio: ResourceGrant,
    wake_max: Duration,
    wake_deadline: Option<Instant>,
}

impl ResourceArbiter {
    pub fn new(platform: Arc<dyn PlatformResources>, wake_max: Duration) -> Self {
        Self {
            platform,
            wake: ResourceGrant::default(),
            audio: ResourceGrant::default(),
            wake_max,
            wake_deadline: None,
        }
    }

    /// Acquire a resource. Idempotent: re-acquiring a held resource is a
    /// no-op success without contacting the platform.
    pub async fn acquire(&mut self, kind: ResourceKind) -> Result<(), ResourceError> {
        if self.grant(kind).held {
            return Ok(());
        }
        match kind {
            ResourceKind::WakeAssertion => match self.platform.request_wake(self.wake_max).await {
                Ok(handle) => {
                    self.wake.grant(handle);
                    self.wake_deadline = Some(Instant::now() + self.wake_max);
                    debug!("Wake assertion acquired for {:?}", self.wake_max);
                    Ok(())
                }
                Err(e) => {
                    debug!("Wake assertion denied: {}", e);
                    Err(ResourceError::Denied(kind))
                }
            },
            ResourceKind::AudioPriority => match self.platform.request_audio_priority().await {
                Ok(handle) => {
                    self.audio.grant(handle);
                    debug!("Audio priority acquired");
                    Ok(())
                }
                Err(e) => {
                    debug!("Audio priority denied: {}", e);
                    Err(ResourceError::Denied(kind))
                }
            },
        }
    }

    /// Release a resource. Idempotent: releasing an unheld resource is a
    /// no-op. Platform-level release errors are logged, never propagated;
    /// the grant is considered released regardless.
    pub async fn release(&mut self, kind: ResourceKind) {
        let handle = match kind {
            ResourceKind::WakeAssertion => {
                self.wake_deadline = None;
                self.wake.clear()
            }
            ResourceKind::AudioPriority => self.audio.clear(),
        };
        let Some(handle) = handle else { return };

        let result = match kind {
            ResourceKind::WakeAssertion => self.platform.release_wake(handle).await,
            ResourceKind::AudioPriority => self.platform.release_audio_priority(handle).await,
        };
        match result {
            Ok(()) => debug!("Released {}", kind),
            Err(e) => warn!("Failed to release {}: {}", kind, e),
        }
    }

    /// Release both resources unconditionally
    pub async fn release_all(&mut self) {
        self.release(ResourceKind::WakeAssertion).await;
        self.release(ResourceKind::AudioPriority).await;
    }

    pub fn is_held(&self, kind: ResourceKind) -> bool {
        self.grant(kind).held
    }

    /// Bookkeeping-only transition to unheld after the platform reclaimed
    /// the resource. No release call is made; the handle is already dead.
    pub fn mark_revoked(&mut self, kind: ResourceKind) {
        match kind {
            ResourceKind::WakeAssertion => {
                self.wake_deadline = None;
                self.wake.clear();
            }
            ResourceKind::AudioPriority => {
                self.audio.clear();
            }
        }
    }

    /// When the current wake assertion lapses, if one is held
    pub fn wake_deadline(&self) -> Option<Instant> {
        self.wake_deadline
    }

    pub fn wake_max(&self) -> Duration {
        self.wake_max
    }

    /// Renew a held wake assertion by re-requesting it. The platform
    /// treats a repeat request as an extension; the previous handle is
    /// superseded. On denial the old assertion keeps its original bound.
    pub async fn renew_wake(&mut self) -> Result<(), ResourceError> {
        if !self.wake.held {
            return Ok(());
        }
        match self.platform.request_wake(self.wake_max).await {
            Ok(handle) => {
                self.wake.grant(handle);
                self.wake_deadline = Some(Instant::now() + self.wake_max);
                debug!("Wake assertion renewed for {:?}", self.wake_max);
                Ok(())
            }
            Err(e) => {
                warn!("Wake assertion renewal denied: {}", e);
                Err(ResourceError::Denied(ResourceKind::WakeAssertion))
            }
        }
    }

    fn grant(&self, kind: ResourceKind) -> &ResourceGrant {
        match kind {
            ResourceKind::WakeAssertion => &self.wake,
            ResourceKind::AudioPriority => &self.audio,
        }
    }
}
