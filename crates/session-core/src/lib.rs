//! Single-call session coordination
//!
//! This crate tracks the lifecycle of one active voice call: a
//! single-session state machine, exclusive holding of the two platform
//! resources the call needs (wake assertion and audio priority), and a
//! pure projection of session state into a user-visible status view.
//!
//! The architecture consists of:
//! - Types: the closed `CallState` enumeration and the `CallSession` value
//! - Resource Arbiter: idempotent acquire/release of the platform grants
//! - Status Projector: pure `(session, now) -> StatusView` mapping
//! - Session Coordinator: serializes every mutation behind one lock and
//!   emits exactly one view per accepted change
//!
//! There is no multi-call model: starting a session while one is live
//! replaces it.

// Core modules
pub mod coordinator;
pub mod errors;
pub mod resources;
pub mod status;
pub mod types;

// Re-export the coordinator surface
pub use coordinator::{CoordinatorConfig, SessionCoordinator, StatusSink};

// Re-export core types
pub use types::{CallSession, CallState, SessionId};

// Re-export error types
pub use errors::{Result, SessionError};

// Re-export the resource layer for platform adapters
pub use resources::{
    PlatformHandle, PlatformResources, ResourceArbiter, ResourceError, ResourceGrant,
    ResourceKind, RevocationSender, DEFAULT_WAKE_MAX,
};

// Re-export the projection surface
pub use status::{project, StatusAction, StatusView};
