//! Client layer over the call session core
//!
//! Thin forwarding glue between a UI/bridge layer and
//! `rcall-session-core`: a wire-level command surface with string tags
//! rejected at the boundary, a broadcast event stream carrying every
//! emitted status view, and the one-shot incoming-call ringer.

pub mod commands;
pub mod errors;
pub mod events;
pub mod manager;
pub mod ringer;

pub use commands::CallCommand;
pub use errors::{ClientError, ClientResult};
pub use events::ClientEvent;
pub use manager::ClientManager;
pub use ringer::{IncomingCall, IncomingCallRinger};

// Re-export the core surface consumers commonly need alongside the client
pub use rcall_session_core::{
    CallState, CoordinatorConfig, PlatformResources, ResourceKind, SessionId, StatusAction,
    StatusView,
};
