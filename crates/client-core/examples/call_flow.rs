//! Simulated Call Flow Example
//!
//! Walks a session through a complete lifecycle against a stub platform
//! provider and prints every status view the core emits, including the
//! platform revoking audio priority mid-call.
//!
//! Usage:
//!   cargo run --example call_flow

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::sleep;
use tracing::info;

use rcall_client_core::{
    CallCommand, ClientEvent, ClientManager, CoordinatorConfig, PlatformResources, ResourceKind,
};
use rcall_session_core::{PlatformHandle, ResourceError};

/// Stub platform that grants every request
struct StubPlatform;

#[async_trait]
impl PlatformResources for StubPlatform {
    async fn request_wake(&self, max_duration: Duration) -> Result<PlatformHandle, ResourceError> {
        info!("platform: wake assertion granted for {:?}", max_duration);
        Ok(PlatformHandle(1))
    }

    async fn release_wake(&self, _handle: PlatformHandle) -> Result<(), ResourceError> {
        info!("platform: wake assertion released");
        Ok(())
    }

    async fn request_audio_priority(&self) -> Result<PlatformHandle, ResourceError> {
        info!("platform: audio priority granted");
        Ok(PlatformHandle(2))
    }

    async fn release_audio_priority(&self, _handle: PlatformHandle) -> Result<(), ResourceError> {
        info!("platform: audio priority released");
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("info".parse()?),
        )
        .init();

    let client = ClientManager::new(Arc::new(StubPlatform), CoordinatorConfig::default());

    // Print every event the client broadcasts
    let mut events = client.subscribe_events();
    tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            match event {
                ClientEvent::StatusChanged { view, .. } => {
                    info!("status: [{}] {} {:?}", view.title, view.detail, view.actions);
                }
                ClientEvent::SessionEnded { session_id, .. } => {
                    info!("status surface dismissed for {}", session_id);
                }
                ClientEvent::IncomingCall { caller_name, caller_number, .. } => {
                    info!("incoming call: {} ({})", caller_name, caller_number);
                }
                ClientEvent::IncomingCallDismissed { .. } => {
                    info!("incoming call surface dismissed");
                }
            }
        }
    });

    // Outbound call walking the nominal state ordering
    client
        .execute(CallCommand::StartCall { call_number: Some("+15551234".to_string()) })
        .await?;
    for state in ["ringing", "connecting", "connected"] {
        sleep(Duration::from_millis(300)).await;
        client.update_call_state(state).await?;
    }

    sleep(Duration::from_secs(2)).await;
    client.set_call_muted(true).await?;
    client.set_call_held(true).await?;

    // Platform takes the audio path away mid-call; the session carries on.
    client.revocation_handle().revoke(ResourceKind::AudioPriority);
    sleep(Duration::from_millis(300)).await;

    client.set_call_held(false).await?;
    client.stop_call().await?;

    // Incoming call, declined
    client.show_incoming_call("Alice".to_string(), "+15550042".to_string()).await;
    sleep(Duration::from_millis(300)).await;
    client.decline_incoming().await?;

    sleep(Duration::from_millis(100)).await;
    Ok(())
}
