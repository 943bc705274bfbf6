//! Wake Renewal Tests
//!
//! Paused-clock coverage of the coordinator's renewal task: the wake
//! assertion is re-requested before its deadline while the session
//! lives, and never after the session ends.

mod common;

use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use common::{MockPlatform, RecordingSink};
use rcall_session_core::{CoordinatorConfig, SessionCoordinator};

const WAKE_MAX: Duration = Duration::from_secs(100);

fn build(
    platform: Arc<MockPlatform>,
    sink: Arc<RecordingSink>,
) -> Arc<SessionCoordinator> {
    SessionCoordinator::new(platform, sink, CoordinatorConfig { wake_max: WAKE_MAX })
}

#[tokio::test(start_paused = true)]
async fn test_wake_assertion_renewed_before_deadline() {
    let platform = Arc::new(MockPlatform::new());
    let sink = Arc::new(RecordingSink::new());
    let coordinator = build(platform.clone(), sink);

    coordinator.start_session(None).await;
    assert_eq!(platform.wake_requests.load(Ordering::SeqCst), 1);

    // Renewal margin is wake_max / 10, so the task fires at t+90s.
    tokio::time::advance(Duration::from_secs(91)).await;
    tokio::time::sleep(Duration::from_millis(10)).await;
    assert_eq!(
        platform.wake_requests.load(Ordering::SeqCst),
        2,
        "assertion must be renewed before the platform bound lapses"
    );
}

#[tokio::test(start_paused = true)]
async fn test_no_renewal_after_session_ends() {
    let platform = Arc::new(MockPlatform::new());
    let sink = Arc::new(RecordingSink::new());
    let coordinator = build(platform.clone(), sink);

    coordinator.start_session(None).await;
    tokio::time::advance(Duration::from_secs(91)).await;
    tokio::time::sleep(Duration::from_millis(10)).await;
    assert_eq!(platform.wake_requests.load(Ordering::SeqCst), 2);

    coordinator.end_session().await.unwrap();
    tokio::time::advance(Duration::from_secs(400)).await;
    tokio::time::sleep(Duration::from_millis(10)).await;
    assert_eq!(
        platform.wake_requests.load(Ordering::SeqCst),
        2,
        "no renewals once the session is gone"
    );
}

#[tokio::test(start_paused = true)]
async fn test_denied_wake_means_no_renewal_task_churn() {
    let platform = Arc::new(MockPlatform::new());
    platform.deny_wake.store(true, Ordering::SeqCst);
    let sink = Arc::new(RecordingSink::new());
    let coordinator = build(platform.clone(), sink);

    coordinator.start_session(None).await;
    assert_eq!(platform.wake_requests.load(Ordering::SeqCst), 1);

    // No deadline to renew against: the task exits instead of spinning.
    tokio::time::advance(Duration::from_secs(500)).await;
    tokio::time::sleep(Duration::from_millis(10)).await;
    assert_eq!(platform.wake_requests.load(Ordering::SeqCst), 1);

    coordinator.end_session().await.unwrap();
}
