//! Shared test doubles: a counting platform provider and a recording sink

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use rcall_session_core::{
    PlatformHandle, PlatformResources, ResourceError, ResourceKind, SessionId, StatusSink,
    StatusView,
};

/// Platform provider that counts every request/release and can be told
/// to deny grants.
#[derive(Default)]
pub struct MockPlatform {
    pub wake_requests: AtomicUsize,
    pub audio_requests: AtomicUsize,
    pub wake_releases: AtomicUsize,
    pub audio_releases: AtomicUsize,
    pub deny_wake: AtomicBool,
    pub deny_audio: AtomicBool,
    next_handle: AtomicU64,
}

impl MockPlatform {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_handle(&self) -> PlatformHandle {
        PlatformHandle(self.next_handle.fetch_add(1, Ordering::SeqCst))
    }
}

#[async_trait]
impl PlatformResources for MockPlatform {
    async fn request_wake(&self, _max_duration: Duration) -> Result<PlatformHandle, ResourceError> {
        self.wake_requests.fetch_add(1, Ordering::SeqCst);
        if self.deny_wake.load(Ordering::SeqCst) {
            return Err(ResourceError::Denied(ResourceKind::WakeAssertion));
        }
        Ok(self.next_handle())
    }

    async fn release_wake(&self, _handle: PlatformHandle) -> Result<(), ResourceError> {
        self.wake_releases.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn request_audio_priority(&self) -> Result<PlatformHandle, ResourceError> {
        self.audio_requests.fetch_add(1, Ordering::SeqCst);
        if self.deny_audio.load(Ordering::SeqCst) {
            return Err(ResourceError::Denied(ResourceKind::AudioPriority));
        }
        Ok(self.next_handle())
    }

    async fn release_audio_priority(&self, _handle: PlatformHandle) -> Result<(), ResourceError> {
        self.audio_releases.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Sink that records every emission for later assertions
#[derive(Default)]
pub struct RecordingSink {
    pub views: Mutex<Vec<(SessionId, StatusView)>>,
    pub ended: Mutex<Vec<SessionId>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_view(&self) -> Option<StatusView> {
        self.views.lock().unwrap().last().map(|(_, view)| view.clone())
    }

    pub fn view_count(&self) -> usize {
        self.views.lock().unwrap().len()
    }

    pub fn ended_count(&self) -> usize {
        self.ended.lock().unwrap().len()
    }
}

#[async_trait]
impl StatusSink for RecordingSink {
    async fn on_status(&self, session_id: SessionId, view: StatusView) {
        self.views.lock().unwrap().push((session_id, view));
    }

    async fn on_session_ended(&self, session_id: SessionId) {
        self.ended.lock().unwrap().push(session_id);
    }
}
