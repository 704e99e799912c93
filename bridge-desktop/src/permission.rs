//! Permission Handler Implementation

use async_trait::async_trait;
use bridge_traits::{
    error::Result,
    permission::{Permission, PermissionHandler, PermissionStatus},
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// Desktop permission handler
///
/// Desktop operating systems have no activity-recognition permission, so this
/// handler reports a configurable status. A request moves the status to the
/// configured request outcome, mimicking the user answering a dialog.
#[derive(Clone)]
pub struct DesktopPermissionHandler {
    status: Arc<RwLock<PermissionStatus>>,
    request_outcome: PermissionStatus,
    status_checks: Arc<AtomicUsize>,
    requests: Arc<AtomicUsize>,
}

impl DesktopPermissionHandler {
    pub fn new(status: PermissionStatus) -> Self {
        Self {
            status: Arc::new(RwLock::new(status)),
            request_outcome: status,
            status_checks: Arc::new(AtomicUsize::new(0)),
            requests: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Handler whose permission is already granted.
    pub fn granted() -> Self {
        Self::new(PermissionStatus::Granted)
    }

    /// Handler whose permission is denied and stays denied when requested.
    pub fn denied() -> Self {
        Self::new(PermissionStatus::Denied)
    }

    /// Status the simulated user picks when a request dialog is shown.
    pub fn with_request_outcome(mut self, outcome: PermissionStatus) -> Self {
        self.request_outcome = outcome;
        self
    }

    /// Number of `status` calls made so far
    pub fn status_checks(&self) -> usize {
        self.status_checks.load(Ordering::SeqCst)
    }

    /// Number of `request` calls made so far
    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

impl Default for DesktopPermissionHandler {
    fn default() -> Self {
        Self::granted()
    }
}

#[async_trait]
impl PermissionHandler for DesktopPermissionHandler {
    async fn status(&self, permission: Permission) -> Result<PermissionStatus> {
        self.status_checks.fetch_add(1, Ordering::SeqCst);
        let status = *self.status.read().await;
        debug!(?permission, ?status, "Permission status checked");
        Ok(status)
    }

    async fn request(&self, permission: Permission) -> Result<PermissionStatus> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        let mut status = self.status.write().await;
        if !status.is_granted() {
            *status = self.request_outcome;
        }
        debug!(?permission, status = ?*status, "Permission requested");
        Ok(*status)
    }
}
