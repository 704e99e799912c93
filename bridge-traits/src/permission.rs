//! OS Permission Abstraction
//!
//! Coarse, OS-level permissions that gate access to health data before any
//! per-type health permission is meaningful.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// OS permission known to the bridge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    /// Android `ACTIVITY_RECOGNITION`, required from SDK 29 onward
    ActivityRecognition,
}

/// Result of a permission status check or request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionStatus {
    /// The user granted the permission
    Granted,
    /// The user denied the permission but may be asked again
    Denied,
    /// The user denied the permission and asked not to be prompted again
    PermanentlyDenied,
    /// The OS restricts the permission (parental controls, policy)
    Restricted,
}

impl PermissionStatus {
    pub fn is_granted(self) -> bool {
        matches!(self, Self::Granted)
    }
}

/// Permission handler trait
///
/// Queries and requests coarse OS permissions:
/// - **Android**: `ContextCompat.checkSelfPermission` / runtime permission dialog
/// - **iOS**: not used; HealthKit authorizes per data type
/// - **Desktop**: configurable fake (see `bridge-desktop`)
///
/// Calls are never cached by the core; each check reflects the current
/// OS state. `request` may show a system dialog.
#[async_trait::async_trait]
pub trait PermissionHandler: Send + Sync {
    /// Current status of a permission, without prompting the user
    async fn status(&self, permission: Permission) -> Result<PermissionStatus>;

    /// Ask the user for a permission, returning the resulting status
    async fn request(&self, permission: Permission) -> Result<PermissionStatus>;
}
