//! Device Information Abstraction

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::Result;

/// Host platform the core is running against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// HealthKit-backed store
    Ios,
    /// Google Fit / activity-recognition store
    Android,
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ios => f.write_str("ios"),
            Self::Android => f.write_str("android"),
        }
    }
}

/// Device info trait
///
/// Reports the OS version used to decide which permission quirks apply.
/// On Android this is the SDK level (e.g. `29` for Android 10); on iOS it
/// is the major OS version.
///
/// # Example
///
/// ```ignore
/// use bridge_traits::device::DeviceInfo;
///
/// async fn needs_activity_permission(info: &dyn DeviceInfo) -> Result<bool> {
///     Ok(info.os_version().await? > 28)
/// }
/// ```
#[async_trait::async_trait]
pub trait DeviceInfo: Send + Sync {
    /// Current OS version number
    async fn os_version(&self) -> Result<u32>;
}
