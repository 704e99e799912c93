//! Device Info Implementation

use async_trait::async_trait;
use bridge_traits::{device::DeviceInfo, device::Platform, error::Result};

/// Device info source reporting a fixed OS version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaticDeviceInfo {
    os_version: u32,
}

impl StaticDeviceInfo {
    pub fn new(os_version: u32) -> Self {
        Self { os_version }
    }

    /// A current OS release for the platform: Android 14 (SDK 34) or iOS 17.
    pub fn for_platform(platform: Platform) -> Self {
        match platform {
            Platform::Android => Self::new(34),
            Platform::Ios => Self::new(17),
        }
    }
}

#[async_trait]
impl DeviceInfo for StaticDeviceInfo {
    async fn os_version(&self) -> Result<u32> {
        Ok(self.os_version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_for_platform() {
        let android = StaticDeviceInfo::for_platform(Platform::Android);
        assert_eq!(android.os_version().await.unwrap(), 34);

        let legacy = StaticDeviceInfo::new(28);
        assert_eq!(legacy.os_version().await.unwrap(), 28);
    }
}
