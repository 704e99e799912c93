//! # Health Configuration Module
//!
//! Provides configuration management for the health bridge core.
//!
//! ## Overview
//!
//! The configuration system uses a builder pattern to construct a
//! `HealthConfig` that holds every bridge the core needs plus the policies
//! that shape request translation. It validates fail-fast so a host learns
//! about a missing bridge at startup, not on the first read.
//!
//! ## Required Dependencies
//!
//! - `Platform` - which native store the host is bridging
//! - `HealthChannel` - the native request/response port
//! - `DeviceInfo` - Android only, for the activity-recognition quirk
//! - `PermissionHandler` - Android only, for the activity-recognition quirk
//!
//! ## Optional Dependencies
//!
//! - `Clock` - defaults to [`SystemClock`]
//!
//! When the `desktop-shims` feature is enabled, the simulator bridges from
//! `bridge-desktop` are injected for any missing dependency.
//!
//! ## Usage
//!
//! ```ignore
//! use bridge_traits::Platform;
//! use core_runtime::config::HealthConfig;
//! use std::sync::Arc;
//!
//! let config = HealthConfig::builder()
//!     .platform(Platform::Android)
//!     .channel(Arc::new(MyMethodChannel))
//!     .device_info(Arc::new(MyDeviceInfo))
//!     .permission_handler(Arc::new(MyPermissionHandler))
//!     .activity_recognition_sdk_threshold(28)
//!     .build()
//!     .expect("Failed to build config");
//! ```

use crate::error::{Error, Result};
use bridge_traits::{Clock, DeviceInfo, HealthChannel, PermissionHandler, Platform, SystemClock};
use std::sync::Arc;

/// Android SDK level above which activity recognition is a runtime permission.
pub const DEFAULT_ACTIVITY_RECOGNITION_SDK_THRESHOLD: u32 = 28;

/// Native error code that marks a data type as unsupported.
pub const DEFAULT_UNSUPPORTED_ERROR_CODE: &str = "unsupported";

/// Core configuration for the health bridge.
///
/// Use [`HealthConfigBuilder`] to construct instances.
#[derive(Clone)]
pub struct HealthConfig {
    /// Platform whose native store sits behind the channel
    pub platform: Platform,

    /// Native health store port (required)
    pub channel: Arc<dyn HealthChannel>,

    /// OS version source (required on Android)
    pub device_info: Option<Arc<dyn DeviceInfo>>,

    /// Coarse OS permission handler (required on Android)
    pub permission_handler: Option<Arc<dyn PermissionHandler>>,

    /// Time source for open-ended read ranges
    pub clock: Arc<dyn Clock>,

    pub permission_policy: PermissionPolicy,

    pub read_policy: ReadPolicy,
}

impl std::fmt::Debug for HealthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HealthConfig")
            .field("platform", &self.platform)
            .field("channel", &"HealthChannel { ... }")
            .field(
                "device_info",
                &self.device_info.as_ref().map(|_| "DeviceInfo { ... }"),
            )
            .field(
                "permission_handler",
                &self
                    .permission_handler
                    .as_ref()
                    .map(|_| "PermissionHandler { ... }"),
            )
            .field("clock", &"Clock { ... }")
            .field("permission_policy", &self.permission_policy)
            .field("read_policy", &self.read_policy)
            .finish()
    }
}

/// Controls the OS-version-gated permission pre-check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PermissionPolicy {
    /// Android SDK versions strictly greater than this need the
    /// activity-recognition permission before health permissions are queried.
    pub activity_recognition_sdk_threshold: u32,
}

impl Default for PermissionPolicy {
    fn default() -> Self {
        Self {
            activity_recognition_sdk_threshold: DEFAULT_ACTIVITY_RECOGNITION_SDK_THRESHOLD,
        }
    }
}

impl PermissionPolicy {
    /// Whether the coarse activity-recognition gate applies.
    ///
    /// Pure function of the platform and OS version so it can be tested
    /// without a device.
    pub fn requires_activity_recognition(&self, platform: Platform, os_version: u32) -> bool {
        platform == Platform::Android && os_version > self.activity_recognition_sdk_threshold
    }
}

/// Controls how read requests are translated and their results mapped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadPolicy {
    /// Native error code translated into an unsupported-data-type error
    pub unsupported_error_code: String,

    /// Truncate native results to the requested limit
    ///
    /// The limit is always forwarded to native code. With this enabled the
    /// core also enforces it, so callers never see more than they asked for
    /// even when a native store ignores the argument.
    pub truncate_to_limit: bool,
}

impl Default for ReadPolicy {
    fn default() -> Self {
        Self {
            unsupported_error_code: DEFAULT_UNSUPPORTED_ERROR_CODE.to_string(),
            truncate_to_limit: true,
        }
    }
}

impl HealthConfig {
    /// Creates a new builder for constructing a `HealthConfig`.
    pub fn builder() -> HealthConfigBuilder {
        HealthConfigBuilder::default()
    }

    /// Validates the configuration and returns an error if invalid.
    ///
    /// This checks:
    /// - Android configs carry the bridges the permission gate needs
    /// - The unsupported error code is not empty
    pub fn validate(&self) -> Result<()> {
        if self.platform == Platform::Android {
            if self.device_info.is_none() {
                return Err(device_info_missing_error());
            }
            if self.permission_handler.is_none() {
                return Err(permission_handler_missing_error());
            }
        }

        if self.read_policy.unsupported_error_code.trim().is_empty() {
            return Err(Error::Config(
                "Unsupported error code cannot be empty".to_string(),
            ));
        }

        Ok(())
    }
}

fn device_info_missing_error() -> Error {
    Error::CapabilityMissing {
        capability: "DeviceInfo".to_string(),
        message: "DeviceInfo implementation is required on Android to decide whether the \
                 activity-recognition permission applies. \
                 Android: inject an adapter reporting Build.VERSION.SDK_INT. \
                 Desktop: enable the 'desktop-shims' feature."
            .to_string(),
    }
}

fn permission_handler_missing_error() -> Error {
    Error::CapabilityMissing {
        capability: "PermissionHandler".to_string(),
        message: "PermissionHandler implementation is required on Android for the \
                 activity-recognition permission. \
                 Android: inject a runtime-permission adapter. \
                 Desktop: enable the 'desktop-shims' feature."
            .to_string(),
    }
}

#[cfg(not(feature = "desktop-shims"))]
fn provide_default_channel(_platform: Platform) -> Result<Arc<dyn HealthChannel>> {
    Err(Error::CapabilityMissing {
        capability: "HealthChannel".to_string(),
        message: "HealthChannel implementation is required to reach the native health store. \
                 iOS: inject a HealthKit method-channel adapter. \
                 Android: inject a Google Fit method-channel adapter. \
                 Desktop: enable the 'desktop-shims' feature to use the simulated store."
            .to_string(),
    })
}

#[cfg(feature = "desktop-shims")]
fn provide_default_channel(platform: Platform) -> Result<Arc<dyn HealthChannel>> {
    use bridge_desktop::SimulatedHealthStore;

    let channel: Arc<dyn HealthChannel> = Arc::new(SimulatedHealthStore::new(platform));
    Ok(channel)
}

#[cfg(not(feature = "desktop-shims"))]
fn provide_default_device_info(_platform: Platform) -> Option<Arc<dyn DeviceInfo>> {
    None
}

#[cfg(feature = "desktop-shims")]
fn provide_default_device_info(platform: Platform) -> Option<Arc<dyn DeviceInfo>> {
    use bridge_desktop::StaticDeviceInfo;

    let info: Arc<dyn DeviceInfo> = Arc::new(StaticDeviceInfo::for_platform(platform));
    Some(info)
}

#[cfg(not(feature = "desktop-shims"))]
fn provide_default_permission_handler() -> Option<Arc<dyn PermissionHandler>> {
    None
}

#[cfg(feature = "desktop-shims")]
fn provide_default_permission_handler() -> Option<Arc<dyn PermissionHandler>> {
    use bridge_desktop::DesktopPermissionHandler;

    let handler: Arc<dyn PermissionHandler> = Arc::new(DesktopPermissionHandler::granted());
    Some(handler)
}

/// Builder for constructing [`HealthConfig`] instances.
///
/// Call [`build()`](HealthConfigBuilder::build) once every required bridge is
/// set; the builder reports the first missing capability with an actionable
/// message.
#[derive(Default)]
pub struct HealthConfigBuilder {
    platform: Option<Platform>,
    channel: Option<Arc<dyn HealthChannel>>,
    device_info: Option<Arc<dyn DeviceInfo>>,
    permission_handler: Option<Arc<dyn PermissionHandler>>,
    clock: Option<Arc<dyn Clock>>,
    permission_policy: PermissionPolicy,
    read_policy: ReadPolicy,
}

impl HealthConfigBuilder {
    /// Sets the host platform.
    ///
    /// # Examples
    ///
    /// ```
    /// use bridge_traits::Platform;
    /// use core_runtime::config::HealthConfig;
    ///
    /// let builder = HealthConfig::builder().platform(Platform::Ios);
    /// ```
    pub fn platform(mut self, platform: Platform) -> Self {
        self.platform = Some(platform);
        self
    }

    pub fn channel(mut self, channel: Arc<dyn HealthChannel>) -> Self {
        self.channel = Some(channel);
        self
    }

    pub fn device_info(mut self, info: Arc<dyn DeviceInfo>) -> Self {
        self.device_info = Some(info);
        self
    }

    pub fn permission_handler(mut self, handler: Arc<dyn PermissionHandler>) -> Self {
        self.permission_handler = Some(handler);
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Sets the SDK level above which activity recognition gates health permissions.
    pub fn activity_recognition_sdk_threshold(mut self, threshold: u32) -> Self {
        self.permission_policy.activity_recognition_sdk_threshold = threshold;
        self
    }

    pub fn unsupported_error_code(mut self, code: impl Into<String>) -> Self {
        self.read_policy.unsupported_error_code = code.into();
        self
    }

    pub fn truncate_to_limit(mut self, enabled: bool) -> Self {
        self.read_policy.truncate_to_limit = enabled;
        self
    }

    /// Builds the configuration.
    ///
    /// # Errors
    ///
    /// - `Error::Config` if the platform is not set or a policy is invalid
    /// - `Error::CapabilityMissing` if a required bridge is absent and no
    ///   desktop default is available
    pub fn build(self) -> Result<HealthConfig> {
        let platform = self.platform.ok_or_else(|| {
            Error::Config("Platform is required. Use .platform() to set it.".to_string())
        })?;

        let channel = match self.channel {
            Some(channel) => channel,
            None => provide_default_channel(platform)?,
        };

        let config = HealthConfig {
            platform,
            channel,
            device_info: self
                .device_info
                .or_else(|| provide_default_device_info(platform)),
            permission_handler: self
                .permission_handler
                .or_else(provide_default_permission_handler),
            clock: self.clock.unwrap_or_else(|| Arc::new(SystemClock)),
            permission_policy: self.permission_policy,
            read_policy: self.read_policy,
        };

        config.validate()?;

        Ok(config)
    }
}
