//! # Host Bridge Traits
//!
//! Platform abstraction traits that each host must implement so the core can
//! reach the native health store.
//!
//! ## Overview
//!
//! This crate defines the contract between the health core and
//! platform-specific code. Each trait is one capability the core consumes but
//! never implements itself: the native health store, the OS permission
//! dialog, the device version query.
//!
//! ## Traits
//!
//! ### Native Health Store
//! - [`HealthChannel`](channel::HealthChannel) - Request/response port into HealthKit or Google Fit
//!
//! ### Platform Integration
//! - [`PermissionHandler`](permission::PermissionHandler) - Coarse OS permissions (activity recognition)
//! - [`DeviceInfo`](device::DeviceInfo) - OS version used for permission quirks
//!
//! ### Utilities
//! - [`Clock`](time::Clock) - Time source for deterministic testing
//! - [`LoggerSink`](time::LoggerSink) - Forward structured logs to host logging
//!
//! ## Platform Requirements
//!
//! | Platform | Implementation Crate | Status |
//! |----------|---------------------|--------|
//! | Desktop  | `bridge-desktop` (simulator) | ✅ Available |
//! | iOS      | Host app (HealthKit) | 📋 Host-provided |
//! | Android  | Host app (Google Fit) | 📋 Host-provided |
//!
//! ## Error Handling
//!
//! All bridge traits use [`BridgeError`](error::BridgeError). Native failures
//! must surface as [`BridgeError::Platform`](error::BridgeError::Platform)
//! with the platform's error code unchanged, since the core matches on it.
//!
//! ## Thread Safety
//!
//! All bridge traits require `Send + Sync` so a single set of bridges can be
//! shared by concurrent requests.

pub mod channel;
pub mod device;
pub mod error;
pub mod permission;
pub mod time;

pub use error::BridgeError;

// Re-export commonly used types
pub use channel::{HealthChannel, MethodCall};
pub use device::{DeviceInfo, Platform};
pub use permission::{Permission, PermissionHandler, PermissionStatus};
pub use time::{Clock, ConsoleLogger, FixedClock, LogEntry, LogLevel, LoggerSink, SystemClock};
