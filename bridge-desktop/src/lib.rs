//! # Desktop Bridge Implementations
//!
//! Default implementations of the bridge traits for desktop hosts
//! (macOS, Windows, Linux) and tests.
//!
//! ## Overview
//!
//! Desktops have no health store, so these shims simulate one:
//! - `HealthChannel` backed by an in-memory sample store speaking the mobile wire format
//! - `PermissionHandler` with a configurable activity-recognition status
//! - `DeviceInfo` reporting a fixed OS version
//!
//! ## Usage
//!
//! ```ignore
//! use bridge_desktop::{SimulatedHealthStore, SimulatedSample};
//! use bridge_traits::Platform;
//!
//! let store = SimulatedHealthStore::new(Platform::Android);
//! store.insert_sample(SimulatedSample::new("step_count", 1_200.0, start, end)).await;
//! ```

mod device;
mod permission;
mod store;

pub use device::StaticDeviceInfo;
pub use permission::DesktopPermissionHandler;
pub use store::{SimulatedHealthStore, SimulatedSample, MAX_RECORDED_CALLS, UNSUPPORTED_CODE};
