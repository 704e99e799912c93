//! # Health Core
//!
//! Uniform async access to device health data (steps, heart rate, distance,
//! sleep, ...) stored in the native platform health stores.
//!
//! ## Overview
//!
//! This crate sits directly on top of the native call boundary:
//!
//! - [`types`] - the closed set of [`DataType`]s and the normalized
//!   [`FitData`] / [`FitDataStatistics`] records
//! - [`permissions`] - permission checks with the Android activity-recognition quirk
//! - [`client`] - the [`HealthClient`] translating requests into native calls
//! - `wire` - method names, argument encoding and payload decoding
//!
//! ## Error Handling
//!
//! Only two failures are translated: a native "unsupported" code becomes
//! [`HealthError::Unsupported`], and operations a platform never offers fail
//! with [`HealthError::UnsupportedPlatform`] before any native call. Every
//! other native failure is surfaced unchanged as [`HealthError::Bridge`].

pub mod client;
pub mod error;
pub mod permissions;
pub mod types;
mod wire;

pub use client::{HealthClient, ReadRequest, DEFAULT_DATE_FROM_MILLIS};
pub use error::{HealthError, Result};
pub use permissions::PermissionGate;
pub use types::{DataType, FitData, FitDataStatistics, FitValue, Operation};
