//! # Core Runtime Module
//!
//! Provides foundational runtime infrastructure for the health bridge core:
//! - Logging and tracing infrastructure
//! - Configuration management and bridge validation
//!
//! ## Overview
//!
//! Every other core crate is configured through [`config::HealthConfig`] and
//! logs through `tracing`; this crate owns both so hosts set them up once.

pub mod config;
pub mod error;
pub mod logging;

pub use config::{HealthConfig, HealthConfigBuilder, PermissionPolicy, ReadPolicy};
pub use error::{Error, Result};
