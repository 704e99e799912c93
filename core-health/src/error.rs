use bridge_traits::{BridgeError, Platform};
use thiserror::Error;

use crate::types::{DataType, Operation};

#[derive(Error, Debug)]
pub enum HealthError {
    /// The native store does not support this data type for the attempted operation.
    #[error("Data type {data_type} is not supported by the native health store")]
    Unsupported { data_type: DataType },

    /// The operation does not exist on this platform; no native call was made.
    #[error("{operation} is not supported on {platform}")]
    UnsupportedPlatform {
        operation: Operation,
        platform: Platform,
    },

    #[error("Unknown data type token: {0}")]
    UnknownDataType(String),

    #[error("Malformed {method} payload: {reason}")]
    MalformedPayload { method: String, reason: String },

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Any other native or bridge failure, surfaced unchanged.
    #[error(transparent)]
    Bridge(#[from] BridgeError),
}

impl HealthError {
    pub(crate) fn malformed(method: &str, reason: impl Into<String>) -> Self {
        Self::MalformedPayload {
            method: method.to_string(),
            reason: reason.into(),
        }
    }

    /// Native error code when the failure came straight from the platform.
    pub fn platform_code(&self) -> Option<&str> {
        match self {
            Self::Bridge(err) => err.platform_code(),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, HealthError>;
