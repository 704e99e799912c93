use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("Bridge capability not available: {0}")]
    NotAvailable(String),

    #[error("Bridge operation failed: {0}")]
    OperationFailed(String),

    /// Failure reported by native code, carrying the platform's error code.
    #[error("Platform error [{code}]: {}", .message.as_deref().unwrap_or("no message"))]
    Platform {
        code: String,
        message: Option<String>,
        details: Option<Value>,
    },
}

impl BridgeError {
    /// Build a native platform error with just a code and message.
    pub fn platform(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Platform {
            code: code.into(),
            message: Some(message.into()),
            details: None,
        }
    }

    /// Native error code, if this error came from the platform.
    pub fn platform_code(&self) -> Option<&str> {
        match self {
            Self::Platform { code, .. } => Some(code.as_str()),
            Self::NotAvailable(_) | Self::OperationFailed(_) => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, BridgeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_code() {
        let err = BridgeError::platform("unsupported", "no such type");
        assert_eq!(err.platform_code(), Some("unsupported"));
        assert_eq!(err.to_string(), "Platform error [unsupported]: no such type");

        let other = BridgeError::OperationFailed("boom".to_string());
        assert_eq!(other.platform_code(), None);

        let missing = BridgeError::NotAvailable("DeviceInfo".to_string());
        assert_eq!(missing.platform_code(), None);
    }

    #[test]
    fn test_platform_error_without_message() {
        let err = BridgeError::Platform {
            code: "timeout".to_string(),
            message: None,
            details: None,
        };
        assert_eq!(err.to_string(), "Platform error [timeout]: no message");
    }
}
