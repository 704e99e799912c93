use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    /// A bridge the platform needs was not injected and has no desktop default.
    #[error("Capability missing: {capability} - {message}")]
    CapabilityMissing { capability: String, message: String },
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    fn capability(err: &Error) -> Option<&str> {
        match err {
            Error::Config(_) => None,
            Error::CapabilityMissing { capability, .. } => Some(capability),
        }
    }

    #[test]
    fn test_error_messages() {
        let config = Error::Config("Platform is required".to_string());
        assert_eq!(config.to_string(), "Configuration error: Platform is required");
        assert_eq!(capability(&config), None);

        let missing = Error::CapabilityMissing {
            capability: "DeviceInfo".to_string(),
            message: "inject an adapter".to_string(),
        };
        assert_eq!(
            missing.to_string(),
            "Capability missing: DeviceInfo - inject an adapter"
        );
        assert_eq!(capability(&missing), Some("DeviceInfo"));
    }
}
