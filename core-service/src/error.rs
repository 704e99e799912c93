use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Runtime error: {0}")]
    Runtime(#[from] core_runtime::Error),

    #[error("Health error: {0}")]
    Health(#[from] core_health::HealthError),
}

impl ServiceError {
    /// True when the underlying failure is a missing host bridge.
    pub fn is_capability_missing(&self) -> bool {
        matches!(
            self,
            Self::Runtime(core_runtime::Error::CapabilityMissing { .. })
        )
    }
}

pub type Result<T> = std::result::Result<T, ServiceError>;
