//! Core service façade and bootstrap helpers.
//!
//! This crate wires host-provided bridge implementations (method channel,
//! device info, runtime permissions) into the health client. Desktop hosts
//! typically enable the `desktop-shims` feature, which fills any missing
//! bridge with the simulator from `bridge-desktop`.

pub mod error;

pub use error::{Result, ServiceError};

pub use core_health::{DataType, FitData, FitDataStatistics, HealthClient, HealthError};
pub use core_runtime::config::{HealthConfig, HealthConfigBuilder};
pub use core_runtime::logging::{init_logging, LogFormat, LoggingConfig};

use bridge_traits::Platform;
use std::sync::Arc;
use tracing::info;

/// Primary façade exposed to host applications.
#[derive(Clone)]
pub struct HealthService {
    config: Arc<HealthConfig>,
    client: HealthClient,
}

impl HealthService {
    /// Create a service from an already validated configuration.
    pub fn new(config: HealthConfig) -> Self {
        let client = HealthClient::new(&config);
        info!(
            platform = %config.platform,
            sdk_threshold = config.permission_policy.activity_recognition_sdk_threshold,
            "Health service initialized"
        );
        Self {
            config: Arc::new(config),
            client,
        }
    }

    /// Build the configuration and create the service.
    ///
    /// Fails with [`ServiceError::Runtime`] when a required bridge is missing.
    pub fn bootstrap(builder: HealthConfigBuilder) -> Result<Self> {
        let config = builder.build()?;
        Ok(Self::new(config))
    }

    /// Access the health client used by the service.
    pub fn client(&self) -> &HealthClient {
        &self.client
    }

    /// Access the configuration the service was created with.
    pub fn config(&self) -> Arc<HealthConfig> {
        Arc::clone(&self.config)
    }

    pub fn platform(&self) -> Platform {
        self.config.platform
    }
}

/// Convenience bootstrapper for desktop hosts.
///
/// Every bridge comes from `bridge-desktop`: the simulated health store,
/// a static OS version and an always-granted permission handler.
///
/// ```
/// # #[cfg(feature = "desktop-shims")]
/// # fn example() -> core_service::Result<()> {
/// use bridge_traits::Platform;
/// use core_service::bootstrap_desktop;
///
/// let service = bootstrap_desktop(Platform::Android)?;
/// assert_eq!(service.platform(), Platform::Android);
/// # Ok(())
/// # }
/// ```
#[cfg(feature = "desktop-shims")]
pub fn bootstrap_desktop(platform: Platform) -> Result<HealthService> {
    HealthService::bootstrap(HealthConfig::builder().platform(platform))
}
