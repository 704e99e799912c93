//! Native Health Channel Abstraction
//!
//! The single request/response port through which the core reaches the
//! native health store.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::Result;

/// A named native call with a map of primitive arguments.
///
/// # Example
///
/// ```
/// use bridge_traits::channel::MethodCall;
///
/// let call = MethodCall::new("read")
///     .arg("type", "step_count")
///     .arg("date_from", 1_i64)
///     .arg("limit", None::<i64>);
///
/// assert_eq!(call.method, "read");
/// assert_eq!(call.get_str("type"), Some("step_count"));
/// assert!(call.arguments["limit"].is_null());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodCall {
    /// Native method name (e.g. `read`, `hasPermissions`)
    pub method: String,
    /// Primitive arguments keyed by wire name
    pub arguments: Map<String, Value>,
}

impl MethodCall {
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            arguments: Map::new(),
        }
    }

    /// Add an argument. `None` values are sent as JSON `null`.
    pub fn arg(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.arguments.insert(key.into(), value.into());
        self
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.arguments.get(key).and_then(Value::as_str)
    }

    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.arguments.get(key).and_then(Value::as_i64)
    }
}

/// Native health channel trait
///
/// Abstracts the cross-process call into the platform health store:
/// - **iOS**: HealthKit, reached through the host's method channel
/// - **Android**: Google Fit / activity-recognition store
/// - **Desktop**: in-memory simulator (see `bridge-desktop`)
///
/// Implementations return either a list of item maps, a single aggregate
/// map, or a boolean, depending on the method. Native failures must be
/// reported as [`BridgeError::Platform`](crate::error::BridgeError::Platform)
/// with the platform's string code left untouched.
///
/// # Example
///
/// ```ignore
/// use bridge_traits::channel::{HealthChannel, MethodCall};
///
/// async fn count_steps(channel: &dyn HealthChannel) -> Result<usize> {
///     let call = MethodCall::new("read").arg("type", "step_count");
///     let payload = channel.invoke(call).await?;
///     Ok(payload.as_array().map(Vec::len).unwrap_or(0))
/// }
/// ```
#[async_trait::async_trait]
pub trait HealthChannel: Send + Sync {
    /// Invoke a native method and wait for its response.
    async fn invoke(&self, call: MethodCall) -> Result<Value>;
}
