//! # Health Client
//!
//! Translates typed health requests into native channel calls and normalizes
//! the responses.
//!
//! ## Overview
//!
//! Each operation is a single stateless round trip:
//!
//! 1. Reject the call locally if the platform lacks the operation
//! 2. Resolve defaults (range start at epoch millisecond 1, range end at now)
//! 3. Invoke the native channel with the type's wire token
//! 4. Decode the payload, mapping the native "unsupported" code to
//!    [`HealthError::Unsupported`]
//!
//! ## Usage
//!
//! ```ignore
//! use core_health::{DataType, HealthClient};
//!
//! let client = HealthClient::new(&config);
//! if client.request_permissions(&[DataType::StepCount]).await? {
//!     let steps = client.read(DataType::StepCount, None, None, Some(100)).await?;
//! }
//! ```

use bridge_traits::{BridgeError, Clock, HealthChannel, MethodCall, Platform};
use chrono::{DateTime, Utc};
use core_runtime::config::{HealthConfig, ReadPolicy};
use futures::future::join_all;
use std::sync::Arc;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use crate::error::{HealthError, Result};
use crate::permissions::PermissionGate;
use crate::types::{DataType, FitData, FitDataStatistics, Operation};
use crate::wire;

/// Range start used when the caller leaves it open: epoch millisecond 1.
pub const DEFAULT_DATE_FROM_MILLIS: i64 = 1;

/// A read of one data type over an optional range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadRequest {
    pub data_type: DataType,
    /// Range start; defaults to epoch millisecond 1
    pub date_from: Option<DateTime<Utc>>,
    /// Range end; defaults to now
    pub date_to: Option<DateTime<Utc>>,
    /// Maximum number of samples
    ///
    /// Unbounded reads of dense types (heart rate, steps) can overflow the
    /// cross-process transport on constrained devices. Set a limit unless
    /// the range is known to be small.
    pub limit: Option<usize>,
}

impl ReadRequest {
    pub fn new(data_type: DataType) -> Self {
        Self {
            data_type,
            date_from: None,
            date_to: None,
            limit: None,
        }
    }

    pub fn from(mut self, date_from: DateTime<Utc>) -> Self {
        self.date_from = Some(date_from);
        self
    }

    pub fn to(mut self, date_to: DateTime<Utc>) -> Self {
        self.date_to = Some(date_to);
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Resolve an optional range into epoch milliseconds.
fn resolve_range(
    clock: &dyn Clock,
    date_from: Option<DateTime<Utc>>,
    date_to: Option<DateTime<Utc>>,
) -> Result<(i64, i64)> {
    let from = date_from
        .map(|d| d.timestamp_millis())
        .unwrap_or(DEFAULT_DATE_FROM_MILLIS);
    let to = date_to
        .map(|d| d.timestamp_millis())
        .unwrap_or_else(|| clock.unix_timestamp_millis());

    if from > to {
        return Err(HealthError::InvalidRequest(format!(
            "date_from ({}) is after date_to ({})",
            from, to
        )));
    }
    Ok((from, to))
}

/// Request translator and response normalizer over a native health channel.
///
/// Cheap to clone; clones share the same bridges. Concurrent calls are
/// independent and hold no shared mutable state.
#[derive(Clone)]
pub struct HealthClient {
    platform: Platform,
    channel: Arc<dyn HealthChannel>,
    clock: Arc<dyn Clock>,
    permissions: PermissionGate,
    read_policy: ReadPolicy,
}

impl HealthClient {
    /// Create a client from a validated configuration.
    pub fn new(config: &HealthConfig) -> Self {
        Self {
            platform: config.platform,
            channel: Arc::clone(&config.channel),
            clock: Arc::clone(&config.clock),
            permissions: PermissionGate::new(
                config.platform,
                Arc::clone(&config.channel),
                config.device_info.clone(),
                config.permission_handler.clone(),
                config.permission_policy,
            ),
            read_policy: config.read_policy.clone(),
        }
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    // -------------------------------------------------------------------------
    // Permissions
    // -------------------------------------------------------------------------

    #[instrument(skip(self), fields(request_id = %Uuid::new_v4()))]
    pub async fn has_permissions(&self, types: &[DataType]) -> Result<bool> {
        self.ensure_available(Operation::HasPermissions)?;
        self.permissions.has_permissions(types).await
    }

    #[instrument(skip(self), fields(request_id = %Uuid::new_v4()))]
    pub async fn request_permissions(&self, types: &[DataType]) -> Result<bool> {
        self.ensure_available(Operation::RequestPermissions)?;
        self.permissions.request_permissions(types).await
    }

    #[instrument(skip(self), fields(request_id = %Uuid::new_v4()))]
    pub async fn revoke_permissions(&self) -> Result<()> {
        self.ensure_available(Operation::RevokePermissions)?;
        self.permissions.revoke_permissions().await
    }

    // -------------------------------------------------------------------------
    // Record API
    // -------------------------------------------------------------------------

    /// Subscribe to background activity recording (Android only).
    #[instrument(skip(self), fields(request_id = %Uuid::new_v4()))]
    pub async fn start_record_api(&self) -> Result<bool> {
        self.ensure_available(Operation::StartRecordApi)?;
        let payload = self
            .channel
            .invoke(MethodCall::new(wire::START_RECORD_API))
            .await?;
        wire::decode_bool(wire::START_RECORD_API, payload)
    }

    /// Whether background activity recording is active (Android only).
    #[instrument(skip(self), fields(request_id = %Uuid::new_v4()))]
    pub async fn list_record_api(&self) -> Result<bool> {
        self.ensure_available(Operation::ListRecordApi)?;
        let payload = self
            .channel
            .invoke(MethodCall::new(wire::LIST_RECORD_API))
            .await?;
        wire::decode_bool(wire::LIST_RECORD_API, payload)
    }

    // -------------------------------------------------------------------------
    // Reads
    // -------------------------------------------------------------------------

    /// Read samples of one type, in native order.
    pub async fn read(
        &self,
        data_type: DataType,
        date_from: Option<DateTime<Utc>>,
        date_to: Option<DateTime<Utc>>,
        limit: Option<usize>,
    ) -> Result<Vec<FitData>> {
        self.read_request(ReadRequest {
            data_type,
            date_from,
            date_to,
            limit,
        })
        .await
    }

    #[instrument(
        skip(self, request),
        fields(request_id = %Uuid::new_v4(), data_type = %request.data_type, limit = ?request.limit)
    )]
    pub async fn read_request(&self, request: ReadRequest) -> Result<Vec<FitData>> {
        self.ensure_available(Operation::Read)?;
        let (from, to) = resolve_range(self.clock.as_ref(), request.date_from, request.date_to)?;

        if request.limit.is_none() {
            warn!("Unbounded read; large results may overflow the native transport");
        }

        let call = wire::read_call(request.data_type, from, to, request.limit);
        let payload = self
            .channel
            .invoke(call)
            .await
            .map_err(|err| self.map_native_error(request.data_type, err))?;

        let mut samples = wire::decode_samples(request.data_type, payload)?;
        if let Some(limit) = request.limit {
            if self.read_policy.truncate_to_limit && samples.len() > limit {
                debug!(
                    received = samples.len(),
                    limit, "Native store ignored limit; truncating"
                );
                samples.truncate(limit);
            }
        }

        debug!(count = samples.len(), "Read completed");
        Ok(samples)
    }

    /// Most recent sample of a type, if any.
    ///
    /// Same as `read(data_type, None, None, Some(1))` keeping the first item.
    pub async fn read_last(&self, data_type: DataType) -> Result<Option<FitData>> {
        self.ensure_available(Operation::ReadLast)?;
        let samples = self.read(data_type, None, None, Some(1)).await?;
        Ok(samples.into_iter().next())
    }

    /// Read several types concurrently.
    ///
    /// Each type is an independent `read`; one failing does not affect the
    /// others. Results come back in input order.
    pub async fn read_many(
        &self,
        types: &[DataType],
        date_from: Option<DateTime<Utc>>,
        date_to: Option<DateTime<Utc>>,
        limit: Option<usize>,
    ) -> Vec<(DataType, Result<Vec<FitData>>)> {
        let reads = types
            .iter()
            .map(|&data_type| async move {
                let result = self.read(data_type, date_from, date_to, limit).await;
                (data_type, result)
            });
        join_all(reads).await
    }

    // -------------------------------------------------------------------------
    // Statistics
    // -------------------------------------------------------------------------

    /// Sum of an addable type over a range (Android only).
    pub async fn read_statistics(
        &self,
        data_type: DataType,
        date_from: Option<DateTime<Utc>>,
        date_to: Option<DateTime<Utc>>,
    ) -> Result<FitDataStatistics> {
        self.aggregate(Operation::ReadStatistics, data_type, date_from, date_to)
            .await
    }

    /// Alias of [`read_statistics`](Self::read_statistics) kept for hosts
    /// that call the history entry point.
    pub async fn read_history_android(
        &self,
        data_type: DataType,
        date_from: Option<DateTime<Utc>>,
        date_to: Option<DateTime<Utc>>,
    ) -> Result<FitDataStatistics> {
        self.aggregate(Operation::ReadHistoryAndroid, data_type, date_from, date_to)
            .await
    }

    #[instrument(skip(self), fields(request_id = %Uuid::new_v4()))]
    async fn aggregate(
        &self,
        operation: Operation,
        data_type: DataType,
        date_from: Option<DateTime<Utc>>,
        date_to: Option<DateTime<Utc>>,
    ) -> Result<FitDataStatistics> {
        self.ensure_available(operation)?;

        if !data_type.is_addable() {
            return Err(HealthError::Unsupported { data_type });
        }

        let (from, to) = resolve_range(self.clock.as_ref(), date_from, date_to)?;
        let payload = self
            .channel
            .invoke(wire::statistics_call(data_type, from, to))
            .await
            .map_err(|err| self.map_native_error(data_type, err))?;

        wire::decode_statistics(data_type, payload)
    }

    // -------------------------------------------------------------------------
    // Helpers
    // -------------------------------------------------------------------------

    /// Fail with [`HealthError::UnsupportedPlatform`] before any native call
    /// when the platform lacks `operation`.
    fn ensure_available(&self, operation: Operation) -> Result<()> {
        if operation.is_available_on(self.platform) {
            Ok(())
        } else {
            Err(HealthError::UnsupportedPlatform {
                operation,
                platform: self.platform,
            })
        }
    }

    fn map_native_error(&self, data_type: DataType, err: BridgeError) -> HealthError {
        match err.platform_code() {
            Some(code) if code == self.read_policy.unsupported_error_code => {
                debug!(%data_type, "Native store reported type as unsupported");
                HealthError::Unsupported { data_type }
            }
            _ => HealthError::Bridge(err),
        }
    }
}
