//! Permission gate
//!
//! Checks and requests health permissions, applying the Android
//! activity-recognition quirk first when the OS version calls for it.

use bridge_traits::{
    BridgeError, DeviceInfo, HealthChannel, Permission, PermissionHandler, Platform,
};
use core_runtime::config::PermissionPolicy;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::error::{HealthError, Result};
use crate::types::DataType;
use crate::wire;

/// Per-type health permission checks with the OS-level pre-check.
///
/// Nothing is cached: every call re-reads the OS version and the coarse
/// permission status.
#[derive(Clone)]
pub struct PermissionGate {
    platform: Platform,
    channel: Arc<dyn HealthChannel>,
    device_info: Option<Arc<dyn DeviceInfo>>,
    permission_handler: Option<Arc<dyn PermissionHandler>>,
    policy: PermissionPolicy,
}

impl PermissionGate {
    pub fn new(
        platform: Platform,
        channel: Arc<dyn HealthChannel>,
        device_info: Option<Arc<dyn DeviceInfo>>,
        permission_handler: Option<Arc<dyn PermissionHandler>>,
        policy: PermissionPolicy,
    ) -> Self {
        Self {
            platform,
            channel,
            device_info,
            permission_handler,
            policy,
        }
    }

    /// Whether the user granted read access to every type.
    ///
    /// When the activity-recognition gate applies and that permission is not
    /// granted, returns `false` without asking the native store.
    pub async fn has_permissions(&self, types: &[DataType]) -> Result<bool> {
        ensure_not_empty(types)?;

        if self.activity_recognition_applies().await? {
            let status = self
                .handler()?
                .status(Permission::ActivityRecognition)
                .await?;
            if !status.is_granted() {
                warn!(?status, "Activity recognition not granted; skipping health permission query");
                return Ok(false);
            }
        }

        let call = wire::permissions_call(wire::HAS_PERMISSIONS, types);
        let payload = self.channel.invoke(call).await?;
        wire::decode_bool(wire::HAS_PERMISSIONS, payload)
    }

    /// Ask for read access to every type.
    ///
    /// The activity-recognition request, when it applies, only precedes the
    /// native request; its outcome does not change the returned value.
    pub async fn request_permissions(&self, types: &[DataType]) -> Result<bool> {
        ensure_not_empty(types)?;

        if self.activity_recognition_applies().await? {
            let status = self
                .handler()?
                .request(Permission::ActivityRecognition)
                .await?;
            debug!(?status, "Activity recognition requested");
        }

        let call = wire::permissions_call(wire::REQUEST_PERMISSIONS, types);
        let payload = self.channel.invoke(call).await?;
        wire::decode_bool(wire::REQUEST_PERMISSIONS, payload)
    }

    /// Revoke previously granted access.
    ///
    /// HealthKit offers no programmatic revoke, so on iOS this succeeds
    /// without calling native code.
    pub async fn revoke_permissions(&self) -> Result<()> {
        if self.platform == Platform::Ios {
            debug!("Revoke is a no-op on iOS");
            return Ok(());
        }

        self.channel
            .invoke(bridge_traits::MethodCall::new(wire::REVOKE_PERMISSIONS))
            .await?;
        Ok(())
    }

    async fn activity_recognition_applies(&self) -> Result<bool> {
        if self.platform != Platform::Android {
            return Ok(false);
        }

        let device_info = self.device_info.as_ref().ok_or_else(|| {
            HealthError::Bridge(BridgeError::NotAvailable(
                "DeviceInfo is required on Android".to_string(),
            ))
        })?;
        let os_version = device_info.os_version().await?;

        Ok(self
            .policy
            .requires_activity_recognition(self.platform, os_version))
    }

    fn handler(&self) -> Result<&Arc<dyn PermissionHandler>> {
        self.permission_handler.as_ref().ok_or_else(|| {
            HealthError::Bridge(BridgeError::NotAvailable(
                "PermissionHandler is required on Android".to_string(),
            ))
        })
    }
}

fn ensure_not_empty(types: &[DataType]) -> Result<()> {
    if types.is_empty() {
        return Err(HealthError::InvalidRequest(
            "at least one data type is required".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_desktop::{DesktopPermissionHandler, SimulatedHealthStore, StaticDeviceInfo};

    fn android_gate(
        store: &SimulatedHealthStore,
        sdk: u32,
        handler: &DesktopPermissionHandler,
    ) -> PermissionGate {
        PermissionGate::new(
            Platform::Android,
            Arc::new(store.clone()),
            Some(Arc::new(StaticDeviceInfo::new(sdk))),
            Some(Arc::new(handler.clone())),
            PermissionPolicy::default(),
        )
    }

    #[tokio::test]
    async fn test_empty_types_rejected() {
        let store = SimulatedHealthStore::new(Platform::Android);
        let gate = android_gate(&store, 30, &DesktopPermissionHandler::granted());

        let err = gate.has_permissions(&[]).await.unwrap_err();
        assert!(matches!(err, HealthError::InvalidRequest(_)));
        assert!(store.calls().await.is_empty());
    }

    #[tokio::test]
    async fn test_request_grants_then_has() {
        let store = SimulatedHealthStore::new(Platform::Android);
        let handler =
            DesktopPermissionHandler::denied().with_request_outcome(bridge_traits::PermissionStatus::Granted);
        let gate = android_gate(&store, 33, &handler);
        let types = [DataType::StepCount, DataType::Distance];

        assert!(!gate.has_permissions(&types).await.unwrap());
        assert!(gate.request_permissions(&types).await.unwrap());
        assert!(gate.has_permissions(&types).await.unwrap());
        assert_eq!(handler.requests(), 1);
    }

    #[tokio::test]
    async fn test_revoke_calls_native_on_android() {
        let store = SimulatedHealthStore::new(Platform::Android);
        let gate = android_gate(&store, 30, &DesktopPermissionHandler::granted());

        gate.revoke_permissions().await.unwrap();

        let calls = store.calls().await;
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].method, "revokePermissions");
    }

    #[tokio::test]
    async fn test_android_without_device_info_fails() {
        let store = SimulatedHealthStore::new(Platform::Android);
        let gate = PermissionGate::new(
            Platform::Android,
            Arc::new(store.clone()),
            None,
            None,
            PermissionPolicy::default(),
        );

        let err = gate
            .has_permissions(&[DataType::Water])
            .await
            .unwrap_err();
        assert!(matches!(err, HealthError::Bridge(BridgeError::NotAvailable(_))));
        assert!(store.calls().await.is_empty());
    }
}
