use bridge_desktop::{SimulatedHealthStore, SimulatedSample};
use bridge_traits::{FixedClock, Platform};
use core_service::{DataType, HealthConfig, HealthError, HealthService, ServiceError};
use std::sync::Arc;

#[test]
fn test_bootstrap_requires_platform() {
    let err = HealthService::bootstrap(HealthConfig::builder())
        .err()
        .expect("bootstrap without platform should fail");

    assert!(matches!(
        err,
        ServiceError::Runtime(core_runtime::Error::Config(_))
    ));
    assert!(!err.is_capability_missing());
}

#[test]
fn test_bootstrap_rejects_empty_unsupported_code() {
    let store = SimulatedHealthStore::new(Platform::Ios);
    let result = HealthService::bootstrap(
        HealthConfig::builder()
            .platform(Platform::Ios)
            .channel(Arc::new(store))
            .unsupported_error_code("  "),
    );

    assert!(matches!(
        result,
        Err(ServiceError::Runtime(core_runtime::Error::Config(_)))
    ));
}

#[cfg(not(feature = "desktop-shims"))]
#[test]
fn test_android_without_bridges_reports_capability() {
    let store = SimulatedHealthStore::new(Platform::Android);
    let err = HealthService::bootstrap(
        HealthConfig::builder()
            .platform(Platform::Android)
            .channel(Arc::new(store)),
    )
    .err()
    .expect("android bootstrap without device info should fail");

    assert!(err.is_capability_missing());
}

#[cfg(feature = "desktop-shims")]
#[tokio::test]
async fn test_bootstrap_desktop_fills_bridges() {
    let service = core_service::bootstrap_desktop(Platform::Android).unwrap();
    let config = service.config();

    assert_eq!(service.platform(), Platform::Android);
    assert!(config.device_info.is_some());
    assert!(config.permission_handler.is_some());

    let client = service.client();
    assert!(client.request_permissions(&[DataType::StepCount]).await.unwrap());
    assert!(client.has_permissions(&[DataType::StepCount]).await.unwrap());
    assert!(client
        .read(DataType::StepCount, None, None, Some(10))
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_service_reads_through_injected_store() {
    let store = SimulatedHealthStore::new(Platform::Ios);
    store
        .insert_sample(SimulatedSample::new("weight", 71.5, 5_000, 5_000))
        .await;

    let service = HealthService::bootstrap(
        HealthConfig::builder()
            .platform(Platform::Ios)
            .channel(Arc::new(store.clone()))
            .clock(Arc::new(FixedClock::from_millis(10_000))),
    )
    .unwrap();

    let last = service
        .client()
        .read_last(DataType::Weight)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(last.value().as_f64(), Some(71.5));

    let calls = store.calls().await;
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].get_i64("date_to"), Some(10_000));
}

#[tokio::test]
async fn test_health_errors_convert() {
    let service = HealthService::bootstrap(
        HealthConfig::builder()
            .platform(Platform::Ios)
            .channel(Arc::new(SimulatedHealthStore::new(Platform::Ios))),
    )
    .unwrap();

    let err: ServiceError = service
        .client()
        .start_record_api()
        .await
        .unwrap_err()
        .into();

    assert!(matches!(
        err,
        ServiceError::Health(HealthError::UnsupportedPlatform { .. })
    ));
}
