//! Simulated Health Store
//!
//! In-memory stand-in for HealthKit / Google Fit. It speaks the same wire
//! format as the mobile method channels, so the core can be exercised on a
//! desktop host or in tests without a device.

use async_trait::async_trait;
use bridge_traits::{
    channel::{HealthChannel, MethodCall},
    device::Platform,
    error::{BridgeError, Result},
};
use serde_json::{json, Value};
use std::collections::{BTreeSet, HashSet, VecDeque};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

/// Error code the simulator uses for data types its platform lacks.
pub const UNSUPPORTED_CODE: &str = "unsupported";

/// Most recent calls kept for inspection; older ones are dropped.
pub const MAX_RECORDED_CALLS: usize = 256;

/// One stored sample, keyed by wire token.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulatedSample {
    pub data_type: String,
    pub value: Value,
    pub date_from: i64,
    pub date_to: i64,
    pub source: String,
    pub user_entered: bool,
}

impl SimulatedSample {
    /// A numeric sample recorded by the simulator itself.
    pub fn new(data_type: impl Into<String>, value: f64, date_from: i64, date_to: i64) -> Self {
        Self {
            data_type: data_type.into(),
            value: json!(value),
            date_from,
            date_to,
            source: "bridge-desktop".to_string(),
            user_entered: false,
        }
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    pub fn user_entered(mut self) -> Self {
        self.user_entered = true;
        self
    }

    fn to_wire(&self) -> Value {
        json!({
            "value": self.value,
            "date_from": self.date_from,
            "date_to": self.date_to,
            "source": self.source,
            "user_entered": self.user_entered,
        })
    }
}

#[derive(Default)]
struct StoreState {
    samples: Vec<SimulatedSample>,
    unsupported: HashSet<String>,
    granted: HashSet<String>,
    recording: bool,
    queued_failures: VecDeque<BridgeError>,
    calls: VecDeque<MethodCall>,
}

/// In-memory health store implementing [`HealthChannel`].
///
/// Behaves like the native side of the method channel:
/// - `read` returns samples inside the range, most recent first, capped by `limit`
/// - `readStatistics` sums numeric values (Android only)
/// - `startRecordAPI` / `listRecordAPI` track a recording flag (Android only)
/// - data types the platform lacks fail with code [`UNSUPPORTED_CODE`]
///
/// The last [`MAX_RECORDED_CALLS`] calls are recorded and can be inspected
/// with [`calls`](Self::calls).
#[derive(Clone)]
pub struct SimulatedHealthStore {
    platform: Platform,
    state: Arc<Mutex<StoreState>>,
}

impl SimulatedHealthStore {
    /// Create an empty store with the platform's default unsupported types.
    ///
    /// iOS has no move minutes; Google Fit has no stand or exercise time.
    pub fn new(platform: Platform) -> Self {
        let unsupported: &[&str] = match platform {
            Platform::Ios => &["move_minutes"],
            Platform::Android => &["stand_time", "exercise_time"],
        };

        let state = StoreState {
            unsupported: unsupported.iter().map(|t| t.to_string()).collect(),
            ..Default::default()
        };

        Self {
            platform,
            state: Arc::new(Mutex::new(state)),
        }
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub async fn insert_sample(&self, sample: SimulatedSample) {
        self.state.lock().await.samples.push(sample);
    }

    pub async fn insert_samples(&self, samples: impl IntoIterator<Item = SimulatedSample>) {
        self.state.lock().await.samples.extend(samples);
    }

    /// Treat a wire token as unsupported from now on.
    pub async fn mark_unsupported(&self, token: impl Into<String>) {
        self.state.lock().await.unsupported.insert(token.into());
    }

    /// Treat a wire token as supported from now on.
    pub async fn mark_supported(&self, token: &str) {
        self.state.lock().await.unsupported.remove(token);
    }

    /// Fail the next call with a native error carrying `code`.
    pub async fn fail_next(&self, code: impl Into<String>, message: impl Into<String>) {
        self.state
            .lock()
            .await
            .queued_failures
            .push_back(BridgeError::platform(code, message));
    }

    /// Recorded calls, oldest first.
    pub async fn calls(&self) -> Vec<MethodCall> {
        self.state.lock().await.calls.iter().cloned().collect()
    }

    /// Forget every recorded call.
    pub async fn clear_calls(&self) {
        self.state.lock().await.calls.clear();
    }

    pub async fn is_recording(&self) -> bool {
        self.state.lock().await.recording
    }

    fn dispatch(&self, state: &mut StoreState, call: &MethodCall) -> Result<Value> {
        match call.method.as_str() {
            "hasPermissions" => {
                let types = types_arg(call)?;
                reject_unsupported(state, &types)?;
                Ok(Value::Bool(types.iter().all(|t| state.granted.contains(t))))
            }
            "requestPermissions" => {
                let types = types_arg(call)?;
                reject_unsupported(state, &types)?;
                state.granted.extend(types);
                Ok(Value::Bool(true))
            }
            "revokePermissions" => {
                state.granted.clear();
                Ok(Value::Null)
            }
            "read" => {
                let token = type_arg(call)?;
                reject_unsupported(state, std::slice::from_ref(&token))?;
                let (from, to) = range_args(call)?;
                let limit = match call.arguments.get("limit") {
                    None | Some(Value::Null) => None,
                    Some(value) => Some(value.as_u64().ok_or_else(|| {
                        bad_args(&call.method, "limit must be a non-negative integer")
                    })? as usize),
                };

                let mut matching: Vec<&SimulatedSample> = state
                    .samples
                    .iter()
                    .filter(|s| s.data_type == token && s.date_from >= from && s.date_to <= to)
                    .collect();
                matching.sort_by(|a, b| b.date_to.cmp(&a.date_to));

                let items = matching
                    .into_iter()
                    .take(limit.unwrap_or(usize::MAX))
                    .map(SimulatedSample::to_wire)
                    .collect();
                Ok(Value::Array(items))
            }
            "readStatistics" if self.platform == Platform::Android => {
                let token = type_arg(call)?;
                reject_unsupported(state, std::slice::from_ref(&token))?;
                let (from, to) = range_args(call)?;

                let mut total = 0.0;
                let mut sources = BTreeSet::new();
                for sample in state
                    .samples
                    .iter()
                    .filter(|s| s.data_type == token && s.date_from >= from && s.date_to <= to)
                {
                    total += sample.value.as_f64().unwrap_or(0.0);
                    sources.insert(sample.source.clone());
                }

                Ok(json!({
                    "value": total,
                    "date_from": from,
                    "date_to": to,
                    "sources": sources.into_iter().collect::<Vec<_>>(),
                }))
            }
            "startRecordAPI" if self.platform == Platform::Android => {
                state.recording = true;
                Ok(Value::Bool(true))
            }
            "listRecordAPI" if self.platform == Platform::Android => {
                Ok(Value::Bool(state.recording))
            }
            other => Err(BridgeError::Platform {
                code: "not_implemented".to_string(),
                message: Some(format!("{} is not implemented on {}", other, self.platform)),
                details: None,
            }),
        }
    }
}

#[async_trait]
impl HealthChannel for SimulatedHealthStore {
    async fn invoke(&self, call: MethodCall) -> Result<Value> {
        let mut state = self.state.lock().await;
        if state.calls.len() == MAX_RECORDED_CALLS {
            state.calls.pop_front();
        }
        state.calls.push_back(call.clone());

        if let Some(failure) = state.queued_failures.pop_front() {
            debug!(method = %call.method, "Simulated failure");
            return Err(failure);
        }

        let result = self.dispatch(&mut state, &call);
        debug!(method = %call.method, ok = result.is_ok(), "Simulated call handled");
        result
    }
}

fn bad_args(method: &str, reason: &str) -> BridgeError {
    BridgeError::Platform {
        code: "bad_args".to_string(),
        message: Some(format!("{}: {}", method, reason)),
        details: None,
    }
}

fn type_arg(call: &MethodCall) -> Result<String> {
    call.get_str("type")
        .map(str::to_string)
        .ok_or_else(|| bad_args(&call.method, "missing type"))
}

fn types_arg(call: &MethodCall) -> Result<Vec<String>> {
    call.arguments
        .get("types")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .ok_or_else(|| bad_args(&call.method, "missing types"))
}

fn range_args(call: &MethodCall) -> Result<(i64, i64)> {
    let from = call
        .get_i64("date_from")
        .ok_or_else(|| bad_args(&call.method, "missing date_from"))?;
    let to = call
        .get_i64("date_to")
        .ok_or_else(|| bad_args(&call.method, "missing date_to"))?;
    Ok((from, to))
}

fn reject_unsupported(state: &StoreState, tokens: &[String]) -> Result<()> {
    match tokens.iter().find(|t| state.unsupported.contains(*t)) {
        Some(token) => Err(BridgeError::Platform {
            code: UNSUPPORTED_CODE.to_string(),
            message: Some(format!("{} is not available in this health store", token)),
            details: Some(json!({ "type": token })),
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read_call(token: &str, limit: Option<i64>) -> MethodCall {
        MethodCall::new("read")
            .arg("type", token)
            .arg("date_from", 1_i64)
            .arg("date_to", 10_000_i64)
            .arg("limit", limit)
    }

    #[tokio::test]
    async fn test_read_returns_most_recent_first() {
        let store = SimulatedHealthStore::new(Platform::Android);
        store
            .insert_samples(vec![
                SimulatedSample::new("step_count", 10.0, 100, 200),
                SimulatedSample::new("step_count", 30.0, 500, 600),
                SimulatedSample::new("step_count", 20.0, 300, 400),
                SimulatedSample::new("heart_rate", 70.0, 300, 300),
            ])
            .await;

        let value = store.invoke(read_call("step_count", None)).await.unwrap();
        let items = value.as_array().unwrap();

        assert_eq!(items.len(), 3);
        assert_eq!(items[0]["value"], json!(30.0));
        assert_eq!(items[2]["date_to"], json!(200));
    }

    #[tokio::test]
    async fn test_read_applies_limit_and_range() {
        let store = SimulatedHealthStore::new(Platform::Ios);
        store
            .insert_samples(
                (0..5).map(|i| SimulatedSample::new("water", 0.25, i * 1_000, i * 1_000 + 10)),
            )
            .await;

        let limited = store.invoke(read_call("water", Some(2))).await.unwrap();
        assert_eq!(limited.as_array().unwrap().len(), 2);

        let narrow = MethodCall::new("read")
            .arg("type", "water")
            .arg("date_from", 1_000_i64)
            .arg("date_to", 2_010_i64)
            .arg("limit", None::<i64>);
        let ranged = store.invoke(narrow).await.unwrap();
        assert_eq!(ranged.as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_platform_unsupported_types() {
        let ios = SimulatedHealthStore::new(Platform::Ios);
        let err = ios.invoke(read_call("move_minutes", None)).await.unwrap_err();
        assert_eq!(err.platform_code(), Some(UNSUPPORTED_CODE));

        let android = SimulatedHealthStore::new(Platform::Android);
        let err = android
            .invoke(read_call("stand_time", None))
            .await
            .unwrap_err();
        assert_eq!(err.platform_code(), Some(UNSUPPORTED_CODE));

        android.mark_supported("stand_time").await;
        assert!(android.invoke(read_call("stand_time", None)).await.is_ok());
    }

    #[tokio::test]
    async fn test_statistics_sum_and_sources() {
        let store = SimulatedHealthStore::new(Platform::Android);
        store
            .insert_samples(vec![
                SimulatedSample::new("distance", 1_200.0, 10, 20).with_source("watch"),
                SimulatedSample::new("distance", 800.0, 30, 40).with_source("phone"),
                SimulatedSample::new("distance", 500.0, 50, 60).with_source("watch"),
            ])
            .await;

        let call = MethodCall::new("readStatistics")
            .arg("type", "distance")
            .arg("date_from", 1_i64)
            .arg("date_to", 100_i64);
        let value = store.invoke(call).await.unwrap();

        assert_eq!(value["value"], json!(2_500.0));
        assert_eq!(value["sources"], json!(["phone", "watch"]));
    }

    #[tokio::test]
    async fn test_android_only_methods_on_ios() {
        let store = SimulatedHealthStore::new(Platform::Ios);
        let err = store
            .invoke(MethodCall::new("startRecordAPI"))
            .await
            .unwrap_err();
        assert_eq!(err.platform_code(), Some("not_implemented"));
    }

    #[tokio::test]
    async fn test_record_api_flag() {
        let store = SimulatedHealthStore::new(Platform::Android);
        let listed = store.invoke(MethodCall::new("listRecordAPI")).await.unwrap();
        assert_eq!(listed, Value::Bool(false));

        store.invoke(MethodCall::new("startRecordAPI")).await.unwrap();
        assert!(store.is_recording().await);
    }

    #[tokio::test]
    async fn test_permissions_round_trip() {
        let store = SimulatedHealthStore::new(Platform::Android);
        let types = vec!["step_count", "distance"];

        let has = MethodCall::new("hasPermissions").arg("types", types.clone());
        assert_eq!(store.invoke(has.clone()).await.unwrap(), Value::Bool(false));

        let request = MethodCall::new("requestPermissions").arg("types", types);
        assert_eq!(store.invoke(request).await.unwrap(), Value::Bool(true));
        assert_eq!(store.invoke(has.clone()).await.unwrap(), Value::Bool(true));

        store
            .invoke(MethodCall::new("revokePermissions"))
            .await
            .unwrap();
        assert_eq!(store.invoke(has).await.unwrap(), Value::Bool(false));
    }

    #[tokio::test]
    async fn test_fail_next_and_call_log() {
        let store = SimulatedHealthStore::new(Platform::Android);
        store.fail_next("timeout", "native store did not answer").await;

        let err = store.invoke(read_call("sleep", None)).await.unwrap_err();
        assert_eq!(err.platform_code(), Some("timeout"));
        assert!(store.invoke(read_call("sleep", None)).await.is_ok());

        let calls = store.calls().await;
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].get_str("type"), Some("sleep"));
    }

    #[tokio::test]
    async fn test_call_log_is_bounded() {
        let store = SimulatedHealthStore::new(Platform::Ios);
        for i in 0..MAX_RECORDED_CALLS + 10 {
            store
                .invoke(MethodCall::new("listRecordAPI").arg("seq", i as i64))
                .await
                .unwrap_err();
        }

        let calls = store.calls().await;
        assert_eq!(calls.len(), MAX_RECORDED_CALLS);
        assert_eq!(calls[0].get_i64("seq"), Some(10));
        assert_eq!(
            calls[MAX_RECORDED_CALLS - 1].get_i64("seq"),
            Some((MAX_RECORDED_CALLS + 9) as i64)
        );

        store.clear_calls().await;
        assert!(store.calls().await.is_empty());
    }
}
