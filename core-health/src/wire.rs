//! Native wire format
//!
//! Builds method calls for the native channel and decodes its payloads into
//! the normalized model. Timestamps cross the channel as epoch milliseconds.

use bridge_traits::MethodCall;
use chrono::{DateTime, TimeZone, Utc};
use serde::Deserialize;
use serde_json::Value;

use crate::error::{HealthError, Result};
use crate::types::{DataType, FitData, FitDataStatistics, FitValue};

pub(crate) const HAS_PERMISSIONS: &str = "hasPermissions";
pub(crate) const REQUEST_PERMISSIONS: &str = "requestPermissions";
pub(crate) const REVOKE_PERMISSIONS: &str = "revokePermissions";
pub(crate) const READ: &str = "read";
pub(crate) const READ_STATISTICS: &str = "readStatistics";
pub(crate) const START_RECORD_API: &str = "startRecordAPI";
pub(crate) const LIST_RECORD_API: &str = "listRecordAPI";

pub(crate) fn permissions_call(method: &str, types: &[DataType]) -> MethodCall {
    let tokens: Vec<&str> = types.iter().map(|t| t.token()).collect();
    MethodCall::new(method).arg("types", tokens)
}

pub(crate) fn read_call(data_type: DataType, from: i64, to: i64, limit: Option<usize>) -> MethodCall {
    let limit = limit.map(|l| i64::try_from(l).unwrap_or(i64::MAX));
    MethodCall::new(READ)
        .arg("type", data_type.token())
        .arg("date_from", from)
        .arg("date_to", to)
        .arg("limit", limit)
}

pub(crate) fn statistics_call(data_type: DataType, from: i64, to: i64) -> MethodCall {
    MethodCall::new(READ_STATISTICS)
        .arg("type", data_type.token())
        .arg("date_from", from)
        .arg("date_to", to)
}

#[derive(Deserialize)]
struct WireSample {
    value: Value,
    date_from: i64,
    date_to: i64,
    #[serde(default)]
    source: Option<String>,
    #[serde(default)]
    user_entered: Option<bool>,
}

#[derive(Deserialize)]
struct WireStatistics {
    value: f64,
    date_from: i64,
    date_to: i64,
    #[serde(default)]
    sources: Option<Vec<String>>,
}

pub(crate) fn millis_to_datetime(method: &str, millis: i64) -> Result<DateTime<Utc>> {
    Utc.timestamp_millis_opt(millis)
        .single()
        .ok_or_else(|| HealthError::malformed(method, format!("timestamp {} out of range", millis)))
}

fn decode_value(value: Value) -> Result<FitValue> {
    match value {
        Value::Number(n) => n
            .as_f64()
            .map(FitValue::Number)
            .ok_or_else(|| HealthError::malformed(READ, "value is not a finite number")),
        Value::Object(map) => Ok(FitValue::Structured(map)),
        other => Err(HealthError::malformed(
            READ,
            format!("unexpected value {}", other),
        )),
    }
}

/// Decode a `read` response, keeping native order.
///
/// A `null` payload is treated as no samples.
pub(crate) fn decode_samples(data_type: DataType, payload: Value) -> Result<Vec<FitData>> {
    let items: Vec<WireSample> = match payload {
        Value::Null => return Ok(Vec::new()),
        payload => serde_json::from_value(payload)
            .map_err(|e| HealthError::malformed(READ, e.to_string()))?,
    };

    items
        .into_iter()
        .map(|item| {
            Ok(FitData::new(
                data_type,
                decode_value(item.value)?,
                millis_to_datetime(READ, item.date_from)?,
                millis_to_datetime(READ, item.date_to)?,
                item.source.unwrap_or_default(),
                item.user_entered.unwrap_or(false),
            ))
        })
        .collect()
}

pub(crate) fn decode_statistics(data_type: DataType, payload: Value) -> Result<FitDataStatistics> {
    let stats: WireStatistics = serde_json::from_value(payload)
        .map_err(|e| HealthError::malformed(READ_STATISTICS, e.to_string()))?;

    Ok(FitDataStatistics::new(
        data_type,
        stats.value,
        millis_to_datetime(READ_STATISTICS, stats.date_from)?,
        millis_to_datetime(READ_STATISTICS, stats.date_to)?,
        stats.sources.unwrap_or_default(),
    ))
}

pub(crate) fn decode_bool(method: &str, payload: Value) -> Result<bool> {
    payload
        .as_bool()
        .ok_or_else(|| HealthError::malformed(method, format!("expected a bool, got {}", payload)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_read_call_arguments() {
        let call = read_call(DataType::Sleep, 1, 2_000, Some(5));

        assert_eq!(call.method, "read");
        assert_eq!(call.get_str("type"), Some("sleep"));
        assert_eq!(call.get_i64("date_from"), Some(1));
        assert_eq!(call.get_i64("date_to"), Some(2_000));
        assert_eq!(call.get_i64("limit"), Some(5));

        let unbounded = read_call(DataType::Sleep, 1, 2_000, None);
        assert_eq!(unbounded.arguments.get("limit"), Some(&Value::Null));
    }

    #[test]
    fn test_statistics_call_has_no_limit() {
        let call = statistics_call(DataType::Distance, 10, 20);
        assert_eq!(call.method, "readStatistics");
        assert!(!call.arguments.contains_key("limit"));
    }

    #[test]
    fn test_permissions_call_preserves_order() {
        let call = permissions_call(
            HAS_PERMISSIONS,
            &[DataType::Water, DataType::HeartRate, DataType::Water],
        );
        assert_eq!(
            call.arguments["types"],
            json!(["water", "heart_rate", "water"])
        );
    }

    #[test]
    fn test_decode_samples_defaults_and_order() {
        let payload = json!([
            { "value": 80, "date_from": 2_000, "date_to": 2_000, "source": "Watch", "user_entered": true },
            { "value": 75.5, "date_from": 1_000, "date_to": 1_000 },
        ]);

        let samples = decode_samples(DataType::HeartRate, payload).unwrap();

        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].value().as_f64(), Some(80.0));
        assert_eq!(samples[0].source(), "Watch");
        assert!(samples[0].user_entered());
        assert!(samples[0].is_instantaneous());
        assert_eq!(samples[1].source(), "");
        assert!(!samples[1].user_entered());
        assert_eq!(samples[1].date_from().timestamp_millis(), 1_000);
    }

    #[test]
    fn test_decode_structured_value() {
        let payload = json!([{ "value": { "stage": "rem" }, "date_from": 1, "date_to": 60_000 }]);
        let samples = decode_samples(DataType::Sleep, payload).unwrap();

        match samples[0].value() {
            FitValue::Structured(map) => assert_eq!(map["stage"], json!("rem")),
            other => panic!("expected structured value, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_null_payload_is_empty() {
        assert!(decode_samples(DataType::Water, Value::Null).unwrap().is_empty());
    }

    #[test]
    fn test_decode_rejects_malformed_items() {
        let missing_date = json!([{ "value": 1 }]);
        let err = decode_samples(DataType::Water, missing_date).unwrap_err();
        assert!(matches!(err, HealthError::MalformedPayload { ref method, .. } if method == "read"));

        let string_value = json!([{ "value": "lots", "date_from": 1, "date_to": 2 }]);
        assert!(decode_samples(DataType::Water, string_value).is_err());

        let not_a_list = json!({ "value": 1 });
        assert!(decode_samples(DataType::Water, not_a_list).is_err());
    }

    #[test]
    fn test_decode_statistics() {
        let payload = json!({ "value": 4_200.0, "date_from": 1, "date_to": 86_400_000, "sources": ["phone"] });
        let stats = decode_statistics(DataType::StepCount, payload).unwrap();

        assert_eq!(stats.value(), 4_200.0);
        assert_eq!(stats.date_to().timestamp_millis(), 86_400_000);
        assert_eq!(stats.sources().to_vec(), vec!["phone".to_string()]);

        let no_sources = json!({ "value": 0, "date_from": 1, "date_to": 2 });
        let stats = decode_statistics(DataType::Distance, no_sources).unwrap();
        assert!(stats.sources().is_empty());
    }

    #[test]
    fn test_decode_bool() {
        assert!(decode_bool(HAS_PERMISSIONS, Value::Bool(true)).unwrap());
        assert!(decode_bool(HAS_PERMISSIONS, json!("yes")).is_err());
    }
}
