//! Health data model
//!
//! Data types, normalized samples and aggregates returned to the host.

use bridge_traits::Platform;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

use crate::error::HealthError;

// =============================================================================
// Data Types
// =============================================================================

/// Health data type exposed by the bridge.
///
/// Each variant has exactly one lowercase wire token used on the native
/// channel (`StepCount` is `"step_count"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DataType {
    HeartRate,
    StepCount,
    Height,
    Weight,
    Distance,
    Energy,
    Water,
    Sleep,
    StandTime,
    ExerciseTime,
    MoveMinutes,
}

impl DataType {
    /// Every data type, in declaration order.
    pub const ALL: [DataType; 11] = [
        DataType::HeartRate,
        DataType::StepCount,
        DataType::Height,
        DataType::Weight,
        DataType::Distance,
        DataType::Energy,
        DataType::Water,
        DataType::Sleep,
        DataType::StandTime,
        DataType::ExerciseTime,
        DataType::MoveMinutes,
    ];

    /// Wire token sent to native code.
    pub const fn token(self) -> &'static str {
        match self {
            DataType::HeartRate => "heart_rate",
            DataType::StepCount => "step_count",
            DataType::Height => "height",
            DataType::Weight => "weight",
            DataType::Distance => "distance",
            DataType::Energy => "energy",
            DataType::Water => "water",
            DataType::Sleep => "sleep",
            DataType::StandTime => "stand_time",
            DataType::ExerciseTime => "exercise_time",
            DataType::MoveMinutes => "move_minutes",
        }
    }

    /// Parse a wire token.
    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.token() == token)
    }

    /// Whether samples of this type can be meaningfully summed.
    pub const fn is_addable(self) -> bool {
        matches!(
            self,
            DataType::StepCount | DataType::Distance | DataType::StandTime | DataType::ExerciseTime
        )
    }

    /// Data types accepted by the statistics operations.
    pub fn addable() -> impl Iterator<Item = DataType> {
        Self::ALL.into_iter().filter(|t| t.is_addable())
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for DataType {
    type Err = HealthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_token(s).ok_or_else(|| HealthError::UnknownDataType(s.to_string()))
    }
}

impl Serialize for DataType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.token())
    }
}

impl<'de> Deserialize<'de> for DataType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let token = String::deserialize(deserializer)?;
        token.parse().map_err(serde::de::Error::custom)
    }
}

// =============================================================================
// Operations
// =============================================================================

/// Operations offered by the health client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    HasPermissions,
    RequestPermissions,
    RevokePermissions,
    StartRecordApi,
    ListRecordApi,
    Read,
    ReadLast,
    ReadStatistics,
    ReadHistoryAndroid,
}

impl Operation {
    /// Name of the operation as exposed to hosts.
    pub const fn name(self) -> &'static str {
        match self {
            Operation::HasPermissions => "hasPermissions",
            Operation::RequestPermissions => "requestPermissions",
            Operation::RevokePermissions => "revokePermissions",
            Operation::StartRecordApi => "startRecordAPI",
            Operation::ListRecordApi => "listRecordAPI",
            Operation::Read => "read",
            Operation::ReadLast => "readLast",
            Operation::ReadStatistics => "readStatistics",
            Operation::ReadHistoryAndroid => "readHistoryAndroid",
        }
    }

    /// Whether the platform supports this operation at all.
    ///
    /// The background recording subsystem and aggregate statistics only
    /// exist in the Android fitness store.
    pub const fn is_available_on(self, platform: Platform) -> bool {
        match self {
            Operation::StartRecordApi
            | Operation::ListRecordApi
            | Operation::ReadStatistics
            | Operation::ReadHistoryAndroid => matches!(platform, Platform::Android),
            _ => true,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// Samples
// =============================================================================

/// Value of a single sample.
///
/// Most types carry a number (count, bpm, meters, kcal). Some native stores
/// report richer payloads, such as sleep stages, as a map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FitValue {
    Number(f64),
    Structured(Map<String, Value>),
}

impl FitValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FitValue::Number(n) => Some(*n),
            FitValue::Structured(_) => None,
        }
    }
}

/// One normalized health sample.
///
/// Built only from native payloads; fields are read through accessors.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FitData {
    data_type: DataType,
    value: FitValue,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    date_from: DateTime<Utc>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    date_to: DateTime<Utc>,
    source: String,
    user_entered: bool,
}

impl FitData {
    pub(crate) fn new(
        data_type: DataType,
        value: FitValue,
        date_from: DateTime<Utc>,
        date_to: DateTime<Utc>,
        source: String,
        user_entered: bool,
    ) -> Self {
        Self {
            data_type,
            value,
            date_from,
            date_to,
            source,
            user_entered,
        }
    }

    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    pub fn value(&self) -> &FitValue {
        &self.value
    }

    pub fn date_from(&self) -> DateTime<Utc> {
        self.date_from
    }

    pub fn date_to(&self) -> DateTime<Utc> {
        self.date_to
    }

    /// Name of the app or device that recorded the sample
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Whether the user typed the sample in by hand
    pub fn user_entered(&self) -> bool {
        self.user_entered
    }

    /// Whether the sample is a point in time rather than an interval
    pub fn is_instantaneous(&self) -> bool {
        self.date_from == self.date_to
    }
}

/// Sum of samples of an addable data type over a window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FitDataStatistics {
    data_type: DataType,
    value: f64,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    date_from: DateTime<Utc>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    date_to: DateTime<Utc>,
    sources: Vec<String>,
}

impl FitDataStatistics {
    pub(crate) fn new(
        data_type: DataType,
        value: f64,
        date_from: DateTime<Utc>,
        date_to: DateTime<Utc>,
        sources: Vec<String>,
    ) -> Self {
        Self {
            data_type,
            value,
            date_from,
            date_to,
            sources,
        }
    }

    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn date_from(&self) -> DateTime<Utc> {
        self.date_from
    }

    pub fn date_to(&self) -> DateTime<Utc> {
        self.date_to
    }

    /// Apps or devices that contributed to the sum
    pub fn sources(&self) -> &[String] {
        &self.sources
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_token_round_trip_for_every_type() {
        for data_type in DataType::ALL {
            assert_eq!(DataType::from_token(data_type.token()), Some(data_type));
            assert_eq!(data_type.to_string().parse::<DataType>().unwrap(), data_type);
        }
    }

    #[test]
    fn test_tokens_are_unique_and_lowercase() {
        let tokens: HashSet<&str> = DataType::ALL.iter().map(|t| t.token()).collect();
        assert_eq!(tokens.len(), DataType::ALL.len());

        for token in tokens {
            assert_eq!(token, token.to_lowercase());
        }
    }

    #[test]
    fn test_known_tokens() {
        assert_eq!(DataType::StepCount.token(), "step_count");
        assert_eq!(DataType::HeartRate.token(), "heart_rate");
        assert_eq!(DataType::MoveMinutes.token(), "move_minutes");
    }

    #[test]
    fn test_unknown_token_fails() {
        let err = "steps".parse::<DataType>().unwrap_err();
        assert!(matches!(err, HealthError::UnknownDataType(ref t) if t == "steps"));
        assert_eq!(DataType::from_token("STEP_COUNT"), None);
    }

    #[test]
    fn test_serde_uses_tokens() {
        let json = serde_json::to_string(&DataType::ExerciseTime).unwrap();
        assert_eq!(json, "\"exercise_time\"");

        let parsed: DataType = serde_json::from_str("\"stand_time\"").unwrap();
        assert_eq!(parsed, DataType::StandTime);

        assert!(serde_json::from_str::<DataType>("\"calories\"").is_err());
    }

    #[test]
    fn test_addable_types() {
        let addable: Vec<DataType> = DataType::addable().collect();
        assert_eq!(
            addable,
            vec![
                DataType::StepCount,
                DataType::Distance,
                DataType::StandTime,
                DataType::ExerciseTime
            ]
        );
        assert!(!DataType::HeartRate.is_addable());
        assert!(!DataType::Sleep.is_addable());
    }

    #[test]
    fn test_operation_availability() {
        for op in [
            Operation::StartRecordApi,
            Operation::ListRecordApi,
            Operation::ReadStatistics,
            Operation::ReadHistoryAndroid,
        ] {
            assert!(op.is_available_on(Platform::Android));
            assert!(!op.is_available_on(Platform::Ios));
        }

        for op in [
            Operation::HasPermissions,
            Operation::RequestPermissions,
            Operation::RevokePermissions,
            Operation::Read,
            Operation::ReadLast,
        ] {
            assert!(op.is_available_on(Platform::Ios));
            assert!(op.is_available_on(Platform::Android));
        }
        assert_eq!(Operation::StartRecordApi.to_string(), "startRecordAPI");
    }

    #[test]
    fn test_fit_value_untagged() {
        let number: FitValue = serde_json::from_str("72.5").unwrap();
        assert_eq!(number.as_f64(), Some(72.5));

        let stage: FitValue = serde_json::from_str(r#"{"stage":"deep"}"#).unwrap();
        assert!(matches!(stage, FitValue::Structured(_)));
        assert_eq!(stage.as_f64(), None);
    }
}
