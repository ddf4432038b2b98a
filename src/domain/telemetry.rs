// Telemetry data domain models
use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer};
use std::fmt::Display;

/// Rendered in place of any measurement the server did not send.
pub const PLACEHOLDER: &str = "--";

/// A measurement that may be absent or null in a response.
///
/// Missing values are not errors: every display site renders them through
/// [`Measurement::display`] or [`Measurement::fixed`], which fall back to
/// [`PLACEHOLDER`].
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct Measurement<T>(Option<T>);

impl<T> Default for Measurement<T> {
    fn default() -> Self {
        Self(None)
    }
}

impl<T: Copy> Measurement<T> {
    pub fn get(&self) -> Option<T> {
        self.0
    }
}

impl<T: Display> Measurement<T> {
    pub fn display(&self) -> String {
        match &self.0 {
            Some(v) => v.to_string(),
            None => PLACEHOLDER.to_string(),
        }
    }
}

impl Measurement<f64> {
    /// Fixed-point rendering, e.g. `21.4`.
    pub fn fixed(&self, digits: usize) -> String {
        match self.0 {
            Some(v) => format!("{:.*}", digits, v),
            None => PLACEHOLDER.to_string(),
        }
    }

    /// Fixed-point rendering with a unit suffix, e.g. `21.4 °C`. The unit is
    /// dropped together with the value when the measurement is missing.
    pub fn with_unit(&self, digits: usize, unit: &str) -> String {
        match self.0 {
            Some(v) => format!("{:.*} {}", digits, v, unit),
            None => PLACEHOLDER.to_string(),
        }
    }
}

/// Accepts `true`/`false`, `0`/`1` or null for boolean sensor flags.
fn lenient_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Bool(b) => b,
        serde_json::Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(false),
        _ => false,
    })
}

/// One stored sensor row as returned by the history, table and latest endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Reading {
    pub id: Option<i64>,
    #[serde(alias = "ts")]
    pub timestamp: Option<String>,
    pub temperature: Measurement<f64>,
    pub humidity: Measurement<f64>,
    pub pressure: Measurement<f64>,
    pub gas_resistance: Measurement<f64>,
    #[serde(deserialize_with = "lenient_flag")]
    pub movement_detected: bool,
    pub estimated_occupancy: Measurement<u32>,
    pub ac_recommendation: Measurement<u8>,
}

/// Parses the server's wall-clock timestamps (`2024-01-01 08:00:00`, seconds optional).
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim().replacen('T', " ", 1);
    NaiveDateTime::parse_from_str(&raw, "%Y-%m-%d %H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(&raw, "%Y-%m-%d %H:%M"))
        .ok()
}

/// Chart axis label for a timestamp: local hour and minute.
pub fn time_label(raw: Option<&str>) -> String {
    raw.and_then(parse_timestamp)
        .map(|t| t.format("%H:%M").to_string())
        .unwrap_or_else(|| PLACEHOLDER.to_string())
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SensorSnapshot {
    pub temperature: Measurement<f64>,
    pub humidity: Measurement<f64>,
    pub pressure: Measurement<f64>,
    pub gas_resistance: Measurement<f64>,
    #[serde(deserialize_with = "lenient_flag")]
    pub movement_detected: bool,
    pub movement_count_5min: Measurement<u32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ClimateRecommendation {
    pub note: Option<String>,
}

/// Current occupancy estimate together with the latest sensor block.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CurrentSnapshot {
    pub estimated_occupancy: Measurement<u32>,
    pub occupancy_percent: Measurement<f64>,
    pub ac_recommendation: Measurement<u8>,
    pub sensors: Option<SensorSnapshot>,
    pub climate_recommendation: Option<ClimateRecommendation>,
}

/// Aggregates over the last 24 hours.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AggregateStats {
    pub min_temp: Measurement<f64>,
    pub max_temp: Measurement<f64>,
    pub avg_humidity: Measurement<f64>,
    pub avg_pressure: Measurement<f64>,
}

impl AggregateStats {
    pub fn temperature_range(&self) -> String {
        match (self.min_temp.get(), self.max_temp.get()) {
            (Some(min), Some(max)) => format!("Min {:.1} / Max {:.1} °C", min, max),
            _ => PLACEHOLDER.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Baseline {
    pub calibrated: bool,
    pub temperature: Measurement<f64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EstimatorStatus {
    pub model_type: Option<String>,
    pub training_samples: u32,
    pub min_samples_for_training: u32,
    pub baseline: Option<Baseline>,
}

impl Default for EstimatorStatus {
    fn default() -> Self {
        Self {
            model_type: None,
            training_samples: 0,
            min_samples_for_training: 10,
            baseline: None,
        }
    }
}

impl EstimatorStatus {
    pub fn is_trained(&self) -> bool {
        self.model_type.as_deref() == Some("trained_regression")
    }
}
