// Regression model domain models
//
// The client only displays what the model service reports; it never fits anything.
use super::chart::TimeSeriesPoint;
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RegressionSummary {
    pub trained: bool,
    pub slope: Option<f64>,
    pub intercept: Option<f64>,
    pub r_squared: Option<f64>,
    pub n_samples: u32,
    pub trained_at: Option<String>,
    pub last_error: Option<String>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ScatterPoint {
    pub x: i64,
    pub y: f64,
}

impl From<ScatterPoint> for TimeSeriesPoint {
    fn from(p: ScatterPoint) -> Self {
        TimeSeriesPoint::new(p.x, p.y)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RegressionLine {
    pub points: Vec<ScatterPoint>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ScatterSample {
    pub points: Vec<ScatterPoint>,
    pub regression_line: Option<RegressionLine>,
}

/// Renders an optional model coefficient exactly as reported.
pub fn coefficient(value: Option<f64>) -> String {
    value
        .map(|v| v.to_string())
        .unwrap_or_else(|| super::telemetry::PLACEHOLDER.to_string())
}
