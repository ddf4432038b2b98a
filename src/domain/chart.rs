// Chart domain models
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TimeSeriesPoint {
    pub time_ms: i64,
    pub value: f64,
}

impl TimeSeriesPoint {
    pub fn new(time_ms: i64, value: f64) -> Self {
        Self { time_ms, value }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ChartKind {
    Line,
    Scatter,
}

/// Values of one series. Label-indexed values belong to line charts and must
/// line up with the chart's labels; points carry their own x and belong to
/// scatter charts.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SeriesData {
    Values(Vec<Option<f64>>),
    Points(Vec<TimeSeriesPoint>),
}

impl SeriesData {
    pub fn len(&self) -> usize {
        match self {
            SeriesData::Values(v) => v.len(),
            SeriesData::Points(p) => p.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_label_indexed(&self) -> bool {
        matches!(self, SeriesData::Values(_))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dataset {
    pub label: String,
    pub color: Option<String>,
    pub fill: bool,
    pub data: SeriesData,
}

impl Dataset {
    pub fn new(label: &str, color: &str, fill: bool, data: SeriesData) -> Self {
        Self {
            label: label.to_string(),
            color: Some(color.to_string()),
            fill,
            data,
        }
    }
}

/// Everything needed to construct a chart or refresh an existing one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartData {
    pub id: String,
    pub kind: ChartKind,
    pub axis_title: Option<String>,
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
}

impl ChartData {
    pub fn line(id: &str, axis_title: Option<&str>, labels: Vec<String>, datasets: Vec<Dataset>) -> Self {
        Self {
            id: id.to_string(),
            kind: ChartKind::Line,
            axis_title: axis_title.map(str::to_string),
            labels,
            datasets,
        }
    }

    pub fn scatter(id: &str, axis_title: Option<&str>, datasets: Vec<Dataset>) -> Self {
        Self {
            id: id.to_string(),
            kind: ChartKind::Scatter,
            axis_title: axis_title.map(str::to_string),
            labels: Vec::new(),
            datasets,
        }
    }

    pub fn show_legend(&self) -> bool {
        self.datasets.len() > 1
    }
}
