// Widget cache - Incremental chart registry
//
// A chart is constructed once per id for the whole session; every later render
// swaps labels and series values on the live instance and redraws it without
// animation, so zoom and legend state survive refreshes.
use crate::application::chart_engine::{ChartEngine, ChartInstance};
use crate::domain::chart::{ChartData, SeriesData};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;

/// What to do with a render produced by an older cycle than the last one applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StaleWritePolicy {
    /// Last applied write wins, whichever cycle produced it.
    #[default]
    Accept,
    /// Drop renders whose cycle sequence is below the last applied one.
    Reject,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WidgetError {
    #[error("widget '{id}' was built with {expected} series, got {actual}")]
    SeriesCountMismatch {
        id: String,
        expected: usize,
        actual: usize,
    },

    #[error("widget '{id}' series '{series}' changed between label-indexed values and points")]
    SeriesKindMismatch { id: String, series: String },

    #[error("widget '{id}' series '{series}' has {values} values for {labels} labels")]
    LabelLengthMismatch {
        id: String,
        series: String,
        labels: usize,
        values: usize,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderOutcome {
    Created,
    Updated,
    Stale,
}

struct WidgetHandle {
    instance: Box<dyn ChartInstance>,
    labels: Vec<String>,
    series: Vec<SeriesData>,
    last_sequence: u64,
}

pub struct WidgetCache {
    engine: Arc<dyn ChartEngine>,
    policy: StaleWritePolicy,
    widgets: HashMap<String, WidgetHandle>,
}

impl WidgetCache {
    pub fn new(engine: Arc<dyn ChartEngine>, policy: StaleWritePolicy) -> Self {
        Self {
            engine,
            policy,
            widgets: HashMap::new(),
        }
    }

    /// Create the widget on first sight, otherwise update it in place.
    /// A rejected render leaves the widget exactly as it was.
    pub fn render(&mut self, chart: ChartData, sequence: u64) -> Result<RenderOutcome, WidgetError> {
        check_label_lengths(&chart)?;

        if let Some(handle) = self.widgets.get_mut(&chart.id) {
            if handle.series.len() != chart.datasets.len() {
                return Err(WidgetError::SeriesCountMismatch {
                    id: chart.id,
                    expected: handle.series.len(),
                    actual: chart.datasets.len(),
                });
            }
            let swapped = handle
                .series
                .iter()
                .zip(&chart.datasets)
                .find(|(built, next)| built.is_label_indexed() != next.data.is_label_indexed());
            if let Some((_, next)) = swapped {
                return Err(WidgetError::SeriesKindMismatch {
                    series: next.label.clone(),
                    id: chart.id,
                });
            }
            if self.policy == StaleWritePolicy::Reject && sequence < handle.last_sequence {
                tracing::debug!(
                    "Dropping stale render of {} from cycle {} (last applied {})",
                    chart.id, sequence, handle.last_sequence
                );
                return Ok(RenderOutcome::Stale);
            }

            handle.instance.replace_labels(chart.labels.clone());
            for (index, dataset) in chart.datasets.into_iter().enumerate() {
                handle.instance.replace_series(index, dataset.data.clone());
                handle.series[index] = dataset.data;
            }
            handle.labels = chart.labels;
            handle.instance.redraw();
            handle.last_sequence = sequence;
            return Ok(RenderOutcome::Updated);
        }

        tracing::debug!("Creating chart {} ({} series)", chart.id, chart.datasets.len());
        let instance = self.engine.create(&chart);
        let series = chart.datasets.into_iter().map(|d| d.data).collect();
        self.widgets.insert(
            chart.id,
            WidgetHandle {
                instance,
                labels: chart.labels,
                series,
                last_sequence: sequence,
            },
        );
        Ok(RenderOutcome::Created)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.widgets.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    pub fn labels(&self, id: &str) -> Option<&[String]> {
        self.widgets.get(id).map(|w| w.labels.as_slice())
    }
}

fn check_label_lengths(chart: &ChartData) -> Result<(), WidgetError> {
    for dataset in &chart.datasets {
        if dataset.data.is_label_indexed() && dataset.data.len() != chart.labels.len() {
            return Err(WidgetError::LabelLengthMismatch {
                id: chart.id.clone(),
                series: dataset.label.clone(),
                labels: chart.labels.len(),
                values: dataset.data.len(),
            });
        }
    }
    Ok(())
}
