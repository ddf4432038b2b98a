// Retained-mode chart engine keeping every chart's current state in memory
use crate::application::chart_engine::{ChartEngine, ChartInstance};
use crate::domain::chart::{ChartData, ChartKind, Dataset, SeriesData};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

#[derive(Debug, Clone, Serialize)]
pub struct ChartState {
    pub id: String,
    pub kind: ChartKind,
    pub axis_title: Option<String>,
    pub show_legend: bool,
    /// Hover picks every series at the nearest label, not only the one under the cursor.
    pub interaction: &'static str,
    pub intersect: bool,
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
    pub redraws: u64,
}

#[derive(Clone, Default)]
pub struct RetainedChartEngine {
    charts: Arc<Mutex<BTreeMap<String, Arc<Mutex<ChartState>>>>>,
    constructed: Arc<AtomicUsize>,
}

impl RetainedChartEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of chart instances built so far.
    pub fn constructed(&self) -> usize {
        self.constructed.load(Ordering::SeqCst)
    }

    pub fn snapshot(&self, id: &str) -> Option<ChartState> {
        let charts = self.charts.lock().unwrap_or_else(PoisonError::into_inner);
        charts
            .get(id)
            .map(|c| c.lock().unwrap_or_else(PoisonError::into_inner).clone())
    }

    pub fn snapshots(&self) -> Vec<ChartState> {
        let charts = self.charts.lock().unwrap_or_else(PoisonError::into_inner);
        charts
            .values()
            .map(|c| c.lock().unwrap_or_else(PoisonError::into_inner).clone())
            .collect()
    }
}

impl ChartEngine for RetainedChartEngine {
    fn create(&self, chart: &ChartData) -> Box<dyn ChartInstance> {
        let state = Arc::new(Mutex::new(ChartState {
            id: chart.id.clone(),
            kind: chart.kind,
            axis_title: chart.axis_title.clone(),
            show_legend: chart.show_legend(),
            interaction: "index",
            intersect: false,
            labels: chart.labels.clone(),
            datasets: chart.datasets.clone(),
            redraws: 0,
        }));

        self.constructed.fetch_add(1, Ordering::SeqCst);
        self.charts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(chart.id.clone(), state.clone());

        Box::new(RetainedChart { state })
    }
}

struct RetainedChart {
    state: Arc<Mutex<ChartState>>,
}

impl RetainedChart {
    fn state(&self) -> std::sync::MutexGuard<'_, ChartState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ChartInstance for RetainedChart {
    fn replace_labels(&mut self, labels: Vec<String>) {
        self.state().labels = labels;
    }

    fn replace_series(&mut self, index: usize, data: SeriesData) {
        if let Some(dataset) = self.state().datasets.get_mut(index) {
            dataset.data = data;
        }
    }

    fn redraw(&mut self) {
        self.state().redraws += 1;
    }
}
