// Dashboard session - Owns the widget registry and connectivity state
//
// Created at start-up, dropped at shutdown. Loaders get it injected; nothing
// reaches the widgets or the connectivity state from anywhere else.
use crate::application::chart_engine::ChartEngine;
use crate::application::connectivity_monitor::ConnectivityMonitor;
use crate::application::ui_surface::UiSurface;
use crate::application::widget_cache::{RenderOutcome, StaleWritePolicy, WidgetCache};
use crate::domain::chart::ChartData;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

pub struct Session {
    widgets: Mutex<WidgetCache>,
    ui: Arc<dyn UiSurface>,
    connectivity: Arc<ConnectivityMonitor>,
    sequence: AtomicU64,
}

impl Session {
    pub fn new(engine: Arc<dyn ChartEngine>, ui: Arc<dyn UiSurface>, policy: StaleWritePolicy) -> Self {
        let connectivity = Arc::new(ConnectivityMonitor::new(ui.clone()));
        Self {
            widgets: Mutex::new(WidgetCache::new(engine, policy)),
            ui,
            connectivity,
            sequence: AtomicU64::new(0),
        }
    }

    /// Sequence number for the next cycle or user-triggered fetch.
    pub fn next_sequence(&self) -> u64 {
        self.sequence.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn ui(&self) -> &dyn UiSurface {
        self.ui.as_ref()
    }

    pub fn connectivity(&self) -> &Arc<ConnectivityMonitor> {
        &self.connectivity
    }

    /// Push one chart's data into the cache. Rejected renders are logged and
    /// leave the widget as it was.
    pub fn render(&self, chart: ChartData, sequence: u64) -> Option<RenderOutcome> {
        let id = chart.id.clone();
        match self.widgets().render(chart, sequence) {
            Ok(outcome) => Some(outcome),
            Err(e) => {
                tracing::warn!("Chart {} not rendered: {}", id, e);
                None
            }
        }
    }

    pub fn widgets(&self) -> MutexGuard<'_, WidgetCache> {
        self.widgets.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
