// Charting engine trait
use crate::domain::chart::{ChartData, SeriesData};

/// A live chart owned by the engine. Construction is the expensive part;
/// everything here mutates the existing instance.
pub trait ChartInstance: Send {
    fn replace_labels(&mut self, labels: Vec<String>);
    fn replace_series(&mut self, index: usize, data: SeriesData);
    /// Redraw without entry/exit animation.
    fn redraw(&mut self);
}

pub trait ChartEngine: Send + Sync {
    /// Build a chart from its first data set: series styling, axis title,
    /// index interaction and a legend when there is more than one series.
    fn create(&self, chart: &ChartData) -> Box<dyn ChartInstance>;
}
