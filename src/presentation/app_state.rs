// Application state for HTTP handlers
use crate::application::loaders::OccupancyHistoryLoader;
use crate::application::pager::PaginationController;
use crate::application::regression_view::RegressionView;
use crate::application::session::Session;
use crate::infrastructure::retained_chart::RetainedChartEngine;
use crate::presentation::display_board::DisplayBoard;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub board: Arc<DisplayBoard>,
    pub charts: Arc<RetainedChartEngine>,
    pub session: Arc<Session>,
    pub pager: Arc<PaginationController>,
    pub regression: Arc<RegressionView>,
    pub occupancy_history: Arc<OccupancyHistoryLoader>,
}
