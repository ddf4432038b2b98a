// HTTP request handlers
use crate::application::orchestrator::LoadOutcome;
use crate::application::regression_view::RetrainOutcome;
use crate::application::ui_surface::elements;
use crate::domain::connectivity::{Banner, ConnectivityStatus};
use crate::infrastructure::retained_chart::ChartState;
use crate::presentation::app_state::AppState;
use crate::presentation::display_board::BoardSnapshot;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Serialize)]
pub struct DashboardView {
    pub connectivity: Option<ConnectivityStatus>,
    pub banner: Option<Banner>,
    pub elements: BoardSnapshot,
    pub charts: Vec<ChartState>,
}

#[derive(Debug, Serialize)]
pub struct PageMove {
    pub moved: bool,
    pub page: u32,
    pub outcome: Option<LoadOutcome>,
}

#[derive(Debug, Serialize)]
pub struct RetrainReply {
    pub trained: bool,
    pub message: Option<String>,
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Everything currently on screen
pub async fn dashboard(State(state): State<Arc<AppState>>) -> Json<DashboardView> {
    let connectivity = state.session.connectivity();
    Json(DashboardView {
        connectivity: connectivity.status(),
        banner: connectivity.banner(),
        elements: state.board.snapshot(),
        charts: state.charts.snapshots(),
    })
}

pub async fn table_next(State(state): State<Arc<AppState>>) -> Json<PageMove> {
    let outcome = state.pager.next().await;
    Json(PageMove {
        moved: outcome.is_some(),
        page: state.pager.page(),
        outcome,
    })
}

pub async fn table_prev(State(state): State<Arc<AppState>>) -> Json<PageMove> {
    let outcome = state.pager.prev().await;
    Json(PageMove {
        moved: outcome.is_some(),
        page: state.pager.page(),
        outcome,
    })
}

pub async fn occupancy_hours(
    Path(hours): Path<u32>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<LoadOutcome>, StatusCode> {
    if hours == 0 {
        return Err(StatusCode::BAD_REQUEST);
    }
    Ok(Json(state.occupancy_history.select_hours(hours).await))
}

pub async fn retrain(State(state): State<Arc<AppState>>) -> (StatusCode, Json<RetrainReply>) {
    match state.regression.retrain().await {
        RetrainOutcome::Trained => (
            StatusCode::OK,
            Json(RetrainReply {
                trained: true,
                message: state.board.text(elements::REG_MESSAGE),
            }),
        ),
        RetrainOutcome::Rejected(error) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(RetrainReply {
                trained: false,
                message: Some(error),
            }),
        ),
        RetrainOutcome::Unreachable => (
            StatusCode::BAD_GATEWAY,
            Json(RetrainReply {
                trained: false,
                message: None,
            }),
        ),
    }
}
