// Main entry point - Dependency injection and server setup
mod domain;
mod application;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc};
use anyhow::Context;
use axum::{routing::{get, post}, Router};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use crate::application::endpoint_client::ApiClient;
use crate::application::loaders::{
    HistoryLoader, OccupancyHistoryLoader, OccupancyLoader, SensorLoader, SnapshotLoader,
};
use crate::application::orchestrator::{Loader, PollingTask, RefreshOrchestrator, REFRESH_INTERVAL};
use crate::application::pager::PaginationController;
use crate::application::regression_view::RegressionView;
use crate::application::session::Session;
use crate::infrastructure::config::load_dashboard_config;
use crate::infrastructure::http_transport::HttpTransport;
use crate::infrastructure::retained_chart::RetainedChartEngine;
use crate::presentation::app_state::AppState;
use crate::presentation::display_board::DisplayBoard;
use crate::presentation::handlers::{
    dashboard, health_check, occupancy_hours, retrain, table_next, table_prev,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("occupancy_dashboard=info")),
        )
        .init();

    // Load configuration
    let config = load_dashboard_config().context("Failed to load dashboard configuration")?;
    let settings = &config.dashboard;

    // Session state: chart engine, element board, connectivity
    let charts = Arc::new(RetainedChartEngine::new());
    let board = Arc::new(DisplayBoard::new());
    let session = Arc::new(Session::new(charts.clone(), board.clone(), settings.stale_writes));

    // API client (infrastructure transport behind the application seam)
    let transport = Arc::new(HttpTransport::new(&config.api.base_url));
    let client = ApiClient::new(transport, session.connectivity().clone());

    // Loaders
    let pager = Arc::new(PaginationController::new(client.clone(), session.clone(), settings.per_page));
    let regression = Arc::new(RegressionView::new(
        client.clone(),
        session.clone(),
        settings.scatter_hours,
        settings.train_hours,
    ));
    let occupancy_history = Arc::new(OccupancyHistoryLoader::new(
        client.clone(),
        session.clone(),
        settings.occupancy_hours,
    ));
    let loaders: Vec<Arc<dyn Loader>> = vec![
        Arc::new(SnapshotLoader::new(client.clone(), session.clone())),
        Arc::new(HistoryLoader::new(
            client.clone(),
            session.clone(),
            settings.history_hours,
            settings.history_limit,
        )),
        pager.clone(),
        Arc::new(OccupancyLoader::new(client.clone(), session.clone())),
        occupancy_history.clone(),
        Arc::new(SensorLoader::new(client, session.clone())),
        regression.clone(),
    ];

    let orchestrator = Arc::new(RefreshOrchestrator::new(session.clone(), loaders));
    orchestrator.start().await;
    let polling = PollingTask::start(orchestrator, REFRESH_INTERVAL);

    // Create application state
    let state = Arc::new(AppState {
        board,
        charts,
        session,
        pager,
        regression,
        occupancy_history,
    });

    // Build router (presentation layer)
    let router = Router::new()
        .route("/healthz", get(health_check))
        .route("/dashboard", get(dashboard))
        .route("/table/next", post(table_next))
        .route("/table/prev", post(table_prev))
        .route("/occupancy/hours/:hours", post(occupancy_hours))
        .route("/regression/retrain", post(retrain))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr: SocketAddr = config
        .server
        .listen
        .parse()
        .with_context(|| format!("Invalid listen address '{}'", config.server.listen))?;
    tracing::info!("Starting occupancy-dashboard on {} (API {})", addr, config.api.base_url);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;

    polling.stop().await;
    Ok(())
}
