// Regression view - Model summary, scatter overlay and the retrain action
use crate::application::endpoint_client::{ApiClient, CallResult, Endpoint};
use crate::application::orchestrator::{CycleContext, LoadOutcome, Loader};
use crate::application::session::Session;
use crate::application::ui_surface::elements;
use crate::domain::chart::{ChartData, Dataset, SeriesData, TimeSeriesPoint};
use crate::domain::regression::{coefficient, RegressionSummary, ScatterSample};
use crate::domain::telemetry::PLACEHOLDER;
use async_trait::async_trait;
use std::sync::Arc;

pub const CHART_REGRESSION: &str = "chartRegression";

const CONNECTION_FAILED: &str = "Connection to server failed";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetrainOutcome {
    Trained,
    /// The service refused to train; carries its message.
    Rejected(String),
    Unreachable,
}

pub struct RegressionView {
    client: ApiClient,
    session: Arc<Session>,
    scatter_hours: u32,
    train_hours: u32,
}

impl RegressionView {
    pub fn new(client: ApiClient, session: Arc<Session>, scatter_hours: u32, train_hours: u32) -> Self {
        Self {
            client,
            session,
            scatter_hours,
            train_hours,
        }
    }

    /// Fetch summary and scatter together and render both.
    pub async fn refresh(&self, sequence: u64) -> LoadOutcome {
        let (summary, scatter) = futures::join!(
            self.client.call::<RegressionSummary>(Endpoint::RegressionStatus, Vec::new()),
            self.client.call::<ScatterSample>(
                Endpoint::RegressionScatter,
                vec![("hours", self.scatter_hours.to_string())],
            ),
        );
        let outcome = LoadOutcome::of(&summary).merge(LoadOutcome::of(&scatter));

        match summary {
            CallResult::Success(payload) => self.show_summary(&payload.data),
            CallResult::Rejected { .. } => self.show_summary(&RegressionSummary::default()),
            CallResult::Failed => {}
        }

        let status = elements::chart_status(CHART_REGRESSION);
        match scatter {
            CallResult::Success(payload) => {
                let sample = payload.data;
                let text = if sample.points.is_empty() { "No data" } else { "" };
                self.session.ui().set_text(&status, text);
                self.session.render(scatter_chart(sample), sequence);
            }
            CallResult::Rejected { .. } => self.session.ui().set_text(&status, "No data"),
            CallResult::Failed => {}
        }
        outcome
    }

    /// Ask the service to retrain. Only a successful training triggers a refresh.
    pub async fn retrain(&self) -> RetrainOutcome {
        let ui = self.session.ui();
        ui.set_enabled(elements::BTN_RETRAIN, false);
        ui.set_text(elements::REG_MESSAGE, "Training...");

        let result = self
            .client
            .call::<serde_json::Value>(
                Endpoint::RegressionTrain,
                vec![("hours", self.train_hours.to_string())],
            )
            .await;

        let outcome = match result {
            CallResult::Success(payload) => {
                let message = payload.message.unwrap_or_else(|| "Model trained".to_string());
                self.session.ui().set_text(elements::REG_MESSAGE, &message);
                tracing::info!("Regression retrained: {}", message);
                self.refresh(self.session.next_sequence()).await;
                RetrainOutcome::Trained
            }
            CallResult::Rejected { error } => {
                self.session.ui().set_text(elements::REG_MESSAGE, &error);
                RetrainOutcome::Rejected(error)
            }
            CallResult::Failed => {
                self.session.ui().set_text(elements::REG_MESSAGE, CONNECTION_FAILED);
                RetrainOutcome::Unreachable
            }
        };

        self.session.ui().set_enabled(elements::BTN_RETRAIN, true);
        outcome
    }

    fn show_summary(&self, s: &RegressionSummary) {
        let ui = self.session.ui();
        ui.set_text(elements::REG_TRAINED, if s.trained { "Yes" } else { "No" });
        ui.set_text(elements::REG_SLOPE, &coefficient(s.slope));
        ui.set_text(elements::REG_INTERCEPT, &coefficient(s.intercept));
        ui.set_text(elements::REG_R_SQUARED, &coefficient(s.r_squared));
        ui.set_text(elements::REG_SAMPLES, &s.n_samples.to_string());
        ui.set_text(
            elements::REG_TRAINED_AT,
            s.trained_at.as_deref().unwrap_or(PLACEHOLDER),
        );
        ui.set_text(
            elements::REG_LAST_ERROR,
            s.last_error.as_deref().unwrap_or(PLACEHOLDER),
        );
    }
}

fn scatter_chart(sample: ScatterSample) -> ChartData {
    let points: Vec<TimeSeriesPoint> = sample.points.into_iter().map(Into::into).collect();
    let line: Vec<TimeSeriesPoint> = sample
        .regression_line
        .map(|l| l.points.into_iter().map(Into::into).collect())
        .unwrap_or_default();

    ChartData::scatter(
        CHART_REGRESSION,
        Some("°C"),
        vec![
            Dataset::new("Measurements", "#3b82f6", false, SeriesData::Points(points)),
            Dataset::new("Regression", "#c41e3a", false, SeriesData::Points(line)),
        ],
    )
}

#[async_trait]
impl Loader for RegressionView {
    fn name(&self) -> &'static str {
        "regression summary"
    }

    async fn load(&self, cycle: CycleContext) -> LoadOutcome {
        self.refresh(cycle.sequence).await
    }
}
