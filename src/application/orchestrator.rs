// Refresh orchestrator - Fans every cycle out to independent loaders
use crate::application::endpoint_client::CallResult;
use crate::application::session::Session;
use async_trait::async_trait;
use futures::future::join_all;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::Instant;

pub const REFRESH_INTERVAL: Duration = Duration::from_millis(30_000);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadOutcome {
    /// At least one response was written to the loader's widgets.
    Applied,
    /// The server answered but had nothing to show.
    NoData,
    /// Every call failed in transport; widgets keep their last state.
    Unavailable,
}

impl LoadOutcome {
    pub fn of<T>(result: &CallResult<T>) -> Self {
        match result {
            CallResult::Success(_) => LoadOutcome::Applied,
            CallResult::Rejected { .. } => LoadOutcome::NoData,
            CallResult::Failed => LoadOutcome::Unavailable,
        }
    }

    /// Best of two partial outcomes.
    pub fn merge(self, other: LoadOutcome) -> LoadOutcome {
        use LoadOutcome::*;
        match (self, other) {
            (Applied, _) | (_, Applied) => Applied,
            (NoData, _) | (_, NoData) => NoData,
            _ => Unavailable,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Priority {
    /// Awaited before the dashboard counts as ready.
    Primary,
    Background,
}

/// Identifies the cycle (or user action) a fetch belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleContext {
    pub sequence: u64,
}

#[async_trait]
pub trait Loader: Send + Sync {
    fn name(&self) -> &'static str;

    fn priority(&self) -> Priority {
        Priority::Background
    }

    /// Fetch and apply. Never fails outward: problems end up in the outcome,
    /// the connectivity banner or a widget placeholder.
    async fn load(&self, cycle: CycleContext) -> LoadOutcome;
}

#[derive(Debug, Clone)]
pub struct CycleReport {
    pub sequence: u64,
    pub outcomes: Vec<(&'static str, LoadOutcome)>,
}

impl CycleReport {
    pub fn outcome(&self, loader: &str) -> Option<LoadOutcome> {
        self.outcomes
            .iter()
            .find(|(name, _)| *name == loader)
            .map(|(_, outcome)| *outcome)
    }
}

pub struct RefreshOrchestrator {
    session: Arc<Session>,
    loaders: Vec<Arc<dyn Loader>>,
}

impl RefreshOrchestrator {
    pub fn new(session: Arc<Session>, loaders: Vec<Arc<dyn Loader>>) -> Self {
        Self { session, loaders }
    }

    /// One full fan-out. Loaders apply their own results as they resolve;
    /// the returned report is for logging only.
    pub async fn run_cycle(&self) -> CycleReport {
        let cycle = CycleContext {
            sequence: self.session.next_sequence(),
        };
        self.run_loaders(cycle, None).await
    }

    /// Initial load: primary loaders are awaited, the rest are preloaded in
    /// the background.
    pub async fn start(self: &Arc<Self>) -> CycleReport {
        let cycle = CycleContext {
            sequence: self.session.next_sequence(),
        };
        let started = Instant::now();
        let report = self.run_loaders(cycle, Some(Priority::Primary)).await;
        tracing::info!(
            "Dashboard ready in {}ms ({} primary loaders)",
            started.elapsed().as_millis(),
            report.outcomes.len()
        );

        let this = self.clone();
        tokio::spawn(async move {
            this.run_loaders(cycle, Some(Priority::Background)).await;
        });

        report
    }

    async fn run_loaders(&self, cycle: CycleContext, only: Option<Priority>) -> CycleReport {
        let runs = self
            .loaders
            .iter()
            .filter(|loader| only.is_none_or(|p| loader.priority() == p))
            .map(|loader| async move {
                let outcome = loader.load(cycle).await;
                tracing::debug!("cycle {} loader '{}': {:?}", cycle.sequence, loader.name(), outcome);
                (loader.name(), outcome)
            });

        let outcomes = join_all(runs).await;

        let unavailable = outcomes
            .iter()
            .filter(|(_, o)| *o == LoadOutcome::Unavailable)
            .count();
        if unavailable > 0 {
            tracing::warn!(
                "cycle {}: {} of {} loaders unavailable",
                cycle.sequence,
                unavailable,
                outcomes.len()
            );
        }

        CycleReport {
            sequence: cycle.sequence,
            outcomes,
        }
    }
}

/// Recurring refresh. Every tick spawns a full cycle without waiting for the
/// previous one, so slow cycles overlap instead of being skipped.
pub struct PollingTask {
    stop: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl PollingTask {
    /// The first cycle fires one period after start; the initial load is
    /// [`RefreshOrchestrator::start`]'s job.
    pub fn start(orchestrator: Arc<RefreshOrchestrator>, period: Duration) -> Self {
        let (stop, mut stopped) = watch::channel(false);

        let handle = tokio::spawn(async move {
            tracing::info!("Polling every {}s", period.as_secs());
            let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let orchestrator = orchestrator.clone();
                        tokio::spawn(async move {
                            orchestrator.run_cycle().await;
                        });
                    }
                    _ = stopped.changed() => break,
                }
            }
            tracing::info!("Polling stopped");
        });

        Self { stop, handle }
    }

    /// Stops scheduling new cycles. Cycles already running finish on their own.
    pub async fn stop(self) {
        let _ = self.stop.send(true);
        let _ = self.handle.await;
    }
}
