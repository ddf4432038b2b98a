// Dashboard loaders - One unit of the refresh cycle each
use crate::application::endpoint_client::{ApiClient, CallResult, Endpoint};
use crate::application::orchestrator::{CycleContext, LoadOutcome, Loader, Priority};
use crate::application::session::Session;
use crate::application::ui_surface::{elements, UiSurface};
use crate::domain::chart::{ChartData, Dataset, SeriesData};
use crate::domain::telemetry::{
    time_label, AggregateStats, CurrentSnapshot, EstimatorStatus, Reading, SensorSnapshot,
    PLACEHOLDER,
};
use async_trait::async_trait;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

pub const CHART_OCCUPANCY: &str = "chartOccupancy";
pub const CHART_TEMP_HUMIDITY: &str = "chartTempHumidity";
pub const CHART_GAS: &str = "chartGas";
pub const CHART_PRESSURE: &str = "chartPressure";
pub const CHART_OCCUPANCY_DETAIL: &str = "chartOccupancyDetail";

const NO_DATA: &str = "No data";

fn level(value: String) -> String {
    format!("Level {}", value)
}

fn persons_dataset(rows: &[Reading]) -> Dataset {
    Dataset::new(
        "Persons",
        "#c41e3a",
        true,
        SeriesData::Values(
            rows.iter()
                .map(|r| Some(r.estimated_occupancy.get().unwrap_or(0) as f64))
                .collect(),
        ),
    )
}

fn labels(rows: &[Reading]) -> Vec<String> {
    rows.iter().map(|r| time_label(r.timestamp.as_deref())).collect()
}

fn chart_status(ui: &dyn UiSurface, chart_id: &str, text: &str) {
    ui.set_text(&elements::chart_status(chart_id), text);
}

fn clear(ui: &dyn UiSurface, ids: &[&str]) {
    for id in ids {
        ui.set_text(id, PLACEHOLDER);
    }
}

/// Headline tiles: occupancy, recommendation, temperature, humidity, range.
pub struct SnapshotLoader {
    client: ApiClient,
    session: Arc<Session>,
}

impl SnapshotLoader {
    pub fn new(client: ApiClient, session: Arc<Session>) -> Self {
        Self { client, session }
    }
}

#[async_trait]
impl Loader for SnapshotLoader {
    fn name(&self) -> &'static str {
        "current snapshot"
    }

    fn priority(&self) -> Priority {
        Priority::Primary
    }

    async fn load(&self, _cycle: CycleContext) -> LoadOutcome {
        let (current, stats) = futures::join!(
            self.client.call::<CurrentSnapshot>(Endpoint::CurrentSnapshot, Vec::new()),
            self.client.call::<AggregateStats>(Endpoint::Stats, Vec::new()),
        );
        let outcome = LoadOutcome::of(&current).merge(LoadOutcome::of(&stats));
        let ui = self.session.ui();

        match current {
            CallResult::Success(payload) => {
                let d = payload.data;
                ui.set_text(elements::CURRENT_OCCUPANCY, &d.estimated_occupancy.display());
                ui.set_text(elements::AC_LEVEL, &level(d.ac_recommendation.display()));
                let sensors = d.sensors.unwrap_or_default();
                ui.set_text(elements::CURRENT_TEMP, &sensors.temperature.with_unit(1, "°C"));
                ui.set_text(elements::CURRENT_HUMIDITY, &sensors.humidity.with_unit(1, "%"));
            }
            CallResult::Rejected { .. } => {
                clear(
                    ui,
                    &[elements::CURRENT_OCCUPANCY, elements::CURRENT_TEMP, elements::CURRENT_HUMIDITY],
                );
                ui.set_text(elements::AC_LEVEL, &level(PLACEHOLDER.to_string()));
            }
            CallResult::Failed => {}
        }

        match stats {
            CallResult::Success(payload) => {
                ui.set_text(elements::TEMP_RANGE, &payload.data.temperature_range());
            }
            CallResult::Rejected { .. } => ui.set_text(elements::TEMP_RANGE, PLACEHOLDER),
            CallResult::Failed => {}
        }

        if outcome != LoadOutcome::Unavailable {
            ui.set_text(
                elements::LAST_UPDATE,
                &chrono::Local::now().format("%H:%M:%S").to_string(),
            );
        }
        outcome
    }
}

/// The 24 h charts: occupancy, temperature/humidity, gas resistance, pressure.
/// One history fetch feeds all four.
pub struct HistoryLoader {
    client: ApiClient,
    session: Arc<Session>,
    hours: u32,
    limit: u32,
}

impl HistoryLoader {
    pub fn new(client: ApiClient, session: Arc<Session>, hours: u32, limit: u32) -> Self {
        Self {
            client,
            session,
            hours,
            limit,
        }
    }

    fn charts(rows: &[Reading]) -> Vec<ChartData> {
        let labels = labels(rows);
        let values = |f: fn(&Reading) -> Option<f64>| SeriesData::Values(rows.iter().map(f).collect());

        vec![
            ChartData::line(CHART_OCCUPANCY, Some("Persons"), labels.clone(), vec![persons_dataset(rows)]),
            ChartData::line(
                CHART_TEMP_HUMIDITY,
                None,
                labels.clone(),
                vec![
                    Dataset::new("Temperature (°C)", "#ef4444", false, values(|r| r.temperature.get())),
                    Dataset::new("Humidity (%)", "#3b82f6", false, values(|r| r.humidity.get())),
                ],
            ),
            ChartData::line(
                CHART_GAS,
                Some("Ohm"),
                labels.clone(),
                vec![Dataset::new(
                    "Gas resistance (Ohm)",
                    "#d4a853",
                    true,
                    values(|r| r.gas_resistance.get()),
                )],
            ),
            ChartData::line(
                CHART_PRESSURE,
                Some("hPa"),
                labels,
                vec![Dataset::new("Pressure (hPa)", "#8b5cf6", true, values(|r| r.pressure.get()))],
            ),
        ]
    }
}

#[async_trait]
impl Loader for HistoryLoader {
    fn name(&self) -> &'static str {
        "historical series"
    }

    fn priority(&self) -> Priority {
        Priority::Primary
    }

    async fn load(&self, cycle: CycleContext) -> LoadOutcome {
        let result = self
            .client
            .call::<Vec<Reading>>(
                Endpoint::History,
                vec![("hours", self.hours.to_string()), ("limit", self.limit.to_string())],
            )
            .await;

        let ui = self.session.ui();
        let chart_ids = [CHART_OCCUPANCY, CHART_TEMP_HUMIDITY, CHART_GAS, CHART_PRESSURE];
        match result {
            CallResult::Success(payload) if !payload.data.is_empty() => {
                for chart in Self::charts(&payload.data) {
                    chart_status(ui, &chart.id, "");
                    self.session.render(chart, cycle.sequence);
                }
                LoadOutcome::Applied
            }
            CallResult::Success(_) | CallResult::Rejected { .. } => {
                for id in chart_ids {
                    chart_status(ui, id, NO_DATA);
                }
                LoadOutcome::NoData
            }
            CallResult::Failed => LoadOutcome::Unavailable,
        }
    }
}

/// Occupancy tab: persons, utilisation bar, recommendation, estimator state.
pub struct OccupancyLoader {
    client: ApiClient,
    session: Arc<Session>,
}

impl OccupancyLoader {
    pub fn new(client: ApiClient, session: Arc<Session>) -> Self {
        Self { client, session }
    }

    const ESTIMATOR_ELEMENTS: [&'static str; 4] = [
        elements::ESTIMATOR_MODEL,
        elements::ESTIMATOR_SAMPLES,
        elements::ESTIMATOR_CALIBRATED,
        elements::ESTIMATOR_BASELINE,
    ];

    fn show_estimator(ui: &dyn UiSurface, status: &EstimatorStatus) {
        let model = if status.is_trained() { "Trained" } else { "Physical" };
        ui.set_text(elements::ESTIMATOR_MODEL, model);
        ui.set_text(
            elements::ESTIMATOR_SAMPLES,
            &format!("{} / {}", status.training_samples, status.min_samples_for_training),
        );
        match &status.baseline {
            Some(baseline) => {
                ui.set_text(
                    elements::ESTIMATOR_CALIBRATED,
                    if baseline.calibrated { "Yes" } else { "No" },
                );
                ui.set_text(elements::ESTIMATOR_BASELINE, &baseline.temperature.with_unit(1, "°C"));
            }
            None => {
                ui.set_text(elements::ESTIMATOR_CALIBRATED, PLACEHOLDER);
                ui.set_text(elements::ESTIMATOR_BASELINE, PLACEHOLDER);
            }
        }
    }
}

#[async_trait]
impl Loader for OccupancyLoader {
    fn name(&self) -> &'static str {
        "occupancy"
    }

    async fn load(&self, _cycle: CycleContext) -> LoadOutcome {
        let (current, estimator) = futures::join!(
            self.client.call::<CurrentSnapshot>(Endpoint::CurrentSnapshot, Vec::new()),
            self.client.call::<EstimatorStatus>(Endpoint::EstimatorStatus, Vec::new()),
        );
        let outcome = LoadOutcome::of(&current).merge(LoadOutcome::of(&estimator));
        let ui = self.session.ui();

        match current {
            CallResult::Success(payload) => {
                let d = payload.data;
                let percent = d.occupancy_percent.get().unwrap_or(0.0);
                ui.set_text(elements::OCC_PERSONS, &d.estimated_occupancy.display());
                ui.set_text(elements::OCC_PERCENT, &format!("{:.1} % utilisation", percent));
                ui.set_progress(elements::OCC_PROGRESS, percent.min(100.0));
                ui.set_text(elements::OCC_AC_LEVEL, &level(d.ac_recommendation.display()));
                let note = d.climate_recommendation.and_then(|c| c.note);
                ui.set_text(elements::OCC_AC_NOTE, note.as_deref().unwrap_or(PLACEHOLDER));
            }
            CallResult::Rejected { .. } => {
                clear(ui, &[elements::OCC_PERSONS, elements::OCC_PERCENT, elements::OCC_AC_NOTE]);
                ui.set_progress(elements::OCC_PROGRESS, 0.0);
                ui.set_text(elements::OCC_AC_LEVEL, &level(PLACEHOLDER.to_string()));
            }
            CallResult::Failed => {}
        }

        match estimator {
            CallResult::Success(payload) => Self::show_estimator(ui, &payload.data),
            CallResult::Rejected { .. } => clear(ui, &Self::ESTIMATOR_ELEMENTS),
            CallResult::Failed => {}
        }
        outcome
    }
}

/// Detail chart of the occupancy tab with a selectable window.
pub struct OccupancyHistoryLoader {
    client: ApiClient,
    session: Arc<Session>,
    hours: AtomicU32,
}

impl OccupancyHistoryLoader {
    pub fn new(client: ApiClient, session: Arc<Session>, hours: u32) -> Self {
        Self {
            client,
            session,
            hours: AtomicU32::new(hours),
        }
    }

    pub fn hours(&self) -> u32 {
        self.hours.load(Ordering::SeqCst)
    }

    /// Switch the window and fetch it right away, outside the cycle.
    pub async fn select_hours(&self, hours: u32) -> LoadOutcome {
        self.hours.store(hours.max(1), Ordering::SeqCst);
        let cycle = CycleContext {
            sequence: self.session.next_sequence(),
        };
        self.load(cycle).await
    }
}

#[async_trait]
impl Loader for OccupancyHistoryLoader {
    fn name(&self) -> &'static str {
        "occupancy history"
    }

    async fn load(&self, cycle: CycleContext) -> LoadOutcome {
        let result = self
            .client
            .call::<Vec<Reading>>(Endpoint::OccupancyHistory, vec![("hours", self.hours().to_string())])
            .await;

        let ui = self.session.ui();
        match result {
            CallResult::Success(payload) => {
                let rows = payload.data;
                chart_status(ui, CHART_OCCUPANCY_DETAIL, if rows.is_empty() { NO_DATA } else { "" });
                let chart = ChartData::line(
                    CHART_OCCUPANCY_DETAIL,
                    Some("Persons"),
                    labels(&rows),
                    vec![persons_dataset(&rows)],
                );
                self.session.render(chart, cycle.sequence);
                LoadOutcome::Applied
            }
            CallResult::Rejected { .. } => {
                chart_status(ui, CHART_OCCUPANCY_DETAIL, NO_DATA);
                LoadOutcome::NoData
            }
            CallResult::Failed => LoadOutcome::Unavailable,
        }
    }
}

/// Sensor tab: raw values, 24 h averages and the time of the last reading.
pub struct SensorLoader {
    client: ApiClient,
    session: Arc<Session>,
}

impl SensorLoader {
    pub fn new(client: ApiClient, session: Arc<Session>) -> Self {
        Self { client, session }
    }

    /// A missing sensor block clears every sensor field.
    fn show_sensors(ui: &dyn UiSurface, sensors: Option<&SensorSnapshot>) {
        let Some(s) = sensors else {
            clear(
                ui,
                &[
                    elements::SENSOR_TEMP,
                    elements::SENSOR_HUMIDITY,
                    elements::SENSOR_PRESSURE,
                    elements::SENSOR_GAS,
                    elements::SENSOR_MOVEMENT,
                    elements::SENSOR_MOVEMENT_STATUS,
                ],
            );
            return;
        };
        ui.set_text(elements::SENSOR_TEMP, &s.temperature.with_unit(1, "°C"));
        ui.set_text(elements::SENSOR_HUMIDITY, &s.humidity.with_unit(1, "%"));
        ui.set_text(elements::SENSOR_PRESSURE, &s.pressure.with_unit(1, "hPa"));
        ui.set_text(elements::SENSOR_GAS, &s.gas_resistance.with_unit(0, "Ohm"));
        ui.set_text(
            elements::SENSOR_MOVEMENT,
            &s.movement_count_5min.get().unwrap_or(0).to_string(),
        );
        ui.set_text(
            elements::SENSOR_MOVEMENT_STATUS,
            if s.movement_detected { "Active" } else { "No movement" },
        );
    }
}

#[async_trait]
impl Loader for SensorLoader {
    fn name(&self) -> &'static str {
        "sensor detail"
    }

    async fn load(&self, _cycle: CycleContext) -> LoadOutcome {
        let (current, stats, latest) = futures::join!(
            self.client.call::<CurrentSnapshot>(Endpoint::CurrentSnapshot, Vec::new()),
            self.client.call::<AggregateStats>(Endpoint::Stats, Vec::new()),
            self.client.call::<Reading>(Endpoint::LatestReading, Vec::new()),
        );
        let outcome = LoadOutcome::of(&current)
            .merge(LoadOutcome::of(&stats))
            .merge(LoadOutcome::of(&latest));
        let ui = self.session.ui();

        match current {
            CallResult::Success(payload) => Self::show_sensors(ui, payload.data.sensors.as_ref()),
            CallResult::Rejected { .. } => Self::show_sensors(ui, None),
            CallResult::Failed => {}
        }

        match stats {
            CallResult::Success(payload) => {
                let d = payload.data;
                let average = |text: String| {
                    if text == PLACEHOLDER {
                        text
                    } else {
                        format!("Average: {}", text)
                    }
                };
                ui.set_text(elements::SENSOR_HUMIDITY_AVG, &average(d.avg_humidity.with_unit(1, "%")));
                ui.set_text(elements::SENSOR_PRESSURE_AVG, &average(d.avg_pressure.with_unit(1, "hPa")));
            }
            CallResult::Rejected { .. } => {
                clear(ui, &[elements::SENSOR_HUMIDITY_AVG, elements::SENSOR_PRESSURE_AVG]);
            }
            CallResult::Failed => {}
        }

        match latest {
            CallResult::Success(payload) => ui.set_text(
                elements::SENSOR_LAST_READING,
                payload.data.timestamp.as_deref().unwrap_or(PLACEHOLDER),
            ),
            CallResult::Rejected { .. } => ui.set_text(elements::SENSOR_LAST_READING, PLACEHOLDER),
            CallResult::Failed => {}
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::testing::{ScriptedTransport, test_session};

    const CURRENT: &str = r#"{"success": true, "data": {
        "estimated_occupancy": 42, "occupancy_percent": 35.0, "ac_recommendation": 4,
        "confidence": 50, "model": "cached",
        "sensors": {"temperature": 23.46, "humidity": null, "pressure": 1008.04,
                    "gas_resistance": 120000.4, "movement_detected": true, "movement_count_5min": 7},
        "climate_recommendation": {"level": 4, "label": "Medium-high", "note": "Raise the level"}}}"#;

    fn client(session: &Arc<Session>, transport: &Arc<ScriptedTransport>) -> ApiClient {
        ApiClient::new(transport.clone(), session.connectivity().clone())
    }

    #[tokio::test]
    async fn test_history_scenario_renders_hour_minute_labels() {
        let (session, engine, _) = test_session();
        let transport = Arc::new(ScriptedTransport::new());
        transport.respond(
            "/api/data/history",
            200,
            r#"{"success": true, "data": [
                {"ts": "2024-01-01 08:00", "temperature": 21.4},
                {"ts": "2024-01-01 09:00", "temperature": 22.1}]}"#,
        );
        let loader = HistoryLoader::new(client(&session, &transport), session.clone(), 24, 500);

        assert_eq!(loader.load(CycleContext { sequence: 1 }).await, LoadOutcome::Applied);

        let chart = engine.snapshot(CHART_TEMP_HUMIDITY).unwrap();
        assert_eq!(chart.labels, vec!["08:00", "09:00"]);
        assert_eq!(chart.datasets[0].data, SeriesData::Values(vec![Some(21.4), Some(22.1)]));
        assert_eq!(chart.datasets[1].data, SeriesData::Values(vec![None, None]));
        assert!(chart.show_legend);
        assert_eq!(
            transport.requests(),
            vec!["/api/data/history?hours=24&limit=500".to_string()]
        );
        assert_eq!(engine.constructed(), 4);
    }

    #[tokio::test]
    async fn test_history_refresh_reuses_charts() {
        let (session, engine, _) = test_session();
        let transport = Arc::new(ScriptedTransport::new());
        transport.respond(
            "/api/data/history",
            200,
            r#"{"success": true, "data": [{"timestamp": "2024-01-01 08:00:00", "pressure": 1010.0}]}"#,
        );
        let loader = HistoryLoader::new(client(&session, &transport), session.clone(), 24, 500);

        for sequence in 1..=3 {
            loader.load(CycleContext { sequence }).await;
        }
        assert_eq!(engine.constructed(), 4);
        assert_eq!(session.widgets().len(), 4);
        assert_eq!(engine.snapshot(CHART_PRESSURE).unwrap().redraws, 2);
    }

    #[tokio::test]
    async fn test_empty_history_marks_charts_without_building_them() {
        let (session, engine, board) = test_session();
        let transport = Arc::new(ScriptedTransport::new());
        transport.respond("/api/data/history", 200, r#"{"success": true, "data": []}"#);
        let loader = HistoryLoader::new(client(&session, &transport), session.clone(), 24, 500);

        assert_eq!(loader.load(CycleContext { sequence: 1 }).await, LoadOutcome::NoData);
        assert_eq!(engine.constructed(), 0);
        assert_eq!(
            board.text(&elements::chart_status(CHART_GAS)).as_deref(),
            Some("No data")
        );
    }

    #[tokio::test]
    async fn test_snapshot_renders_values_and_placeholders() {
        let (session, _, board) = test_session();
        let transport = Arc::new(ScriptedTransport::new());
        transport.respond("/api/occupancy/current", 200, CURRENT);
        transport.respond("/api/data/stats", 200, r#"{"success": true, "data": {"min_temp": 19.5, "max_temp": 24.0}}"#);
        let loader = SnapshotLoader::new(client(&session, &transport), session.clone());

        assert_eq!(loader.load(CycleContext { sequence: 1 }).await, LoadOutcome::Applied);
        assert_eq!(board.text(elements::CURRENT_OCCUPANCY).as_deref(), Some("42"));
        assert_eq!(board.text(elements::AC_LEVEL).as_deref(), Some("Level 4"));
        assert_eq!(board.text(elements::CURRENT_TEMP).as_deref(), Some("23.5 °C"));
        assert_eq!(board.text(elements::CURRENT_HUMIDITY).as_deref(), Some("--"));
        assert_eq!(board.text(elements::TEMP_RANGE).as_deref(), Some("Min 19.5 / Max 24.0 °C"));
        assert!(board.text(elements::LAST_UPDATE).is_some());
    }

    #[tokio::test]
    async fn test_occupancy_tab() {
        let (session, _, board) = test_session();
        let transport = Arc::new(ScriptedTransport::new());
        transport.respond("/api/occupancy/current", 200, CURRENT);
        transport.respond(
            "/api/estimator/status",
            200,
            r#"{"success": true, "data": {"model_type": "physical", "training_samples": 3,
                "min_samples_for_training": 10, "baseline": {"calibrated": false, "temperature": 20.0}}}"#,
        );
        let loader = OccupancyLoader::new(client(&session, &transport), session.clone());

        loader.load(CycleContext { sequence: 1 }).await;

        assert_eq!(board.text(elements::OCC_PERCENT).as_deref(), Some("35.0 % utilisation"));
        assert_eq!(board.progress(elements::OCC_PROGRESS), Some(35.0));
        assert_eq!(board.text(elements::OCC_AC_NOTE).as_deref(), Some("Raise the level"));
        assert_eq!(board.text(elements::ESTIMATOR_MODEL).as_deref(), Some("Physical"));
        assert_eq!(board.text(elements::ESTIMATOR_SAMPLES).as_deref(), Some("3 / 10"));
        assert_eq!(board.text(elements::ESTIMATOR_CALIBRATED).as_deref(), Some("No"));
        assert_eq!(board.text(elements::ESTIMATOR_BASELINE).as_deref(), Some("20.0 °C"));
    }

    #[tokio::test]
    async fn test_select_hours_refetches_with_new_window() {
        let (session, engine, _) = test_session();
        let transport = Arc::new(ScriptedTransport::new());
        transport.respond(
            "/api/occupancy/history",
            200,
            r#"{"success": true, "data": [{"timestamp": "2024-01-01 08:00:00", "estimated_occupancy": null}]}"#,
        );
        let loader = OccupancyHistoryLoader::new(client(&session, &transport), session.clone(), 24);

        loader.load(CycleContext { sequence: 1 }).await;
        loader.select_hours(6).await;

        assert_eq!(loader.hours(), 6);
        assert_eq!(
            transport.requests(),
            vec![
                "/api/occupancy/history?hours=24".to_string(),
                "/api/occupancy/history?hours=6".to_string(),
            ]
        );
        let chart = engine.snapshot(CHART_OCCUPANCY_DETAIL).unwrap();
        assert_eq!(chart.datasets[0].data, SeriesData::Values(vec![Some(0.0)]));
        assert_eq!(engine.constructed(), 1);
    }

    #[tokio::test]
    async fn test_failing_endpoint_leaves_other_loaders_working() {
        use crate::application::orchestrator::RefreshOrchestrator;

        let (session, engine, board) = test_session();
        let transport = Arc::new(ScriptedTransport::new());
        transport.respond("/api/occupancy/current", 200, CURRENT);
        transport.respond("/api/data/stats", 200, r#"{"success": true, "data": {}}"#);
        transport.fail("/api/data/history");
        let loaders: Vec<Arc<dyn Loader>> = vec![
            Arc::new(HistoryLoader::new(client(&session, &transport), session.clone(), 24, 500)),
            Arc::new(SnapshotLoader::new(client(&session, &transport), session.clone())),
        ];
        let orchestrator = RefreshOrchestrator::new(session.clone(), loaders);

        let report = orchestrator.run_cycle().await;

        assert_eq!(report.outcome("historical series"), Some(LoadOutcome::Unavailable));
        assert_eq!(report.outcome("current snapshot"), Some(LoadOutcome::Applied));
        assert_eq!(board.text(elements::CURRENT_OCCUPANCY).as_deref(), Some("42"));
        assert_eq!(board.text(elements::TEMP_RANGE).as_deref(), Some("--"));
        assert_eq!(engine.constructed(), 0);
    }

    #[tokio::test]
    async fn test_overlapping_fetches_keep_last_applied() {
        let (session, engine, _) = test_session();
        let transport = Arc::new(ScriptedTransport::new());
        let older = transport.respond_gated(
            "/api/data/history",
            200,
            r#"{"success": true, "data": [{"timestamp": "2024-01-01 08:00:00", "pressure": 1001.0}]}"#,
        );
        let newer = transport.respond_gated(
            "/api/data/history",
            200,
            r#"{"success": true, "data": [{"timestamp": "2024-01-01 08:30:00", "pressure": 1002.0}]}"#,
        );
        let loader = HistoryLoader::new(client(&session, &transport), session.clone(), 24, 500);

        let release = async {
            newer.send(()).unwrap();
            tokio::task::yield_now().await;
            older.send(()).unwrap();
        };
        futures::join!(
            loader.load(CycleContext { sequence: 1 }),
            loader.load(CycleContext { sequence: 2 }),
            release,
        );

        let chart = engine.snapshot(CHART_PRESSURE).unwrap();
        assert_eq!(chart.labels, vec!["08:00"]);
        assert_eq!(chart.datasets[0].data, SeriesData::Values(vec![Some(1001.0)]));
        assert_eq!(engine.constructed(), 4);
    }

    #[tokio::test]
    async fn test_missing_sensor_block_clears_previous_values() {
        let (session, _, board) = test_session();
        let transport = Arc::new(ScriptedTransport::new());
        transport.respond("/api/occupancy/current", 200, CURRENT);
        transport.respond("/api/data/stats", 200, r#"{"success": true, "data": {"avg_humidity": 41.0}}"#);
        transport.respond("/api/data/latest", 200, r#"{"success": true, "data": {}}"#);
        let snapshot = SnapshotLoader::new(client(&session, &transport), session.clone());
        let sensors = SensorLoader::new(client(&session, &transport), session.clone());

        snapshot.load(CycleContext { sequence: 1 }).await;
        sensors.load(CycleContext { sequence: 1 }).await;
        assert_eq!(board.text(elements::CURRENT_TEMP).as_deref(), Some("23.5 °C"));
        assert_eq!(board.text(elements::SENSOR_TEMP).as_deref(), Some("23.5 °C"));

        transport.respond(
            "/api/occupancy/current",
            200,
            r#"{"success": true, "data": {"estimated_occupancy": 0, "sensors": null}}"#,
        );
        snapshot.load(CycleContext { sequence: 2 }).await;
        sensors.load(CycleContext { sequence: 2 }).await;

        assert_eq!(board.text(elements::CURRENT_OCCUPANCY).as_deref(), Some("0"));
        assert_eq!(board.text(elements::CURRENT_TEMP).as_deref(), Some("--"));
        assert_eq!(board.text(elements::CURRENT_HUMIDITY).as_deref(), Some("--"));
        for id in [
            elements::SENSOR_TEMP,
            elements::SENSOR_PRESSURE,
            elements::SENSOR_GAS,
            elements::SENSOR_MOVEMENT,
            elements::SENSOR_MOVEMENT_STATUS,
        ] {
            assert_eq!(board.text(id).as_deref(), Some("--"), "{id}");
        }
    }

    #[tokio::test]
    async fn test_rejected_calls_replace_sensor_values_with_placeholders() {
        let (session, _, board) = test_session();
        let transport = Arc::new(ScriptedTransport::new());
        transport.respond("/api/occupancy/current", 200, CURRENT);
        transport.respond("/api/data/stats", 200, r#"{"success": true, "data": {"avg_humidity": 41.0}}"#);
        let loader = SensorLoader::new(client(&session, &transport), session.clone());

        loader.load(CycleContext { sequence: 1 }).await;
        assert_eq!(board.text(elements::SENSOR_HUMIDITY_AVG).as_deref(), Some("Average: 41.0 %"));

        let rejected = r#"{"success": false, "error": "database unavailable"}"#;
        transport.respond("/api/occupancy/current", 500, rejected);
        transport.respond("/api/data/stats", 500, rejected);
        assert_eq!(loader.load(CycleContext { sequence: 2 }).await, LoadOutcome::NoData);

        assert_eq!(board.text(elements::SENSOR_TEMP).as_deref(), Some("--"));
        assert_eq!(board.text(elements::SENSOR_MOVEMENT_STATUS).as_deref(), Some("--"));
        assert_eq!(board.text(elements::SENSOR_HUMIDITY_AVG).as_deref(), Some("--"));
        assert_eq!(board.text(elements::SENSOR_PRESSURE_AVG).as_deref(), Some("--"));
    }

    #[tokio::test]
    async fn test_rejected_estimator_and_missing_note_clear_occupancy_fields() {
        let (session, _, board) = test_session();
        let transport = Arc::new(ScriptedTransport::new());
        transport.respond("/api/occupancy/current", 200, CURRENT);
        transport.respond(
            "/api/estimator/status",
            200,
            r#"{"success": true, "data": {"model_type": "trained_regression", "training_samples": 12,
                "baseline": {"calibrated": true, "temperature": 20.0}}}"#,
        );
        let loader = OccupancyLoader::new(client(&session, &transport), session.clone());
        loader.load(CycleContext { sequence: 1 }).await;
        assert_eq!(board.text(elements::ESTIMATOR_MODEL).as_deref(), Some("Trained"));

        transport.respond(
            "/api/occupancy/current",
            200,
            r#"{"success": true, "data": {"estimated_occupancy": 3, "climate_recommendation": {"level": 2}}}"#,
        );
        transport.respond(
            "/api/estimator/status",
            200,
            r#"{"success": false, "error": "estimator offline"}"#,
        );
        loader.load(CycleContext { sequence: 2 }).await;

        assert_eq!(board.text(elements::OCC_AC_NOTE).as_deref(), Some("--"));
        for id in [
            elements::ESTIMATOR_MODEL,
            elements::ESTIMATOR_SAMPLES,
            elements::ESTIMATOR_CALIBRATED,
            elements::ESTIMATOR_BASELINE,
        ] {
            assert_eq!(board.text(id).as_deref(), Some("--"), "{id}");
        }
    }

    #[tokio::test]
    async fn test_sensor_detail_survives_partial_failure() {
        let (session, _, board) = test_session();
        let transport = Arc::new(ScriptedTransport::new());
        transport.respond("/api/occupancy/current", 200, CURRENT);
        transport.fail("/api/data/stats");
        transport.respond(
            "/api/data/latest",
            200,
            r#"{"success": true, "data": {"id": 99, "timestamp": "2024-01-01 09:59:58"}}"#,
        );
        let loader = SensorLoader::new(client(&session, &transport), session.clone());

        assert_eq!(loader.load(CycleContext { sequence: 1 }).await, LoadOutcome::Applied);
        assert_eq!(board.text(elements::SENSOR_PRESSURE).as_deref(), Some("1008.0 hPa"));
        assert_eq!(board.text(elements::SENSOR_GAS).as_deref(), Some("120000 Ohm"));
        assert_eq!(board.text(elements::SENSOR_MOVEMENT).as_deref(), Some("7"));
        assert_eq!(board.text(elements::SENSOR_MOVEMENT_STATUS).as_deref(), Some("Active"));
        assert_eq!(board.text(elements::SENSOR_LAST_READING).as_deref(), Some("2024-01-01 09:59:58"));
        assert!(board.text(elements::SENSOR_HUMIDITY_AVG).is_none());
    }
}
