// Domain layer - Telemetry, chart and session state models
pub mod chart;
pub mod connectivity;
pub mod pagination;
pub mod regression;
pub mod telemetry;
