// Application layer - Loaders, refresh cycle and the seams they talk through
pub mod chart_engine;
pub mod connectivity_monitor;
pub mod endpoint_client;
pub mod loaders;
pub mod orchestrator;
pub mod pager;
pub mod regression_view;
pub mod session;
pub mod transport;
pub mod ui_surface;
pub mod widget_cache;

#[cfg(test)]
pub mod testing;
