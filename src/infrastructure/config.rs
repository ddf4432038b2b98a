use crate::application::widget_cache::StaleWritePolicy;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct DashboardConfig {
    pub api: ApiSettings,
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub dashboard: DashboardSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiSettings {
    pub base_url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    #[serde(default = "default_listen")]
    pub listen: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            listen: default_listen(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct DashboardSettings {
    pub per_page: u32,
    pub history_hours: u32,
    pub history_limit: u32,
    pub occupancy_hours: u32,
    /// 0 means all stored data.
    pub scatter_hours: u32,
    pub train_hours: u32,
    pub stale_writes: StaleWritePolicy,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            per_page: 20,
            history_hours: 24,
            history_limit: 500,
            occupancy_hours: 24,
            scatter_hours: 0,
            train_hours: 0,
            stale_writes: StaleWritePolicy::Accept,
        }
    }
}

fn default_listen() -> String {
    "127.0.0.1:8090".to_string()
}

pub fn load_dashboard_config() -> anyhow::Result<DashboardConfig> {
    let settings = config::Config::builder()
        .set_default("api.base_url", "http://127.0.0.1:8000")?
        .add_source(config::File::with_name("config/dashboard").required(false))
        .add_source(config::Environment::with_prefix("DASHBOARD").separator("__"))
        .build()?;

    Ok(settings.try_deserialize()?)
}
