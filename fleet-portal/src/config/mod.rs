use portal_core::error::AppError;
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Deserialize, Clone, Debug)]
pub struct Settings {
    pub server: ServerSettings,
    pub fleet_api: FleetApiSettings,
    #[serde(default)]
    pub session: SessionSettings,
    #[serde(default)]
    pub telemetry: TelemetrySettings,
}

#[derive(Deserialize, Clone, Debug)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Deserialize, Clone, Debug)]
pub struct FleetApiSettings {
    /// Root of the fleet REST API, e.g. `http://localhost:8000`.
    pub base_url: String,
    /// Unset means calls wait for the API indefinitely.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_user_agent() -> String {
    concat!("fleet-portal/", env!("CARGO_PKG_VERSION")).to_string()
}

#[derive(Deserialize, Clone, Debug)]
pub struct SessionSettings {
    /// Set to true in production with HTTPS.
    #[serde(default)]
    pub secure_cookie: bool,
    #[serde(default = "default_inactivity_hours")]
    pub inactivity_hours: u32,
}

fn default_inactivity_hours() -> u32 {
    24
}

/// Longest idle period a session may be configured for: one year.
const MAX_INACTIVITY_HOURS: u32 = 24 * 366;

impl SessionSettings {
    /// Idle time after which the session cookie expires, capped at one year.
    pub fn inactivity(&self) -> time::Duration {
        time::Duration::hours(i64::from(self.inactivity_hours.min(MAX_INACTIVITY_HOURS)))
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            secure_cookie: false,
            inactivity_hours: default_inactivity_hours(),
        }
    }
}

#[derive(Deserialize, Clone, Debug)]
pub struct TelemetrySettings {
    #[serde(default = "default_service_name")]
    pub service_name: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// OTLP gRPC collector, e.g. `http://tempo:4317`. Traces are not exported when unset.
    #[serde(default)]
    pub otlp_endpoint: Option<String>,
}

fn default_service_name() -> String {
    "fleet-portal".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for TelemetrySettings {
    fn default() -> Self {
        Self {
            service_name: default_service_name(),
            log_level: default_log_level(),
            otlp_endpoint: None,
        }
    }
}

pub fn get_configuration() -> Result<Settings, AppError> {
    let base_path = std::env::current_dir()
        .map_err(|e| AppError::ConfigError(anyhow::anyhow!("cannot resolve working directory: {}", e)))?;

    Ok(load_from(configuration_directory(base_path))?)
}

// Works both from the workspace root and from inside the crate directory.
fn configuration_directory(base_path: PathBuf) -> PathBuf {
    if base_path.ends_with("fleet-portal") {
        base_path.join("config")
    } else {
        base_path.join("fleet-portal").join("config")
    }
}

fn load_from(configuration_directory: PathBuf) -> Result<Settings, config::ConfigError> {
    let settings = config::Config::builder()
        .add_source(config::File::from(configuration_directory.join("base.yaml")).required(true))
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    settings.try_deserialize::<Settings>()
}
