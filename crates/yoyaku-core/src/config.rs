use anyhow::Result;
use chrono::NaiveTime;
use config::Config;
use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub store: StoreConfig,
    pub provider: ProviderConfig,
    pub services: Vec<ServiceConfig>,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    pub base_url: String,
    pub session_token: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProviderConfig {
    pub id: Uuid,
}

/// Slot granularity used when a service does not configure its own.
pub const DEFAULT_GRANULARITY_MINUTES: u32 = 30;

const fn default_granularity() -> u32 {
    DEFAULT_GRANULARITY_MINUTES
}

/// One entry of the service catalog: a bookable appointment category with
/// its default duration, slot granularity, and daily shift window.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
    pub duration_minutes: u32,
    #[serde(default = "default_granularity")]
    pub granularity_minutes: u32,
    #[serde(with = "crate::timefmt::hhmm")]
    pub shift_start: NaiveTime,
    #[serde(with = "crate::timefmt::hhmm")]
    pub shift_end: NaiveTime,
}

impl ServiceConfig {
    /// Daily shift window as an ordered pair of bounds.
    #[must_use]
    pub fn shift(&self) -> (NaiveTime, NaiveTime) {
        (self.shift_start, self.shift_end)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl Settings {
    /// ## Summary
    /// Loads configuration from `.env` file and environment variables into a `Settings`.
    /// Environment variables take precedence over `.env` file values.
    ///
    /// ## Errors
    /// Returns an error if building the configuration or deserializing it fails.
    pub fn load() -> Result<Self> {
        Ok(Config::builder()
            .set_default("store.base_url", "http://127.0.0.1:8698")?
            .set_default("logging.level", "debug")?
            // Env file
            .add_source(
                config::Environment::default()
                    .convert_case(config::Case::Snake)
                    .separator("_")
                    .ignore_empty(true)
                    .try_parsing(true),
            )
            // TOML file
            .add_source(config::File::with_name("config.toml").required(false))
            .build()?
            .try_deserialize::<Settings>()?)
    }

    /// Looks up a service catalog entry by name.
    #[must_use]
    pub fn service(&self, name: &str) -> Option<&ServiceConfig> {
        self.services.iter().find(|s| s.name == name)
    }
}

/// ## Summary
/// Loads configuration from environment variables and `.env` file.
///
/// ## Errors
/// Returns an error if loading or deserializing the configuration fails.
pub fn load_config() -> Result<Settings> {
    dotenvy::dotenv().ok();

    Settings::load()
}
