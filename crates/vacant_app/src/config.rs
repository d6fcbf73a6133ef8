use std::env;
use std::path::PathBuf;

use log::LevelFilter;
use thiserror::Error;
use vacant_engine::SourceSettings;

use crate::logging::LogDestination;

const DEFAULT_STORE_PATH: &str = "vacancies.json";
const DEFAULT_USER_AGENT: &str = "Vacant/1.0";

/// Runtime settings, read from the environment and an optional `.env` file.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub store_path: PathBuf,
    pub superjob_api_key: Option<String>,
    pub hh_user_agent: String,
    pub log_level: LevelFilter,
    pub log_destination: LogDestination,
    pub sources: SourceSettings,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup; `load` passes the process env.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let log_level = match non_empty("VACANT_LOG_LEVEL") {
            Some(raw) => {
                vacant_logging::parse_level(&raw).ok_or(ConfigError::InvalidLogLevel(raw))?
            }
            None => LevelFilter::Info,
        };
        let log_destination = match non_empty("VACANT_LOG_DESTINATION") {
            Some(raw) => raw
                .parse()
                .map_err(|_| ConfigError::InvalidLogDestination(raw))?,
            None => LogDestination::default(),
        };

        Ok(Self {
            store_path: non_empty("VACANT_STORE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_STORE_PATH)),
            superjob_api_key: non_empty("SUPERJOB_API_KEY"),
            hh_user_agent: non_empty("HH_USER_AGENT")
                .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
            log_level,
            log_destination,
            sources: SourceSettings::default(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("VACANT_LOG_LEVEL {0:?} is not a log level (error, warn, info, debug, trace, off)")]
    InvalidLogLevel(String),
    #[error("VACANT_LOG_DESTINATION {0:?} must be terminal, file or both")]
    InvalidLogDestination(String),
}
