mod app_config;
mod config;
pub mod records;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use records::{DetailRecord, LabelledFields, OpeningTimes, SearchResultRecord, TimeDate};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
