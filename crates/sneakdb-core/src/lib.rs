pub mod app_config;
pub mod brands;
pub mod config;
pub mod products;

pub use app_config::{AppConfig, Environment};
pub use brands::Brand;
pub use config::{load_app_config, load_app_config_from_env};
pub use products::{PriceObservation, ScrapeResult, Variant};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for environment variable {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
