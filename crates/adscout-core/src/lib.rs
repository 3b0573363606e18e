pub mod app_config;
pub mod config;
pub mod products;
pub mod profiles;

use thiserror::Error;

pub use app_config::{AppConfig, Environment, DEFAULT_API_BASE_URL};
pub use config::{load_app_config, load_app_config_from_env};
pub use products::{ProductFields, ProductRecord, CURRENCY};
pub use profiles::HeaderProfile;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for environment variable {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
