pub mod app_config;
pub mod codes;
pub mod config;
pub mod dates;

pub use app_config::{AppConfig, Environment};
pub use codes::{conflict_code, conflict_code_escalated, generate_code, generate_name};
pub use config::{load_app_config, load_app_config_from_env};
pub use dates::{default_expiry, resolve_expiry, to_wire_date};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
