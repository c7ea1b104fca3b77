//! Error types for the demo application.

use quickserve_core::CoreError;

/// Demo application errors.
#[derive(Debug, thiserror::Error)]
pub enum DemoError {
    #[error("Failed to read or write config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("No config path available")]
    NoConfigPath,

    #[error(transparent)]
    Core(#[from] CoreError),
}

pub type DemoResult<T> = Result<T, DemoError>;
