use thiserror::Error;

/// Top-level error type for the EcoWatt core.
///
/// Subsystem crates define their own error types and implement
/// `From<EcoWattError>` so that the `?` operator works across crate
/// boundaries.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum EcoWattError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Device not found: {0}")]
    DeviceNotFound(String),

    #[error("Alert not found: {0}")]
    AlertNotFound(String),

    #[error("Report not found: {0}")]
    ReportNotFound(String),

    #[error("State error: {0}")]
    State(String),
}

impl From<toml::de::Error> for EcoWattError {
    fn from(err: toml::de::Error) -> Self {
        EcoWattError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for EcoWattError {
    fn from(err: toml::ser::Error) -> Self {
        EcoWattError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for EcoWattError {
    fn from(err: serde_json::Error) -> Self {
        EcoWattError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for EcoWatt operations.
pub type Result<T> = std::result::Result<T, EcoWattError>;
