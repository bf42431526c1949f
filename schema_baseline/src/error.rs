//! Error types for schema_baseline

use thiserror::Error;

/// Result type for schema_baseline operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for schema_baseline
///
/// Pattern misses and verification mismatches are not errors: they are reported
/// through [`crate::verify::VerificationResult`]. Only configuration and I/O
/// problems surface here.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Pattern error: {0}")]
    PatternError(#[from] regex::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

/// Convert Serde JSON errors to schema_baseline errors
impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Error::SerializationError(error.to_string())
    }
}

/// Convert TOML deserialization errors to schema_baseline errors
impl From<toml::de::Error> for Error {
    fn from(error: toml::de::Error) -> Self {
        Error::ConfigError(format!("Failed to parse config file: {}", error))
    }
}

/// Convert YAML deserialization errors to schema_baseline errors
impl From<serde_yaml::Error> for Error {
    fn from(error: serde_yaml::Error) -> Self {
        Error::ConfigError(format!("Failed to parse config file: {}", error))
    }
}
