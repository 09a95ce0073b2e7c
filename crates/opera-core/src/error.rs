//! Error types for Opera

use thiserror::Error;

/// The main error type for Opera operations
#[derive(Debug, Error)]
pub enum OperaError {
    #[error("Material not found: {0}")]
    MaterialNotFound(String),

    #[error("Texture not found: {0}")]
    TextureNotFound(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParseError(String),

    #[error("TOML serialization error: {0}")]
    TomlSerError(String),

    #[error("Unhandled {side} limit value for '{suffix}' bound: {value}")]
    InvalidLimitValue {
        side: &'static str,
        suffix: String,
        value: String,
    },

    #[error("Invalid enum value: {value} is not one of {allowed:?}")]
    InvalidEnumValue {
        value: String,
        allowed: Vec<String>,
    },

    #[error("Value out of range: {field} must be between {min} and {max}, got {value}")]
    ValueOutOfRange {
        field: String,
        min: f64,
        max: f64,
        value: f64,
    },

    #[error("Non-finite value for {field}: {value}")]
    NonFiniteValue { field: String, value: f64 },

    #[error("Stale handle: {0} belongs to a model that has been replaced")]
    StaleHandle(String),

    #[error("Correlated object set for {0} is empty")]
    EmptyCorrelation(String),

    #[error("Import error: {0}")]
    ImportError(String),
}

/// Result type alias for Opera operations
pub type Result<T> = std::result::Result<T, OperaError>;

impl From<toml::de::Error> for OperaError {
    fn from(err: toml::de::Error) -> Self {
        OperaError::TomlParseError(err.to_string())
    }
}

impl From<toml::ser::Error> for OperaError {
    fn from(err: toml::ser::Error) -> Self {
        OperaError::TomlSerError(err.to_string())
    }
}

impl OperaError {
    /// Build an `InvalidEnumValue` from a static list of accepted spellings
    pub fn invalid_enum(value: impl Into<String>, allowed: &[&str]) -> Self {
        OperaError::InvalidEnumValue {
            value: value.into(),
            allowed: allowed.iter().map(|s| s.to_string()).collect(),
        }
    }
}
