//! Error types for configuration loading and validation.

/// Errors that can occur when loading or validating an `hdlio.toml`.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    /// The TOML content could not be parsed.
    #[error("failed to parse configuration: {0}")]
    Parse(String),

    /// A library name that the configuration does not define.
    #[error("unknown library '{0}'")]
    UnknownLibrary(String),

    /// A required field is missing or empty.
    #[error("missing required field: {0}")]
    MissingField(String),

    /// A value failed validation.
    #[error("validation error: {0}")]
    Validation(String),
}
