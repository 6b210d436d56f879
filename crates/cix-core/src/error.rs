//! Error types for CIX extension contracts

use thiserror::Error;

/// Errors raised while defining or converting build parameters
#[derive(Error, Debug)]
pub enum ParameterError {
    /// Token could not be parsed into the parameter's type
    #[error("Invalid value for parameter '{name}': {token:?} ({reason})")]
    InvalidTokenFormat {
        name: String,
        token: String,
        reason: String,
    },

    #[error("Parameter name must not be empty")]
    EmptyName,

    #[error("Duplicate parameter name: {0}")]
    DuplicateName(String),

    #[error("No such parameter: {0}")]
    UnknownParameter(String),

    #[error("No value supplied for parameter '{0}' and it has no default")]
    MissingValue(String),

    /// Definition fields are inconsistent (e.g. empty choice list, min > max)
    #[error("Invalid definition for parameter '{name}': {reason}")]
    InvalidDefinition { name: String, reason: String },

    #[error("Failed to parse job file: {0}")]
    JobFile(#[from] toml::de::Error),

    /// I/O failure raised by the invocation context
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invocation was interrupted before a token was read
    #[error("Interrupted while reading parameter '{0}'")]
    Interrupted(String),
}

/// Errors raised while resolving status icons
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IconError {
    /// A resolving icon was asked for a path outside of request handling
    #[error("No active request to resolve icon '{image}' against")]
    NoActiveRequest { image: String },

    #[error("Unknown ball color: {0}")]
    UnknownBallColor(String),

    #[error("Unknown icon size: {0}")]
    UnknownSize(String),
}

/// Errors raised by the localization layer
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum L10nError {
    #[error("Invalid locale: {0:?}")]
    InvalidLocale(String),

    #[error("Malformed properties at line {line}: {reason}")]
    MalformedProperties { line: usize, reason: String },
}

/// Errors raised while loading configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid config value for {key}: {reason}")]
    InvalidValue { key: String, reason: String },
}

/// Top-level CIX error
#[derive(Error, Debug)]
pub enum CixError {
    #[error(transparent)]
    Parameter(#[from] ParameterError),

    #[error(transparent)]
    Icon(#[from] IconError),

    #[error(transparent)]
    L10n(#[from] L10nError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Result type for CIX operations
pub type Result<T> = std::result::Result<T, CixError>;
