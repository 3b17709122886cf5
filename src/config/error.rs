use thiserror::Error;

/// Everything that can go wrong between reading the layers and accepting
/// the final [`Settings`](crate::config::Settings).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required layer (`default.toml` or `--config`) is missing
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    /// A value parsed but is out of range; `field` is the dotted key
    #[error("Invalid value for {field}: {message}")]
    ValidationError { field: String, message: String },

    /// `VCARD_APP_ENV` names no known environment
    #[error("Environment variable error: {0}")]
    EnvVarError(String),

    /// `VCARD_CONFIG_DIR` and `VCARD_CONFIG_FILE` are both set
    #[error("Conflicting configuration sources: {0}")]
    MutualExclusivityError(String),

    #[error(transparent)]
    Other(#[from] config::ConfigError),
}

impl ConfigError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        ConfigError::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn file_not_found(path: impl Into<String>) -> Self {
        ConfigError::FileNotFound(path.into())
    }

    pub fn mutual_exclusivity(message: impl Into<String>) -> Self {
        ConfigError::MutualExclusivityError(message.into())
    }
}
