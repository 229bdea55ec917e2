use thiserror::Error;

#[derive(Error, Debug)]
pub enum RosterError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("Request to {url} failed with status {status}")]
    NetworkError { url: String, status: u16 },

    #[error("Referee {id} not found")]
    NotFoundError { id: u64 },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

impl RosterError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, RosterError::NotFoundError { .. })
    }

    /// Short message for the terminal, without transport internals.
    pub fn user_friendly_message(&self) -> String {
        match self {
            RosterError::ApiError(_) | RosterError::NetworkError { .. } => {
                "The referee service could not be reached".to_string()
            }
            RosterError::NotFoundError { id } => format!("Referee {} does not exist", id),
            RosterError::ConfigError { .. }
            | RosterError::ConfigValidationError { .. }
            | RosterError::InvalidConfigValueError { .. } => {
                format!("Configuration problem: {}", self)
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, RosterError>;
