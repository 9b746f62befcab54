//! Error types and handling for the Snowcast application

use thiserror::Error;

/// Main error type for the Snowcast application
#[derive(Error, Debug)]
pub enum SnowcastError {
    /// A reading could not be evaluated (bad humidity, non-finite temperature)
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    /// An expected field was absent from the weather payload
    #[error("Missing data: {field}")]
    MissingData { field: String },

    /// User-supplied request validation errors
    #[error("Invalid request: {message}")]
    Validation { message: String },

    /// Requested location could not be found
    #[error("Not found: {message}")]
    NotFound { message: String },

    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// API communication errors
    #[error("API error: {message}")]
    Api { message: String },

    /// Cache operation errors
    #[error("Cache error: {message}")]
    Cache { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl SnowcastError {
    /// Create a new invalid input error
    pub fn invalid_input<S: Into<String>>(message: S) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Create a new missing data error
    pub fn missing_data<S: Into<String>>(field: S) -> Self {
        Self::MissingData {
            field: field.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new not-found error
    pub fn not_found<S: Into<String>>(message: S) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new API error
    pub fn api<S: Into<String>>(message: S) -> Self {
        Self::Api {
            message: message.into(),
        }
    }

    /// Create a new cache error
    pub fn cache<S: Into<String>>(message: S) -> Self {
        Self::Cache {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            SnowcastError::InvalidInput { message } => {
                format!("Unable to evaluate conditions: {message}")
            }
            SnowcastError::MissingData { field } => format!("{field} is unavailable."),
            SnowcastError::Validation { message } | SnowcastError::NotFound { message } => {
                message.clone()
            }
            SnowcastError::Config { .. } => {
                "Configuration error. Please check your config file.".to_string()
            }
            SnowcastError::Api { .. } => {
                "Failed to fetch weather data. Please try again.".to_string()
            }
            SnowcastError::Cache { .. } => "Forecast cache operation failed.".to_string(),
            SnowcastError::Io { .. } => {
                "File operation failed. Please check file permissions.".to_string()
            }
        }
    }
}
