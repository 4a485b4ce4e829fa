//! Error types and handling for `skypane`

use thiserror::Error;

/// Stable identifiers for each error kind, used in logs and JSON output
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    EmptyInput,
    CityNotFound,
    UpstreamUnavailable,
    MalformedResponse,
    Config,
    Io,
}

/// Main error type for the `skypane` library
#[derive(Error, Debug)]
pub enum SkypaneError {
    /// The city input was empty after trimming
    #[error("Please enter a city name")]
    EmptyInput,

    /// Geocoding returned no candidates
    #[error("City \"{city}\" not found. Try another spelling or a major city.")]
    CityNotFound { city: String },

    /// A weather service could not be reached or answered with a failure status
    #[error("Weather service unavailable: {message}")]
    UpstreamUnavailable { message: String },

    /// A weather service answered, but without the fields we need
    #[error("Unexpected response from weather service: {message}")]
    MalformedResponse { message: String },

    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl SkypaneError {
    /// Create a new city-not-found error
    pub fn city_not_found<S: Into<String>>(city: S) -> Self {
        Self::CityNotFound { city: city.into() }
    }

    /// Create a new upstream error
    pub fn upstream<S: Into<String>>(message: S) -> Self {
        Self::UpstreamUnavailable {
            message: message.into(),
        }
    }

    /// Create a new malformed-response error
    pub fn malformed<S: Into<String>>(message: S) -> Self {
        Self::MalformedResponse {
            message: message.into(),
        }
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn code(&self) -> ErrorCode {
        match self {
            SkypaneError::EmptyInput => ErrorCode::EmptyInput,
            SkypaneError::CityNotFound { .. } => ErrorCode::CityNotFound,
            SkypaneError::UpstreamUnavailable { .. } => ErrorCode::UpstreamUnavailable,
            SkypaneError::MalformedResponse { .. } => ErrorCode::MalformedResponse,
            SkypaneError::Config { .. } => ErrorCode::Config,
            SkypaneError::Io { .. } => ErrorCode::Io,
        }
    }

    /// Get a user-friendly error message for the result area
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            SkypaneError::EmptyInput | SkypaneError::CityNotFound { .. } => self.to_string(),
            SkypaneError::UpstreamUnavailable { .. } => {
                "Unable to reach the weather service. Please check your internet connection."
                    .to_string()
            }
            SkypaneError::MalformedResponse { message } => {
                format!("The weather service sent incomplete data ({message}).")
            }
            SkypaneError::Config { message } => format!("Configuration error: {message}"),
            SkypaneError::Io { .. } => {
                "File operation failed. Please check file permissions.".to_string()
            }
        }
    }
}

impl From<reqwest::Error> for SkypaneError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            SkypaneError::malformed(err.to_string())
        } else {
            SkypaneError::upstream(err.to_string())
        }
    }
}
