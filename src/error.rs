//! Error types and handling for `BelWeather`

use axum::http::StatusCode;
use thiserror::Error;

/// Failure of a single weather resolution.
///
/// The resolver only ever produces these two kinds. Transport and parsing
/// errors are flattened into `UpstreamUnavailable` with their description.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// Malformed or unknown region identifier; the caller has to fix the input
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    /// Network failure, timeout or unexpected upstream payload
    #[error("Upstream unavailable: {message}")]
    UpstreamUnavailable { message: String },
}

impl ResolveError {
    /// Create a new invalid input error
    pub fn invalid_input<S: Into<String>>(message: S) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Create a new upstream error
    pub fn upstream<S: Into<String>>(message: S) -> Self {
        Self::UpstreamUnavailable {
            message: message.into(),
        }
    }

    /// HTTP status the web layer answers with
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            ResolveError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
            ResolveError::UpstreamUnavailable { .. } => StatusCode::BAD_GATEWAY,
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            ResolveError::InvalidInput { message } => format!("Invalid input: {message}"),
            ResolveError::UpstreamUnavailable { .. } => {
                "Weather service is temporarily unavailable. Please try again later.".to_string()
            }
        }
    }
}

/// Main error type for the `BelWeather` application
#[derive(Error, Debug)]
pub enum BelWeatherError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Socket and other I/O errors of the web server
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl BelWeatherError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let invalid = ResolveError::invalid_input("unknown region");
        assert!(matches!(invalid, ResolveError::InvalidInput { .. }));

        let upstream = ResolveError::upstream("connection refused");
        assert!(matches!(upstream, ResolveError::UpstreamUnavailable { .. }));

        let config_err = BelWeatherError::config("missing API key");
        assert!(matches!(config_err, BelWeatherError::Config { .. }));
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ResolveError::invalid_input("x").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ResolveError::upstream("x").status_code(),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_user_messages() {
        let invalid = ResolveError::invalid_input("bad coordinates");
        assert!(invalid.user_message().contains("bad coordinates"));

        // upstream details stay in the logs
        let upstream = ResolveError::upstream("HTTP 500 from api.weatherbit.io");
        assert!(!upstream.user_message().contains("500"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: BelWeatherError = io_err.into();
        assert!(matches!(err, BelWeatherError::Io { .. }));
        assert_eq!(err.to_string(), "I/O error: file not found");
    }
}
