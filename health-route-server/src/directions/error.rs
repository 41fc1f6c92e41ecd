//! Directions client error types.

use std::fmt;

/// Errors from a directions provider.
#[derive(Debug)]
pub enum DirectionsError {
    /// HTTP request failed (network error, timeout, etc.)
    Http(reqwest::Error),

    /// JSON deserialization failed
    Json {
        message: String,
        body: Option<String>,
    },

    /// API returned an error HTTP status code
    ApiError { status: u16, message: String },

    /// API answered with a non-`OK` status in the response body
    ProviderStatus {
        status: String,
        message: Option<String>,
    },

    /// The provider found no route between the endpoints
    NoRoutes,

    /// Rate limited by the API
    RateLimited,

    /// Invalid API key or unauthorized
    Unauthorized,

    /// Mock data could not be loaded
    MockData(String),
}

impl DirectionsError {
    /// Map a non-`OK` body status onto the matching error.
    pub fn from_status(status: &str, message: Option<String>) -> Self {
        match status {
            "ZERO_RESULTS" | "NOT_FOUND" => DirectionsError::NoRoutes,
            "OVER_QUERY_LIMIT" => DirectionsError::RateLimited,
            "REQUEST_DENIED" => DirectionsError::Unauthorized,
            _ => DirectionsError::ProviderStatus {
                status: status.to_string(),
                message,
            },
        }
    }
}

impl fmt::Display for DirectionsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DirectionsError::Http(e) => write!(f, "HTTP error: {e}"),
            DirectionsError::Json { message, body } => {
                write!(f, "JSON parse error: {message}")?;
                if let Some(body) = body {
                    write!(f, " (body: {body})")?;
                }
                Ok(())
            }
            DirectionsError::ApiError { status, message } => {
                write!(f, "API error {status}: {message}")
            }
            DirectionsError::ProviderStatus { status, message } => {
                write!(f, "directions API returned {status}")?;
                if let Some(message) = message {
                    write!(f, ": {message}")?;
                }
                Ok(())
            }
            DirectionsError::NoRoutes => write!(f, "no routes found"),
            DirectionsError::RateLimited => write!(f, "rate limited by directions API"),
            DirectionsError::Unauthorized => write!(f, "unauthorized (invalid API key)"),
            DirectionsError::MockData(msg) => write!(f, "mock directions data: {msg}"),
        }
    }
}

impl std::error::Error for DirectionsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DirectionsError::Http(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for DirectionsError {
    fn from(err: reqwest::Error) -> Self {
        DirectionsError::Http(err)
    }
}
