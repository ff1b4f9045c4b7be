//! Adapter error types

use thiserror::Error;

/// Result type for adapter calls
pub type ClientResult<T> = std::result::Result<T, ClientError>;

/// Failures talking to an external service
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request never produced a usable response
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The service answered with an unexpected status
    #[error("{service} returned HTTP {status}")]
    Status {
        /// Service that answered
        service: &'static str,
        /// HTTP status
        status: u16,
    },

    /// The response body did not match the service contract
    #[error("Unexpected {service} response: {detail}")]
    Shape {
        /// Service that answered
        service: &'static str,
        /// What did not match
        detail: String,
    },

    /// A field could not be parsed
    #[error("Invalid due date {value:?}: {source}")]
    Decode {
        /// Raw field value
        value: String,
        /// Underlying error
        #[source]
        source: chrono::ParseError,
    },

    /// The configured API root cannot be turned into request URLs
    #[error("Invalid base URL {url:?}: {detail}")]
    BaseUrl {
        /// Configured value
        url: String,
        /// Why it was rejected
        detail: String,
    },
}

impl ClientError {
    /// Whether the failure happened below HTTP
    pub fn is_transport(&self) -> bool {
        matches!(self, ClientError::Transport(_))
    }
}
