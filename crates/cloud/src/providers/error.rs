//! Errors raised by provider clients.

use aws_sdk_backup::config::http::HttpResponse;
use aws_sdk_backup::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use infrawatch_health::TransportError;
use thiserror::Error;

/// Service error codes that mean the caller's identity was refused.
const AUTH_ERROR_CODES: &[&str] = &[
    "AccessDenied",
    "AccessDeniedException",
    "ExpiredToken",
    "ExpiredTokenException",
    "InvalidClientTokenId",
    "InvalidSignatureException",
    "UnrecognizedClientException",
];

/// Errors that can occur during cloud provider operations.
#[derive(Error, Debug)]
pub enum CloudProviderError {
    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Resource not found.
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Authentication error.
    #[error("Authentication error: {0}")]
    Auth(String),

    /// The request never produced an HTTP response (timeout, DNS, credentials
    /// resolution).
    #[error("AWS request failed: {0}")]
    Sdk(String),

    /// The service answered with data we cannot use.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Provider kept returning pages past the safety limit.
    #[error("Pagination did not terminate after {0} pages")]
    Pagination(usize),
}

impl CloudProviderError {
    /// Classify an SDK failure by HTTP status and service error code.
    pub(crate) fn from_sdk<E>(err: &SdkError<E, HttpResponse>) -> Self
    where
        E: ProvideErrorMetadata + std::error::Error + 'static,
    {
        let message = DisplayErrorContext(err).to_string();
        let status = err.raw_response().map(|r| r.status().as_u16());
        let code = err.as_service_error().and_then(|e| e.code());

        if matches!(status, Some(401 | 403)) || code.is_some_and(|c| AUTH_ERROR_CODES.contains(&c))
        {
            return Self::Auth(message);
        }
        if status == Some(404) || code == Some("ResourceNotFoundException") {
            return Self::NotFound(message);
        }
        match status {
            Some(status) => Self::Api { status, message },
            None => Self::Sdk(message),
        }
    }
}

impl From<CloudProviderError> for TransportError {
    fn from(err: CloudProviderError) -> Self {
        match err {
            CloudProviderError::Auth(message) => Self::Auth(message),
            other => Self::Fetch(other.to_string()),
        }
    }
}

impl From<url::ParseError> for CloudProviderError {
    fn from(err: url::ParseError) -> Self {
        Self::Config(format!("invalid endpoint URL: {err}"))
    }
}
