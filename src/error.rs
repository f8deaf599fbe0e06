//! Error types for waymark.
//!
//! `WaymarkError` is a closed taxonomy: every call resolves to exactly one
//! terminal outcome, either a [`DataResponse`](crate::types::DataResponse) or
//! one of the variants below. The enum is `Clone` so the response chain can
//! hand a failure to an interceptor while keeping the original around.

use std::sync::Arc;

use thiserror::Error;

use crate::types::DataResponse;

/// All errors the request pipeline can surface.
#[derive(Debug, Clone, Error)]
pub enum WaymarkError {
    /// Serializing a request body or header failed.
    #[error("failed to encode request: {0}")]
    EncodingFailed(String),

    /// The request URL is missing or cannot be extended with the route path.
    #[error("request URL missing or malformed: {0}")]
    InvalidUrl(String),

    /// The transport failed to send the request or read the response.
    /// Wraps the opaque underlying cause.
    #[error("transport failed: {0}")]
    Transport(Arc<dyn std::error::Error + Send + Sync + 'static>),

    /// The response status code fell outside the endpoint's accepted range.
    /// Carries the rejected response so headers and body stay inspectable.
    #[error("unacceptable status code {}", .0.status)]
    UnacceptableStatus(Box<DataResponse>),

    /// The owning client was released while the interceptor chain was in
    /// flight; the pending completion resolves to this instead of leaking.
    #[error("client released while the interceptor chain was in flight")]
    ChainCollapsed,

    /// Decoding a response body into a typed value failed.
    #[error("failed to decode response body: {0}")]
    DecodingFailed(String),

    /// Client construction was given an invalid configuration.
    #[error("invalid configuration: {0}")]
    Configuration(String),
}

impl WaymarkError {
    /// Wrap an arbitrary error as a transport failure.
    pub fn transport<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Transport(Arc::new(error))
    }

    /// The opaque cause wrapped by a [`WaymarkError::Transport`] failure.
    pub fn underlying_error(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        match self {
            Self::Transport(cause) => Some(cause.as_ref()),
            _ => None,
        }
    }

    /// The rejected response carried by an
    /// [`WaymarkError::UnacceptableStatus`] failure.
    pub fn response(&self) -> Option<&DataResponse> {
        match self {
            Self::UnacceptableStatus(response) => Some(response.as_ref()),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for WaymarkError {
    fn from(error: reqwest::Error) -> Self {
        Self::transport(error)
    }
}
