//! eCFR client error types.
//!
//! [`FetchError`] classifies a single failed request. The retrieval layer
//! decides what each class means for a run: transient failures
//! ([`FetchError::is_transient`]) are retried, `NotFound` degrades to "no
//! content" without retry, and everything else is terminal for that fetch.

/// Errors from one eCFR request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    /// The request did not complete within its timeout.
    #[error("request to {endpoint} timed out")]
    Timeout {
        /// Logical endpoint, e.g. `GET /full/2024-01-01/title-3.xml`.
        endpoint: String,
    },
    /// Non-timeout transport failure (DNS, connection refused, reset).
    #[error("HTTP error calling {endpoint}: {reason}")]
    Transport {
        /// Logical endpoint.
        endpoint: String,
        /// Transport error text.
        reason: String,
    },
    /// Upstream returned a 5xx gateway/server failure.
    #[error("{endpoint} returned gateway failure {status}")]
    Gateway {
        /// Logical endpoint.
        endpoint: String,
        /// HTTP status code.
        status: u16,
    },
    /// The resource does not exist (for that date).
    #[error("{endpoint} not found")]
    NotFound {
        /// Logical endpoint.
        endpoint: String,
    },
    /// Any other non-2xx status.
    #[error("{endpoint} returned {status}: {body}")]
    Status {
        /// Logical endpoint.
        endpoint: String,
        /// HTTP status code.
        status: u16,
        /// Response body excerpt.
        body: String,
    },
    /// The response body could not be decoded.
    #[error("failed to decode response from {endpoint}: {reason}")]
    Decode {
        /// Logical endpoint.
        endpoint: String,
        /// Decoder error text.
        reason: String,
    },
}

/// Longest response body excerpt kept in [`FetchError::Status`].
const BODY_EXCERPT_LEN: usize = 512;

impl FetchError {
    /// Whether the failure is worth retrying (timeouts and 5xx).
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Timeout { .. } | Self::Gateway { .. })
    }

    /// The logical endpoint the failure belongs to.
    pub fn endpoint(&self) -> &str {
        match self {
            Self::Timeout { endpoint }
            | Self::Transport { endpoint, .. }
            | Self::Gateway { endpoint, .. }
            | Self::NotFound { endpoint }
            | Self::Status { endpoint, .. }
            | Self::Decode { endpoint, .. } => endpoint,
        }
    }

    /// Classify a transport-level `reqwest` failure.
    pub(crate) fn from_reqwest(endpoint: &str, err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout {
                endpoint: endpoint.to_string(),
            }
        } else {
            Self::Transport {
                endpoint: endpoint.to_string(),
                reason: err.to_string(),
            }
        }
    }

    /// Classify a non-success status.
    pub(crate) fn from_status(endpoint: &str, status: u16, body: &str) -> Self {
        let endpoint = endpoint.to_string();
        match status {
            404 => Self::NotFound { endpoint },
            500..=599 => Self::Gateway { endpoint, status },
            _ => Self::Status {
                endpoint,
                status,
                body: body.chars().take(BODY_EXCERPT_LEN).collect(),
            },
        }
    }
}
