//! Error type shared by every request path.

use reqwest::header::InvalidHeaderValue;
use thiserror::Error;

/// Failure of a single request, as returned to the caller.
///
/// The executor hands back exactly the value produced by the failing attempt;
/// nothing is re-wrapped on the way out.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Raised by reqwest: connect/DNS/timeout, body read, or JSON decode.
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    /// Raised by a transport that is not backed by reqwest.
    #[error("transport failure: {0}")]
    Transport(String),

    /// The request's cancel handle was aborted.
    #[error("request was cancelled")]
    Cancelled,

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid request URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("invalid header value: {0}")]
    InvalidHeader(#[from] InvalidHeaderValue),
}

impl FetchError {
    /// Returns `true` if this error came from an aborted cancel handle.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, FetchError::Cancelled)
    }

    /// Returns `true` if the request never reached the transport.
    pub fn is_preparation(&self) -> bool {
        matches!(
            self,
            FetchError::InvalidUrl { .. } | FetchError::InvalidHeader(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancelled_is_distinguishable() {
        assert!(FetchError::Cancelled.is_cancelled());
        assert!(!FetchError::Transport("refused".into()).is_cancelled());
    }

    #[test]
    fn test_preparation_errors() {
        let err = FetchError::InvalidUrl {
            url: "nope".into(),
            reason: "relative URL without a base".into(),
        };
        assert!(err.is_preparation());
        assert!(!FetchError::Cancelled.is_preparation());
        assert_eq!(
            err.to_string(),
            "invalid request URL 'nope': relative URL without a base"
        );
    }
}
