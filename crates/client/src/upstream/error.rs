//! Upstream client error types.

use std::sync::Arc;

/// How the retry loop should treat a failed page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Transient remote or network trouble: back off and try the page again.
    Retryable,
    /// Anything else: abort the whole refresh.
    Fatal,
}

/// Errors from a single request to the upstream messages API.
#[derive(Debug, Clone, thiserror::Error)]
pub enum UpstreamError {
    /// Upstream answered with a non-2xx status.
    #[error("HTTP error: {status}")]
    HttpStatus { status: u16 },

    /// Request timeout.
    #[error("request timeout")]
    Timeout,

    /// Connection or transport failure.
    #[error("network error: {0}")]
    Network(Arc<reqwest::Error>),

    /// Request could not be built or its redirects could not be followed.
    #[error("request error: {0}")]
    Request(Arc<reqwest::Error>),

    /// Response body is not a valid messages page.
    #[error("parse error: {0}")]
    Parse(String),

    /// Configured base URL cannot address the messages endpoint.
    #[error("invalid upstream URL: {0}")]
    InvalidUrl(String),

    /// The HTTP client itself could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(String),
}

impl UpstreamError {
    pub fn class(&self) -> ErrorClass {
        match self {
            UpstreamError::HttpStatus { .. } | UpstreamError::Timeout | UpstreamError::Network(_) => {
                ErrorClass::Retryable
            }
            UpstreamError::Request(_)
            | UpstreamError::Parse(_)
            | UpstreamError::InvalidUrl(_)
            | UpstreamError::ClientBuild(_) => ErrorClass::Fatal,
        }
    }

    pub fn is_retryable(&self) -> bool {
        self.class() == ErrorClass::Retryable
    }

    /// Short label for log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            UpstreamError::HttpStatus { .. } => "http_status",
            UpstreamError::Timeout => "timeout",
            UpstreamError::Network(_) => "network",
            UpstreamError::Request(_) => "request",
            UpstreamError::Parse(_) => "parse",
            UpstreamError::InvalidUrl(_) => "invalid_url",
            UpstreamError::ClientBuild(_) => "client_build",
        }
    }
}

impl From<reqwest::Error> for UpstreamError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            UpstreamError::Timeout
        } else if err.is_builder() || err.is_redirect() {
            UpstreamError::Request(Arc::new(err))
        } else if err.is_decode() {
            UpstreamError::Parse(err.to_string())
        } else if let Some(status) = err.status() {
            UpstreamError::HttpStatus { status: status.as_u16() }
        } else {
            UpstreamError::Network(Arc::new(err))
        }
    }
}

impl From<UpstreamError> for msgsearch_core::Error {
    fn from(err: UpstreamError) -> Self {
        msgsearch_core::Error::RefreshFailed(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        assert_eq!(UpstreamError::HttpStatus { status: 500 }.class(), ErrorClass::Retryable);
        assert_eq!(UpstreamError::HttpStatus { status: 404 }.class(), ErrorClass::Retryable);
        assert_eq!(UpstreamError::Timeout.class(), ErrorClass::Retryable);
        assert_eq!(UpstreamError::Parse("bad json".into()).class(), ErrorClass::Fatal);
        assert_eq!(UpstreamError::InvalidUrl("x".into()).class(), ErrorClass::Fatal);
        assert!(!UpstreamError::ClientBuild("tls".into()).is_retryable());
    }

    #[test]
    fn test_error_display() {
        let err = UpstreamError::HttpStatus { status: 503 };
        assert!(err.to_string().contains("503"));

        let core: msgsearch_core::Error = UpstreamError::Parse("expected object".into()).into();
        assert!(core.to_string().contains("REFRESH_FAILED"));
        assert!(core.to_string().contains("expected object"));
    }
}
