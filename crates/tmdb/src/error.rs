use reqwest::StatusCode;

/// Errors from the TMDB gateway.
#[derive(Debug, thiserror::Error)]
pub enum TmdbError {
    /// The attempt did not complete within the configured timeout.
    #[error("TMDB request timed out")]
    Timeout,

    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("TMDB request failed: {0}")]
    Request(#[source] reqwest::Error),

    /// TMDB returned a non-2xx status code.
    #[error("TMDB returned HTTP {status}: {message}")]
    Api {
        status: u16,
        /// TMDB's `status_message`, or the raw body when absent.
        message: String,
    },

    /// The response body did not match the expected shape.
    #[error("Failed to decode TMDB response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for TmdbError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TmdbError::Timeout
        } else if err.is_decode() {
            TmdbError::Decode(err.to_string())
        } else {
            TmdbError::Request(err)
        }
    }
}

impl TmdbError {
    /// Timeouts, connection failures, 429 and 5xx are worth another attempt.
    pub fn is_retryable(&self) -> bool {
        match self {
            TmdbError::Timeout => true,
            TmdbError::Request(err) => err.is_connect() || err.is_request(),
            TmdbError::Api { status, .. } => {
                *status == StatusCode::TOO_MANY_REQUESTS.as_u16() || *status >= 500
            }
            TmdbError::Decode(_) => false,
        }
    }

    /// Upstream status for `Api` errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            TmdbError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api(status: u16) -> TmdbError {
        TmdbError::Api {
            status,
            message: "x".to_string(),
        }
    }

    #[test]
    fn transient_statuses_are_retryable() {
        assert!(api(429).is_retryable());
        assert!(api(500).is_retryable());
        assert!(api(503).is_retryable());
        assert!(TmdbError::Timeout.is_retryable());
    }

    #[test]
    fn client_errors_are_final() {
        assert!(!api(401).is_retryable());
        assert!(!api(404).is_retryable());
        assert!(!TmdbError::Decode("bad".to_string()).is_retryable());
    }

    #[test]
    fn display_carries_status_message() {
        let err = TmdbError::Api {
            status: 401,
            message: "Invalid API key: You must be granted a valid key.".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "TMDB returned HTTP 401: Invalid API key: You must be granted a valid key."
        );
        assert_eq!(err.status(), Some(401));
    }
}
