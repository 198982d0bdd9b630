use thiserror::Error;

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Rate limited - please wait before retrying")]
    RateLimited,

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

impl SyncError {
    /// Truncate a response body to avoid logging excessive data
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            body.to_string()
        } else {
            format!("{}... (truncated, {} total bytes)",
                    &body[..MAX_ERROR_BODY_LENGTH],
                    body.len())
        }
    }

    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        let truncated = Self::truncate_body(body);
        match status.as_u16() {
            404 => SyncError::NotFound(truncated),
            429 => SyncError::RateLimited,
            500..=599 => SyncError::ServerError(truncated),
            _ => SyncError::InvalidResponse(format!("Status {}: {}", status, truncated)),
        }
    }

    /// Whether this error is the rate-limit signal.
    /// Used as the default retry classifier in `SyncCache::read`.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, SyncError::RateLimited)
    }
}

impl From<reqwest::Error> for SyncError {
    fn from(err: reqwest::Error) -> Self {
        SyncError::NetworkError(err.to_string())
    }
}

impl From<serde_json::Error> for SyncError {
    fn from(err: serde_json::Error) -> Self {
        SyncError::InvalidResponse(err.to_string())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_from_status_rate_limited() {
        let err = SyncError::from_status(StatusCode::TOO_MANY_REQUESTS, "slow down");
        assert!(err.is_rate_limited());
    }

    #[test]
    fn test_from_status_not_found() {
        let err = SyncError::from_status(StatusCode::NOT_FOUND, "no such product");
        assert!(matches!(err, SyncError::NotFound(ref body) if body == "no such product"));
        assert!(!err.is_rate_limited());
    }

    #[test]
    fn test_from_status_server_error_range() {
        for code in [500u16, 502, 503, 599] {
            let status = StatusCode::from_u16(code).unwrap();
            let err = SyncError::from_status(status, "oops");
            assert!(matches!(err, SyncError::ServerError(_)), "status {}", code);
        }
    }

    #[test]
    fn test_from_status_unexpected_code() {
        let err = SyncError::from_status(StatusCode::IM_A_TEAPOT, "short and stout");
        assert!(matches!(err, SyncError::InvalidResponse(_)));
    }

    #[test]
    fn test_truncate_long_body() {
        let body = "x".repeat(2000);
        let err = SyncError::from_status(StatusCode::INTERNAL_SERVER_ERROR, &body);
        let msg = err.to_string();
        assert!(msg.contains("truncated, 2000 total bytes"));
        assert!(msg.len() < body.len());
    }
}
