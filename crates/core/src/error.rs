use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("invalid API base URL: {0}")]
    InvalidBaseUrl(String),
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(reqwest::Error),
    #[error("request to {endpoint} failed: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("request to {endpoint} timed out after {}ms", after.as_millis())]
    Timeout { endpoint: String, after: Duration },
    #[error("{endpoint} returned HTTP {status}: {body}")]
    Status {
        endpoint: String,
        status: u16,
        body: String,
    },
    #[error("failed to decode response from {endpoint} at `{path}`: {message}")]
    Decode {
        endpoint: String,
        path: String,
        message: String,
    },
}

impl CatalogError {
    /// Whether repeating the same request later could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            CatalogError::Transport { .. } | CatalogError::Timeout { .. } => true,
            CatalogError::Status { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }
}

pub type CatalogResult<T> = std::result::Result<T, CatalogError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeouts_and_server_errors_are_retryable() {
        let timeout = CatalogError::Timeout {
            endpoint: "/api/v1/hospitals/3".into(),
            after: Duration::from_secs(10),
        };
        assert!(timeout.is_retryable());
        assert!(timeout.to_string().contains("10000ms"));

        let unavailable = CatalogError::Status {
            endpoint: "/api/v1/search".into(),
            status: 503,
            body: String::new(),
        };
        assert!(unavailable.is_retryable());
    }

    #[test]
    fn test_client_errors_are_not_retryable() {
        let not_found = CatalogError::Status {
            endpoint: "/api/v1/hospitals/99".into(),
            status: 404,
            body: "Hospital not found".into(),
        };
        assert!(!not_found.is_retryable());
        assert!(!CatalogError::InvalidInput("limit must be positive".into()).is_retryable());
    }
}
