use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("network failure: {0}")]
    Network(#[from] reqwest::Error),

    #[error("backend returned status {status} for {url}")]
    Status {
        status: reqwest::StatusCode,
        url: String,
    },

    #[error("malformed payload: {0}")]
    MalformedPayload(String),

    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),
}

impl ClientError {
    /// Transport failures and non-2xx statuses are both treated as the
    /// backend being unreachable.
    pub fn is_network(&self) -> bool {
        matches!(self, ClientError::Network(_) | ClientError::Status { .. })
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        ClientError::StorageUnavailable(err.to_string())
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::MalformedPayload(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_errors_become_storage_failures() {
        let err: ClientError = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied").into();
        assert!(matches!(err, ClientError::StorageUnavailable(_)));
        assert!(!err.is_network());
    }

    #[test]
    fn status_errors_count_as_network_failures() {
        let err = ClientError::Status {
            status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
            url: "http://localhost:8000/chat".to_string(),
        };
        assert!(err.is_network());
        assert_eq!(
            err.to_string(),
            "backend returned status 500 Internal Server Error for http://localhost:8000/chat"
        );
    }
}
