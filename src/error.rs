use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("Invalid URL {input:?}: {source}")]
    InvalidUrl {
        input: String,
        #[source]
        source: url::ParseError,
    },
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Backend error {code}: {msg}")]
    Backend { code: i64, msg: String },
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Coarse classification of an [`ApiError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Timeout,
    Connect,
    Status(StatusCode),
    Decode,
    Backend,
    Invalid,
    Other,
}

impl ApiError {
    pub fn kind(&self) -> FailureKind {
        match self {
            ApiError::Http(e) if e.is_timeout() => FailureKind::Timeout,
            ApiError::Http(e) => {
                if let Some(status) = e.status() {
                    FailureKind::Status(status)
                } else if e.is_connect() {
                    FailureKind::Connect
                } else if e.is_decode() {
                    FailureKind::Decode
                } else {
                    FailureKind::Other
                }
            }
            ApiError::Json(_) => FailureKind::Decode,
            ApiError::Backend { .. } => FailureKind::Backend,
            ApiError::InvalidUrl { .. } | ApiError::Config(_) | ApiError::InvalidInput(_) => {
                FailureKind::Invalid
            }
        }
    }

    pub fn is_timeout(&self) -> bool {
        self.kind() == FailureKind::Timeout
    }

    /// HTTP status of a rejected non-2xx response, if that is what failed.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Http(e) => e.status(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_error_kind() {
        let err = ApiError::Backend {
            code: 404,
            msg: "not found".to_string(),
        };

        assert_eq!(err.kind(), FailureKind::Backend);
        assert!(err.status().is_none());
        assert!(!err.is_timeout());
        assert_eq!(err.to_string(), "Backend error 404: not found");
    }

    #[test]
    fn test_config_error_is_invalid() {
        let err = ApiError::Config("bad timeout".to_string());
        assert_eq!(err.kind(), FailureKind::Invalid);
    }

    #[test]
    fn test_json_error_is_decode() {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = ApiError::from(source);
        assert_eq!(err.kind(), FailureKind::Decode);
    }

    #[test]
    fn test_invalid_url_message_names_input() {
        let source = url::Url::parse("http://[::1").unwrap_err();
        let err = ApiError::InvalidUrl {
            input: "http://[::1".to_string(),
            source,
        };

        assert!(err.to_string().contains("http://[::1"));
        assert_eq!(err.kind(), FailureKind::Invalid);
    }
}
