//! Error type for backend calls and client-side form validation

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Backend answered with a non-success status. `context` is the
    /// user-facing message for the failed operation.
    #[error("{context}")]
    Status {
        context: String,
        status: u16,
        detail: Option<String>,
    },

    #[error("{context}: {source}")]
    Transport {
        context: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{context}: unexpected response ({source})")]
    Decode {
        context: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Cannot read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{0}")]
    InvalidInput(String),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Transport { source, .. } | ApiError::Decode { source, .. } => {
                source.status().map(|s| s.as_u16())
            }
            _ => None,
        }
    }

    /// True when the backend rejected the bearer token itself.
    pub fn is_auth_rejection(&self) -> bool {
        matches!(self.status(), Some(401) | Some(403))
    }

    pub fn detail(&self) -> Option<&str> {
        match self {
            ApiError::Status { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_displays_context_only() {
        let err = ApiError::Status {
            context: "Failed to load videos".to_string(),
            status: 500,
            detail: Some("boom".to_string()),
        };
        assert_eq!(err.to_string(), "Failed to load videos");
        assert_eq!(err.status(), Some(500));
        assert_eq!(err.detail(), Some("boom"));
        assert!(!err.is_auth_rejection());
    }

    #[test]
    fn auth_rejection_covers_401_and_403() {
        for status in [401, 403] {
            let err = ApiError::Status {
                context: "Unauthorized".to_string(),
                status,
                detail: None,
            };
            assert!(err.is_auth_rejection());
        }
        assert!(!ApiError::InvalidInput("x".into()).is_auth_rejection());
    }
}
