use std::path::PathBuf;
use thiserror::Error;
use crate::api::FieldError;

/// Failure of a single call to the REST API.
///
/// Kept `Clone` so it can ride inside `Message` variants back into `update`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("Unexpected response from server: {0}")]
    Decode(String),
    #[error("{message}")]
    Rejected {
        message: String,
        errors: Vec<FieldError>,
    },
    #[error("Server response did not contain any data.")]
    MissingData,
    #[error("Invalid API URL: {0}")]
    InvalidUrl(String),
}

impl ApiError {
    /// Per-field errors reported by the server, empty for every other kind.
    pub fn field_errors(&self) -> &[FieldError] {
        match self {
            ApiError::Rejected { errors, .. } => errors,
            _ => &[],
        }
    }

    /// Text for a toast. Falls back to a generic sentence when the server sent nothing useful.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Rejected { message, .. } if !message.trim().is_empty() => message.clone(),
            ApiError::Rejected { .. } => "The request was rejected by the server.".to_string(),
            ApiError::Network(_) => "Could not reach the server. Please try again.".to_string(),
            other => other.to_string(),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Network(err.to_string())
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Malformed config file: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Error)]
pub enum TemplateError {
    #[error("Saving the template was cancelled.")]
    Cancelled,
    #[error("Could not write {path}: {reason}")]
    Write { path: PathBuf, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejected_without_message_uses_generic_text() {
        let err = ApiError::Rejected { message: "  ".into(), errors: vec![] };
        assert_eq!(err.user_message(), "The request was rejected by the server.");
    }

    #[test]
    fn field_errors_only_for_rejections() {
        let err = ApiError::Rejected {
            message: "Validation failed".into(),
            errors: vec![FieldError { field: "email".into(), message: "taken".into() }],
        };
        assert_eq!(err.field_errors().len(), 1);
        assert!(ApiError::MissingData.field_errors().is_empty());
    }
}
