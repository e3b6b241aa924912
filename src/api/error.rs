use reqwest::StatusCode;
use thiserror::Error;

pub type ApiResult<T> = Result<T, ApiError>;

/// Failure of a single backend call.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid backend base url `{url}`: {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    /// No HTTP response was obtained (connection refused, DNS, broken body stream).
    #[error("request to {path} failed: {source}")]
    Transport {
        path: String,
        #[source]
        source: reqwest::Error,
    },

    /// The backend answered with a non-success status.
    #[error("{path} responded with {status}")]
    Server {
        path: String,
        status: StatusCode,
        message: Option<String>,
    },

    /// A success response whose body did not match the expected shape.
    #[error("failed to decode response from {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

impl ApiError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The backend's own `error` text, when it sent one.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Server { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    /// Text suitable for showing inline: the server message verbatim, else `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        self.server_message().unwrap_or(fallback).to_string()
    }
}
