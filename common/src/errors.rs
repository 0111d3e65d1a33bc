use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, warn};
use utoipa::ToSchema;

/// Generic message returned to callers for anything that is not their fault.
pub const SERVER_ERROR_MESSAGE: &str = "Server error";

/// Coarse failure classes shared by every route group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The caller sent something the gateway or the provider refused.
    InvalidInput,
    /// A third-party service failed, timed out or answered with garbage.
    UpstreamFailure,
    /// Something inside the gateway itself went wrong.
    InternalFailure,
}

impl ErrorKind {
    pub fn status_code(self) -> StatusCode {
        match self {
            ErrorKind::InvalidInput => StatusCode::BAD_REQUEST,
            ErrorKind::UpstreamFailure | ErrorKind::InternalFailure => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

/// Structured error types for the gateway
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Timeout error: {0}")]
    Timeout(String),

    #[error("HTTP error: {status} - {message}")]
    Http { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Unexpected upstream payload: {0}")]
    UnexpectedPayload(String),

    #[error("{0}")]
    Rejected(String),

    #[error("Validation error: {0}")]
    Validation(String),

    /// Path or query values no upstream could answer for, such as `lat=north`.
    #[error("Unusable request: {0}")]
    Unusable(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Credential error: {0}")]
    Credential(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Normalized error envelope
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

impl AppError {
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self::Http {
            status,
            message: message.into(),
        }
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::Timeout(message.into())
    }

    pub fn unexpected_payload(message: impl Into<String>) -> Self {
        Self::UnexpectedPayload(message.into())
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected(message.into())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn unusable(message: impl Into<String>) -> Self {
        Self::Unusable(message.into())
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    pub fn credential(message: impl Into<String>) -> Self {
        Self::Credential(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::Rejected(_) | AppError::Validation(_) => ErrorKind::InvalidInput,
            AppError::Timeout(_)
            | AppError::Http { .. }
            | AppError::Network(_)
            | AppError::Parse(_)
            | AppError::UnexpectedPayload(_)
            | AppError::Unusable(_) => ErrorKind::UpstreamFailure,
            AppError::Config(_) | AppError::Credential(_) | AppError::Internal(_) => {
                ErrorKind::InternalFailure
            }
        }
    }

    /// Text safe to show a caller. Only input errors carry their detail.
    pub fn public_message(&self) -> String {
        match self {
            AppError::Rejected(message) => message.clone(),
            AppError::Validation(_) => self.to_string(),
            _ => SERVER_ERROR_MESSAGE.to_string(),
        }
    }

    /// Record the full error before it is flattened into a response.
    pub fn log(&self) {
        if let AppError::Unusable(_) = self {
            warn!(error = %self, "Request not forwarded upstream");
            return;
        }
        match self.kind() {
            ErrorKind::InvalidInput => warn!(error = %self, "Request rejected"),
            ErrorKind::UpstreamFailure => error!(error = %self, "Upstream call failed"),
            ErrorKind::InternalFailure => error!(error = %self, "Internal failure"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.log();

        let body = Json(ErrorResponse {
            error: self.public_message(),
        });

        (self.kind().status_code(), body).into_response()
    }
}
