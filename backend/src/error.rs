use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use thiserror::Error;

/// Failure kinds produced by the connection engine.
///
/// Every variant except `Internal` is an expected outcome of validating a
/// caller's request and is reported back with a stable `kind` string.
#[derive(Debug, Error)]
pub enum ConnectError {
    #[error("Invalid entry, please login again")]
    Unauthorized,

    #[error("{0}")]
    NotFound(String),

    #[error("Invalid status: {0}")]
    InvalidStatus(String),

    #[error("{0}")]
    InvalidOperation(String),

    #[error("{0}")]
    InvalidInput(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    InvalidTransition(String),

    #[error("No connections found")]
    NoConnections,

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

pub type ConnectResult<T> = std::result::Result<T, ConnectError>;

impl ConnectError {
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    pub fn conflict(what: impl Into<String>) -> Self {
        Self::Conflict(what.into())
    }

    pub fn forbidden(what: impl Into<String>) -> Self {
        Self::Forbidden(what.into())
    }

    /// Stable machine-readable kind, independent of the HTTP status.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Unauthorized => "unauthorized",
            Self::NotFound(_) => "not_found",
            Self::InvalidStatus(_) => "invalid_status",
            Self::InvalidOperation(_) => "invalid_operation",
            Self::InvalidInput(_) => "invalid_input",
            Self::Conflict(_) => "conflict",
            Self::Forbidden(_) => "forbidden",
            Self::InvalidTransition(_) => "invalid_transition",
            Self::NoConnections => "no_connections",
            Self::Internal(_) => "internal",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NoConnections => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NotFound(_)
            | Self::InvalidStatus(_)
            | Self::InvalidOperation(_)
            | Self::InvalidInput(_)
            | Self::Conflict(_)
            | Self::InvalidTransition(_) => StatusCode::BAD_REQUEST,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
    pub message: String,
}

impl IntoResponse for ConnectError {
    fn into_response(self) -> Response {
        let message = match &self {
            Self::Internal(e) => {
                tracing::error!("Internal error: {:#}", e);
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        let body = ErrorBody {
            error: self.kind(),
            message,
        };

        (self.status_code(), Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_map_to_distinct_statuses() {
        assert_eq!(ConnectError::Unauthorized.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(ConnectError::forbidden("no").status_code(), StatusCode::FORBIDDEN);
        assert_eq!(ConnectError::NoConnections.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(ConnectError::conflict("dup").status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ConnectError::conflict("dup").kind(), "conflict");
    }

    #[test]
    fn internal_errors_hide_detail() {
        let err = ConnectError::from(anyhow::anyhow!("connection refused on 10.0.0.3"));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
