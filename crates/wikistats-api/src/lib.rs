use axum::extract::rejection::{PathRejection, QueryRejection};
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;
use wikistats_storage::{NgramKind, StorageError};

// -------------------------
// Response envelope
// -------------------------

/// Wrapper for list responses: `{"success": true, "data": [...], "total": n}`.
///
/// `query`, `pagina_id` and `type` echo the request and are omitted when unset.
#[derive(Debug, Clone, Serialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub data: Vec<T>,
    pub total: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagina_id: Option<i64>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<NgramKind>,
}

impl<T> Envelope<T> {
    pub fn new(data: Vec<T>) -> Self {
        Self {
            success: true,
            total: data.len(),
            data,
            query: None,
            pagina_id: None,
            kind: None,
        }
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    pub fn with_pagina_id(mut self, id: i64) -> Self {
        self.pagina_id = Some(id);
        self
    }

    pub fn with_kind(mut self, kind: NgramKind) -> Self {
        self.kind = Some(kind);
        self
    }
}

impl<T: Serialize> IntoResponse for Envelope<T> {
    fn into_response(self) -> Response {
        axum::Json(self).into_response()
    }
}

/// Body of every error response.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ErrorBody {
    pub success: bool,
    pub error: String,
}

// -------------------------
// Errors
// -------------------------

/// High-level API errors mapped to HTTP responses
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }
    pub fn service_unavailable(msg: impl Into<String>) -> Self {
        Self::ServiceUnavailable(msg.into())
    }
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// A required query parameter was missing or blank.
    pub fn missing_param(name: &str) -> Self {
        Self::BadRequest(format!("the \"{name}\" parameter is required"))
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message exposed to clients. Server-side details stay in the logs.
    pub fn public_message(&self) -> String {
        match self {
            ApiError::BadRequest(msg) | ApiError::NotFound(msg) => msg.clone(),
            ApiError::ServiceUnavailable(_) => "database unavailable".to_string(),
            ApiError::Internal(_) => "internal server error".to_string(),
        }
    }

    pub fn to_body(&self) -> ErrorBody {
        ErrorBody {
            success: false,
            error: self.public_message(),
        }
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::InvalidQuery { message } => ApiError::BadRequest(message),
            StorageError::Connection { message } => ApiError::ServiceUnavailable(message),
            StorageError::Query { message } | StorageError::Internal { message } => {
                ApiError::Internal(message)
            }
        }
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        match &self {
            ApiError::Internal(detail) => tracing::error!(error = %detail, "request failed"),
            ApiError::ServiceUnavailable(detail) => {
                tracing::warn!(error = %detail, "storage unavailable")
            }
            _ => tracing::debug!(status = status.as_u16(), error = %self, "request rejected"),
        }

        let body = serde_json::to_vec(&self.to_body())
            .unwrap_or_else(|_| br#"{"success":false,"error":"serialization failure"}"#.to_vec());

        let mut response = (status, body).into_response();
        response.headers_mut().insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        response
    }
}
