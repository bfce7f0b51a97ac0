//! Typed errors and HTTP mapping.

use crate::filter::QueryParamError;
use crate::pagination::PageError;
use crate::repository::RepositoryError;
use crate::response::ResponseError;
use crate::validation::ValidationError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Setup problems: raised while building the service, never per request.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{field} is not a part of {model}")]
    UnknownField { model: &'static str, field: String },
    #[error("config load: {0}")]
    Load(String),
    #[error("database: {0}")]
    Database(String),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("{0}")]
    NotFound(String),
    #[error(transparent)]
    Query(#[from] QueryParamError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Page(#[from] PageError),
    #[error(transparent)]
    Response(#[from] ResponseError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error("{0}")]
    BadRequest(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Query(_)
            | AppError::Validation(_)
            | AppError::Page(_)
            | AppError::Response(_)
            | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Repository(e) => match e {
                RepositoryError::Db(sqlx::Error::RowNotFound) => StatusCode::NOT_FOUND,
                RepositoryError::Db(_) | RepositoryError::Decode(_) => StatusCode::INTERNAL_SERVER_ERROR,
                _ => StatusCode::BAD_REQUEST,
            },
        }
    }
}

/// Error envelope: `{"error": {"code": 404, "message": "..."}}`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: u16,
    pub message: String,
}

impl ErrorBody {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        ErrorBody {
            error: ErrorDetail {
                code: status.as_u16(),
                message: message.into(),
            },
        }
    }
}

/// Render an error envelope with the given status.
pub fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(ErrorBody::new(status, message))).into_response()
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        error_response(status, self.to_string())
    }
}
