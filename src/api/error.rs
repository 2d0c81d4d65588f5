//! Error-to-HTTP mapping for the API
//!
//! Every failure leaves the service as an [`ErrorResponse`] body. Causes of
//! internal failures are logged here and never returned to the caller.

use crate::api::validation::FieldErrors;
use crate::api::TRANSLATE_PATH;
use crate::services::TranslateError;
use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::error;

/// Fixed error body shape
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub timestamp: DateTime<Utc>,
    pub status: u16,
    pub error: String,
    pub message: String,
    pub path: String,
}

impl ErrorResponse {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            status: status.as_u16(),
            error: status.canonical_reason().unwrap_or("Unknown").to_string(),
            message: message.into(),
            path: TRANSLATE_PATH.to_string(),
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("validation failed: {0}")]
    Validation(FieldErrors),
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error(transparent)]
    Translation(#[from] TranslateError),
}

impl From<FieldErrors> for AppError {
    fn from(errors: FieldErrors) -> Self {
        AppError::Validation(errors)
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Translation(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to show the caller
    fn public_message(&self) -> String {
        match self {
            AppError::Validation(errors) => format!("Invalid input data: {}", errors),
            AppError::BadRequest(message) => message.clone(),
            AppError::Translation(TranslateError::InvalidModelResponse) => {
                "Translation failed: invalid model response".to_string()
            }
            AppError::Translation(_) => "Internal server error".to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::Validation(errors) => error!("Validation error: {}", errors),
            AppError::BadRequest(message) => error!("Invalid argument: {}", message),
            AppError::Translation(e) => error!("Internal error: {}", e),
        }

        let status = self.status();
        (status, Json(ErrorResponse::new(status, self.public_message()))).into_response()
    }
}
