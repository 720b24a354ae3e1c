use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlateScanError {
    #[error("Upload error: {0}")]
    Upload(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Failed to decode image: {0}")]
    Decode(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("OCR error: {0}")]
    Ocr(String),

    #[error("OCR unavailable: {0}")]
    OcrUnavailable(String),
}

impl PlateScanError {
    /// Status reported to the client. Everything that goes wrong while
    /// reading a plate is a 500; only malformed validation input is a 400.
    pub fn status(&self) -> StatusCode {
        match self {
            PlateScanError::Validation(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for PlateScanError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(json!({ "error": self.to_string() }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, PlateScanError>;
