use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::state::AppState;

#[derive(Debug, Clone, Serialize)]
pub struct HealthData {
    pub status: String,
    pub version: String,
    pub ocr: OcrStatus,
}

#[derive(Debug, Clone, Serialize)]
pub struct OcrStatus {
    pub status: String,
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub engine: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// `GET /health`
///
/// Always 200; an unusable OCR engine shows up in the `ocr` section only.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthData> {
    let ocr = OcrStatus {
        status: if state.ocr.is_available() {
            "available"
        } else {
            "unavailable"
        }
        .to_string(),
        model: state.ocr.config().model.clone(),
        engine: state.ocr.engine_name().map(String::from),
        reason: state.ocr.unavailable_reason().map(String::from),
    };

    Json(HealthData {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        ocr,
    })
}
