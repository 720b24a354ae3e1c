//! Plate reading and validation handlers.
//!
//! `POST /process_plate` takes a multipart upload with an `image` field and
//! answers `{"plate_texts": [...]}`. Every failure on the way, from a
//! malformed body to an OCR engine fault, is reported as a 500 with
//! `{"error": "..."}`.

use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::extractors::AppJson;
use crate::api::AppState;
use crate::error::{PlateScanError, Result};
use crate::plate::{self, PlateMatch, VehicleType};

/// Multipart field carrying the image.
pub const IMAGE_FIELD: &str = "image";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlateTextsResponse {
    pub plate_texts: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ValidatePlateRequest {
    pub text: String,
    #[serde(default)]
    pub vehicle_type: VehicleType,
}

/// Pull the bytes of the uploaded `image` file, skipping any other fields.
///
/// Only a file part counts: a plain form value named `image` is ignored.
async fn read_image_field(multipart: &mut Multipart) -> Result<Vec<u8>> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| PlateScanError::Upload(e.body_text()))?
    {
        if field.name() != Some(IMAGE_FIELD) || field.file_name().is_none() {
            continue;
        }

        let bytes = field.bytes().await.map_err(|e| {
            PlateScanError::Upload(format!("Failed to read image: {}", e.body_text()))
        })?;
        return Ok(bytes.to_vec());
    }

    Err(PlateScanError::MissingField(IMAGE_FIELD.to_string()))
}

async fn read_plate_texts(
    state: &AppState,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<Vec<String>> {
    let mut multipart = multipart?;
    let bytes = read_image_field(&mut multipart).await?;

    let detections = state.ocr.recognize(&bytes).await?;
    tracing::debug!(
        detections = detections.len(),
        bytes = bytes.len(),
        "OCR finished"
    );

    Ok(plate::clean_detections(&detections))
}

/// `POST /process_plate`
pub async fn process_plate(
    State(state): State<AppState>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<Json<PlateTextsResponse>> {
    match read_plate_texts(&state, multipart).await {
        Ok(plate_texts) => Ok(Json(PlateTextsResponse { plate_texts })),
        Err(e) => {
            tracing::warn!(error = %e, "Plate processing failed");
            Err(e)
        }
    }
}

/// `POST /validate_plate`
///
/// Classifies a cleaned plate string as a four- or two-wheeler registration.
pub async fn validate_plate(
    AppJson(request): AppJson<ValidatePlateRequest>,
) -> Result<Json<PlateMatch>> {
    Ok(Json(plate::validate_plate(&request.text, request.vehicle_type)))
}
