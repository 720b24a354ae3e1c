use std::sync::Arc;
use std::time::Duration;

use image::DynamicImage;
use tracing::{info, warn};

use crate::config::{parse_ocr_provider_model, OcrConfig};
use crate::error::{PlateScanError, Result};

use super::api::VisionApiDetector;
use super::detector::{Detection, TextDetector};
use super::preprocessing::{decode_image, preprocess_image};
use super::tesseract::TesseractDetector;

#[derive(Clone)]
enum OcrBackend {
    Ready(Arc<dyn TextDetector>),
    Unavailable { reason: String },
}

/// Process-lifetime OCR engine handle shared by every request.
#[derive(Clone)]
pub struct OcrProvider {
    backend: OcrBackend,
    config: Arc<OcrConfig>,
}

impl OcrProvider {
    /// Build the engine named by `config.model`.
    ///
    /// Initialization failures do not abort startup: the provider is
    /// returned in the unavailable state and every request fails instead.
    pub fn new(config: &OcrConfig) -> Result<Self> {
        let (provider, _) = parse_ocr_provider_model(&config.model);

        let backend = if provider == "local" {
            match TesseractDetector::new(&config.languages) {
                Ok(detector) => {
                    info!(languages = %config.languages, "Tesseract OCR initialized");
                    OcrBackend::Ready(Arc::new(detector))
                }
                Err(e) => {
                    let reason = e.to_string();
                    warn!("{}", reason);
                    OcrBackend::Unavailable { reason }
                }
            }
        } else {
            match VisionApiDetector::new(config) {
                Ok(client) => {
                    info!(
                        provider = %provider,
                        base_url = %client.base_url(),
                        "Vision API OCR backend initialized"
                    );
                    OcrBackend::Ready(Arc::new(client))
                }
                Err(e) => {
                    let reason = format!("{provider} OCR backend unavailable: {e}");
                    warn!("{}", reason);
                    OcrBackend::Unavailable { reason }
                }
            }
        };

        Ok(Self {
            backend,
            config: Arc::new(config.clone()),
        })
    }

    /// Wrap an already constructed engine.
    pub fn with_detector(detector: Arc<dyn TextDetector>, config: &OcrConfig) -> Self {
        Self {
            backend: OcrBackend::Ready(detector),
            config: Arc::new(config.clone()),
        }
    }

    pub fn unavailable(reason: impl Into<String>, config: &OcrConfig) -> Self {
        Self {
            backend: OcrBackend::Unavailable {
                reason: reason.into(),
            },
            config: Arc::new(config.clone()),
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self.backend, OcrBackend::Ready(_))
    }

    pub fn unavailable_reason(&self) -> Option<&str> {
        match &self.backend {
            OcrBackend::Unavailable { reason } => Some(reason),
            OcrBackend::Ready(_) => None,
        }
    }

    pub fn engine_name(&self) -> Option<&str> {
        match &self.backend {
            OcrBackend::Ready(detector) => Some(detector.name()),
            OcrBackend::Unavailable { .. } => None,
        }
    }

    pub fn config(&self) -> &OcrConfig {
        &self.config
    }

    /// Run the engine over a decoded image, bounded by the configured timeout.
    pub async fn detect(&self, image: &DynamicImage) -> Result<Vec<Detection>> {
        let detector = match &self.backend {
            OcrBackend::Ready(detector) => detector,
            OcrBackend::Unavailable { reason } => {
                return Err(PlateScanError::OcrUnavailable(reason.clone()))
            }
        };

        let timeout_duration = Duration::from_secs(self.config.timeout_secs);
        match tokio::time::timeout(timeout_duration, detector.detect(image)).await {
            Ok(inner_result) => inner_result,
            Err(_) => Err(PlateScanError::Ocr(format!(
                "OCR operation timed out after {} seconds",
                self.config.timeout_secs
            ))),
        }
    }

    /// Decode uploaded bytes, optionally preprocess, and detect text.
    pub async fn recognize(&self, image_bytes: &[u8]) -> Result<Vec<Detection>> {
        if let OcrBackend::Unavailable { reason } = &self.backend {
            return Err(PlateScanError::OcrUnavailable(reason.clone()));
        }

        let bytes = image_bytes.to_vec();
        let config = Arc::clone(&self.config);

        let image = tokio::task::spawn_blocking(move || {
            let image = decode_image(&bytes)?;
            Ok::<_, PlateScanError>(if config.preprocess {
                preprocess_image(image, &config)
            } else {
                image
            })
        })
        .await
        .map_err(|e| PlateScanError::Internal(format!("Image decode task panicked: {e}")))??;

        self.detect(&image).await
    }
}
