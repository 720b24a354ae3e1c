//! OCR (Optical Character Recognition) Module
//!
//! Turns uploaded image bytes into an ordered list of text detections.
//! The recognition itself is delegated to an external engine.
//!
//! # Architecture
//!
//! - [`TextDetector`] is the seam every engine implements
//! - `TesseractDetector` runs Tesseract locally via leptess
//! - `VisionApiDetector` calls an OpenAI-compatible vision API
//! - [`OcrProvider`] owns the engine picked at startup, applies the timeout
//!   and degrades to "unavailable" when the engine cannot be initialized
//!
//! # Configuration
//!
//! Backend selection and limits come from `OcrConfig` (see `config.rs`):
//! - `model`: `local/tesseract` or `<provider>/<model>` for remote APIs
//! - `api_key` / `base_url`: remote API credentials and endpoint
//! - `languages`: Tesseract language codes, `+`-separated
//! - `timeout_secs`: upper bound for a single recognition
//! - `preprocess` / `max_image_dimension`: optional image cleanup

mod api;
mod detector;
mod preprocessing;
mod provider;
mod tesseract;

pub use api::VisionApiDetector;
pub use detector::{BoundingBox, Detection, TextDetector};
pub use preprocessing::{decode_image, encode_png, preprocess_image};
pub use provider::OcrProvider;
pub use tesseract::{parse_tsv_lines, TesseractDetector};
