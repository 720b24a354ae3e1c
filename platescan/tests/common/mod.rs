#![allow(dead_code)]

// Common test utilities for integration tests
use std::sync::Once;

use async_trait::async_trait;
use image::{DynamicImage, Rgb, RgbImage};
use platescan::error::Result;
use platescan::ocr::{encode_png, Detection, TextDetector};

static INIT: Once = Once::new();

/// Initialize tracing subscriber once for tests
pub fn init_test_logger() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .try_init();
    });
}

/// A small light-gray PNG with nothing on it.
pub fn blank_png() -> Vec<u8> {
    encode_png(&DynamicImage::ImageRgb8(RgbImage::from_pixel(
        64,
        32,
        Rgb([230, 230, 230]),
    )))
    .expect("Failed to encode test PNG")
}

/// Detector returning the same raw texts for every image.
pub struct FixedDetector(pub Vec<&'static str>);

#[async_trait]
impl TextDetector for FixedDetector {
    fn name(&self) -> &str {
        "fixed"
    }

    async fn detect(&self, _image: &DynamicImage) -> Result<Vec<Detection>> {
        Ok(self.0.iter().map(|t| Detection::text_only(*t)).collect())
    }
}

// Re-export commonly used crates for convenience
#[allow(unused_imports)]
pub use serial_test::serial;
#[allow(unused_imports)]
pub use wiremock;
