use async_trait::async_trait;
use image::DynamicImage;
use serde::Serialize;

use crate::error::Result;

/// Pixel rectangle of a detection in the decoded image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BoundingBox {
    pub left: u32,
    pub top: u32,
    pub width: u32,
    pub height: u32,
}

impl BoundingBox {
    /// Smallest box containing both `self` and `other`.
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        let left = self.left.min(other.left);
        let top = self.top.min(other.top);
        let right = (self.left + self.width).max(other.left + other.width);
        let bottom = (self.top + self.height).max(other.top + other.height);

        BoundingBox {
            left,
            top,
            width: right - left,
            height: bottom - top,
        }
    }
}

/// One recognized text region.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Detection {
    pub text: String,
    pub bbox: Option<BoundingBox>,
    /// Engine confidence in `0.0..=1.0`, when the engine reports one.
    pub confidence: Option<f32>,
}

impl Detection {
    pub fn text_only(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bbox: None,
            confidence: None,
        }
    }
}

/// An OCR engine: decoded image in, ordered detections out.
#[async_trait]
pub trait TextDetector: Send + Sync {
    /// Short engine identifier used in logs and health output.
    fn name(&self) -> &str;

    async fn detect(&self, image: &DynamicImage) -> Result<Vec<Detection>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bbox_union() {
        let a = BoundingBox {
            left: 10,
            top: 20,
            width: 30,
            height: 10,
        };
        let b = BoundingBox {
            left: 50,
            top: 18,
            width: 20,
            height: 15,
        };

        assert_eq!(
            a.union(&b),
            BoundingBox {
                left: 10,
                top: 18,
                width: 60,
                height: 15,
            }
        );
    }

    #[test]
    fn test_text_only_detection() {
        let d = Detection::text_only("KA01");
        assert_eq!(d.text, "KA01");
        assert!(d.bbox.is_none());
        assert!(d.confidence.is_none());
    }
}
