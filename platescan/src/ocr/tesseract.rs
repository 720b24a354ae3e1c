use std::sync::Arc;

use async_trait::async_trait;
use image::DynamicImage;
use leptess::LepTess;
use tokio::sync::Mutex;

use super::detector::{BoundingBox, Detection, TextDetector};
use super::preprocessing::encode_png;
use crate::error::{PlateScanError, Result};

/// TSV level of word rows.
const TSV_WORD_LEVEL: u32 = 5;

/// Local Tesseract engine. One handle per process, calls are serialized.
#[derive(Clone)]
pub struct TesseractDetector {
    tesseract: Arc<Mutex<LepTess>>,
}

impl TesseractDetector {
    pub fn new(languages: &str) -> Result<Self> {
        let lt = LepTess::new(None, languages)
            .map_err(|e| PlateScanError::Ocr(format!("Tesseract not available: {e}")))?;

        Ok(Self {
            tesseract: Arc::new(Mutex::new(lt)),
        })
    }
}

#[async_trait]
impl TextDetector for TesseractDetector {
    fn name(&self) -> &str {
        "tesseract"
    }

    async fn detect(&self, image: &DynamicImage) -> Result<Vec<Detection>> {
        let png = encode_png(image)?;
        let tesseract = Arc::clone(&self.tesseract);

        let tsv = tokio::task::spawn_blocking(move || {
            let mut lt = tesseract.blocking_lock();
            lt.set_image_from_mem(&png)
                .map_err(|e| PlateScanError::Ocr(format!("Failed to set image: {e}")))?;
            lt.get_tsv_text(0)
                .map_err(|e| PlateScanError::Ocr(format!("Failed to extract text: {e}")))
        })
        .await
        .map_err(|e| PlateScanError::Ocr(format!("OCR task panicked: {e}")))??;

        Ok(parse_tsv_lines(&tsv))
    }
}

struct TsvWord<'a> {
    line_key: (u32, u32, u32, u32),
    bbox: BoundingBox,
    conf: f32,
    text: &'a str,
}

fn parse_word_row(row: &str) -> Option<TsvWord<'_>> {
    let mut cols = row.splitn(12, '\t');
    let mut num = || cols.next()?.trim().parse::<u32>().ok();

    let level = num()?;
    let page = num()?;
    let block = num()?;
    let par = num()?;
    let line = num()?;
    let _word = num()?;
    let bbox = BoundingBox {
        left: num()?,
        top: num()?,
        width: num()?,
        height: num()?,
    };
    let conf = cols.next()?.trim().parse::<f32>().ok()?;
    let text = cols.next().unwrap_or("").trim();

    if level != TSV_WORD_LEVEL || text.is_empty() {
        return None;
    }

    Some(TsvWord {
        line_key: (page, block, par, line),
        bbox,
        conf,
        text,
    })
}

/// Group Tesseract TSV word rows into one detection per text line.
///
/// Lines keep the order Tesseract emits them in. Word boxes are unioned and
/// non-negative word confidences averaged, scaled to `0.0..=1.0`. Header
/// rows and rows of other levels are ignored.
pub fn parse_tsv_lines(tsv: &str) -> Vec<Detection> {
    struct Line {
        key: (u32, u32, u32, u32),
        words: Vec<String>,
        bbox: BoundingBox,
        conf_sum: f32,
        conf_count: u32,
    }

    let mut lines: Vec<Line> = Vec::new();

    for word in tsv.lines().filter_map(parse_word_row) {
        let scored = word.conf >= 0.0;

        match lines.last_mut() {
            Some(line) if line.key == word.line_key => {
                line.words.push(word.text.to_string());
                line.bbox = line.bbox.union(&word.bbox);
                if scored {
                    line.conf_sum += word.conf;
                    line.conf_count += 1;
                }
            }
            _ => lines.push(Line {
                key: word.line_key,
                words: vec![word.text.to_string()],
                bbox: word.bbox,
                conf_sum: if scored { word.conf } else { 0.0 },
                conf_count: u32::from(scored),
            }),
        }
    }

    lines
        .into_iter()
        .map(|line| Detection {
            text: line.words.join(" "),
            bbox: Some(line.bbox),
            confidence: (line.conf_count > 0)
                .then(|| (line.conf_sum / line.conf_count as f32 / 100.0).clamp(0.0, 1.0)),
        })
        .collect()
}
