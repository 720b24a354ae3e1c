use std::sync::LazyLock;

use regex::Regex;

use crate::ocr::Detection;

static NON_PLATE_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Z0-9]").expect("static regex"));

/// Uppercase `text` and drop everything outside `[A-Z0-9]`.
///
/// Uppercasing happens first, so `"ß"` becomes `"SS"` and survives while
/// letters that uppercase to non-ASCII are removed.
pub fn clean_text(text: &str) -> String {
    NON_PLATE_CHARS
        .replace_all(&text.to_uppercase(), "")
        .into_owned()
}

/// Clean every detection, keeping the engine's order and one entry per detection.
pub fn clean_detections(detections: &[Detection]) -> Vec<String> {
    detections.iter().map(|d| clean_text(&d.text)).collect()
}
