//! Plate text post-processing.
//!
//! Raw OCR output is reduced to uppercase ASCII letters and digits by
//! [`clean_text`]. [`validate_plate`] classifies an already cleaned string
//! against the known registration formats.

mod clean;
mod format;

pub use clean::{clean_detections, clean_text};
pub use format::{validate_plate, PlateMatch, PlateType, VehicleType, INVALID_PLATE};
