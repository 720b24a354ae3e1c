pub(crate) mod health;
pub mod plate;

pub use health::health_check;
pub use plate::{process_plate, validate_plate, PlateTextsResponse, ValidatePlateRequest};
