use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Plate value reported when no format matches.
pub const INVALID_PLATE: &str = "Invalid plate format";

static INVALID_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Z0-9]").expect("static regex"));

// Three letters followed by four digits, e.g. ABC1234.
static FOUR_WHEELED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]{3}\d{4}$").expect("static regex"));

// 123ABC or A123BC.
static TWO_WHEELED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{3}[A-Z]{3}$|^[A-Z]{1}\d{3}[A-Z]{2}$").expect("static regex")
});

/// Which registration formats a caller is willing to accept.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VehicleType {
    #[default]
    Both,
    #[serde(alias = "Four Wheeled")]
    FourWheeled,
    #[serde(alias = "Two Wheeled")]
    TwoWheeled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlateType {
    #[serde(rename = "Four Wheeled")]
    FourWheeled,
    #[serde(rename = "Two Wheeled")]
    TwoWheeled,
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlateMatch {
    pub plate: String,
    #[serde(rename = "type")]
    pub plate_type: PlateType,
}

impl PlateMatch {
    fn invalid() -> Self {
        Self {
            plate: INVALID_PLATE.to_string(),
            plate_type: PlateType::Unknown,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.plate_type != PlateType::Unknown
    }
}

/// Classify `text` as a four- or two-wheeler registration.
///
/// Characters outside `[A-Z0-9]` are removed first; no case folding is
/// applied, so callers pass text that already went through
/// [`clean_text`](super::clean_text).
pub fn validate_plate(text: &str, vehicle_type: VehicleType) -> PlateMatch {
    let plate = INVALID_CHARS.replace_all(text, "");

    let four = || FOUR_WHEELED.is_match(&plate);
    let two = || TWO_WHEELED.is_match(&plate);

    let plate_type = match vehicle_type {
        VehicleType::Both if four() => PlateType::FourWheeled,
        VehicleType::Both if two() => PlateType::TwoWheeled,
        VehicleType::FourWheeled if four() => PlateType::FourWheeled,
        VehicleType::TwoWheeled if two() => PlateType::TwoWheeled,
        _ => return PlateMatch::invalid(),
    };

    PlateMatch {
        plate: plate.into_owned(),
        plate_type,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_four_wheeled() {
        let m = validate_plate("ABC1234", VehicleType::Both);
        assert_eq!(m.plate, "ABC1234");
        assert_eq!(m.plate_type, PlateType::FourWheeled);
    }

    #[test]
    fn test_two_wheeled_variants() {
        assert_eq!(
            validate_plate("123ABC", VehicleType::Both).plate_type,
            PlateType::TwoWheeled
        );
        assert_eq!(
            validate_plate("A123BC", VehicleType::Both).plate_type,
            PlateType::TwoWheeled
        );
    }

    #[test]
    fn test_separators_are_stripped() {
        let m = validate_plate("ABC-1234", VehicleType::FourWheeled);
        assert_eq!(m.plate, "ABC1234");
        assert!(m.is_valid());
    }

    #[test]
    fn test_lowercase_is_not_folded() {
        let m = validate_plate("abc1234", VehicleType::Both);
        assert_eq!(m, PlateMatch::invalid());
    }

    #[test]
    fn test_vehicle_type_restricts_formats() {
        assert!(!validate_plate("123ABC", VehicleType::FourWheeled).is_valid());
        assert!(!validate_plate("ABC1234", VehicleType::TwoWheeled).is_valid());
        assert!(validate_plate("123ABC", VehicleType::TwoWheeled).is_valid());
    }

    #[test]
    fn test_invalid_plate() {
        let m = validate_plate("AB12", VehicleType::Both);
        assert_eq!(m.plate, INVALID_PLATE);
        assert_eq!(m.plate_type, PlateType::Unknown);
    }

    #[test]
    fn test_plate_match_wire_format() {
        let json = serde_json::to_value(validate_plate("123ABC", VehicleType::Both)).unwrap();
        assert_eq!(json, serde_json::json!({"plate": "123ABC", "type": "Two Wheeled"}));
    }

    #[test]
    fn test_vehicle_type_accepts_display_names() {
        let v: VehicleType = serde_json::from_str("\"Four Wheeled\"").unwrap();
        assert_eq!(v, VehicleType::FourWheeled);
        let v: VehicleType = serde_json::from_str("\"two_wheeled\"").unwrap();
        assert_eq!(v, VehicleType::TwoWheeled);
    }
}
