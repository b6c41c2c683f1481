//! Body mass index calculation and classification.

use serde::{Deserialize, Serialize};

use crate::error::MetricsError;

/// Lower end of the BMI gauge scale.
pub const GAUGE_MIN_BMI: f64 = 15.0;
/// Upper end of the BMI gauge scale.
pub const GAUGE_MAX_BMI: f64 = 40.0;

/// Needle sweep of the gauge, in degrees either side of vertical.
const GAUGE_HALF_SWEEP_DEG: f64 = 70.0;

/// `weight_kg / (height_cm / 100)^2`.
///
/// Both inputs must be positive and finite.
pub fn calculate_bmi(weight_kg: f64, height_cm: f64) -> Result<f64, MetricsError> {
    if !height_cm.is_finite() || height_cm <= 0.0 {
        return Err(MetricsError::NonPositiveHeight(height_cm));
    }
    if !weight_kg.is_finite() || weight_kg <= 0.0 {
        return Err(MetricsError::NonPositiveWeight(weight_kg));
    }
    let height_m = height_cm / 100.0;
    Ok(weight_kg / (height_m * height_m))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BmiCategory {
    Underweight,
    Normal,
    Overweight,
    Obese,
}

impl BmiCategory {
    /// Classify with exclusive upper bounds at 18.5, 25 and 30.
    pub fn from_bmi(bmi: f64) -> Self {
        if bmi < 18.5 {
            BmiCategory::Underweight
        } else if bmi < 25.0 {
            BmiCategory::Normal
        } else if bmi < 30.0 {
            BmiCategory::Overweight
        } else {
            BmiCategory::Obese
        }
    }

    /// Display color of the category.
    pub fn color(self) -> &'static str {
        match self {
            BmiCategory::Underweight => "#3B82F6",
            BmiCategory::Normal => "#22C55E",
            BmiCategory::Overweight => "#F59E0B",
            BmiCategory::Obese => "#EF4444",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            BmiCategory::Underweight => "Underweight",
            BmiCategory::Normal => "Normal",
            BmiCategory::Overweight => "Overweight",
            BmiCategory::Obese => "Obese",
        }
    }
}

impl std::fmt::Display for BmiCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A BMI value with its category and display color. Never stored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BmiResult {
    pub value: f64,
    pub category: BmiCategory,
    pub color: &'static str,
}

impl BmiResult {
    pub fn from_bmi(bmi: f64) -> Self {
        let category = BmiCategory::from_bmi(bmi);
        Self {
            value: bmi,
            category,
            color: category.color(),
        }
    }

    pub fn for_measurements(weight_kg: f64, height_cm: f64) -> Result<Self, MetricsError> {
        calculate_bmi(weight_kg, height_cm).map(Self::from_bmi)
    }
}

/// Health risks shown for a category. Empty for `Normal`.
pub fn health_risks(category: BmiCategory) -> &'static [&'static str] {
    match category {
        BmiCategory::Underweight => &[
            "Nutritional deficiencies",
            "Weakened immune system",
            "Bone density loss",
        ],
        BmiCategory::Normal => &[],
        BmiCategory::Overweight => &[
            "Increased risk of heart disease",
            "Higher blood pressure",
            "Type 2 diabetes risk",
        ],
        BmiCategory::Obese => &[
            "High blood pressure",
            "Heart disease",
            "Type 2 diabetes",
            "Sleep apnea",
            "Joint problems",
        ],
    }
}

/// Position of `bmi` on the 15..40 gauge as 0.0 ..= 100.0.
pub fn bmi_gauge_percent(bmi: f64) -> f64 {
    let clamped = bmi.clamp(GAUGE_MIN_BMI, GAUGE_MAX_BMI);
    (clamped - GAUGE_MIN_BMI) / (GAUGE_MAX_BMI - GAUGE_MIN_BMI) * 100.0
}

/// Needle rotation for `bmi`, -70 ..= +70 degrees.
pub fn bmi_gauge_rotation(bmi: f64) -> f64 {
    bmi_gauge_percent(bmi) / 100.0 * (2.0 * GAUGE_HALF_SWEEP_DEG) - GAUGE_HALF_SWEEP_DEG
}
