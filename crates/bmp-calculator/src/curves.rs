//! Fifth-degree adjustor curves relating runoff depth treated to percent
//! pollutant removal.
//!
//! Coefficients are listed from the x^5 term down to the constant. Two curve
//! families exist, one per site classification.

use crate::numeric::{floor_mod, polynomial};
use crate::pollutant::Pollutant;
use serde::{Deserialize, Serialize};

/// Lower bound applied to "inches treated" before curve evaluation.
pub const MIN_INCHES_TREATED: f64 = 0.05;
/// Nominal upper bound on "inches treated" used by [`adjust_inches_treated`].
pub const MAX_INCHES_TREATED: f64 = 2.5;

/// Site reduction classification selecting a curve family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Classification {
    /// "Runoff Reduction" practices (infiltration, reuse).
    #[serde(rename = "Runoff Reduction", alias = "rr")]
    RunoffReduction,
    /// "Stormwater Treatment" practices (filtering, settling).
    #[serde(rename = "Stormwater Treatment", alias = "st")]
    StormwaterTreatment,
}

impl Classification {
    /// Accepts either the long label or the short mode token, case-insensitively.
    pub fn parse(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "runoff reduction" | "rr" => Some(Self::RunoffReduction),
            "stormwater treatment" | "st" => Some(Self::StormwaterTreatment),
            _ => None,
        }
    }

    /// Curve coefficients for one pollutant.
    pub const fn coefficients(self, pollutant: Pollutant) -> &'static [f64; 6] {
        match (self, pollutant) {
            (Self::RunoffReduction, Pollutant::Nitrogen) => &RR_TN,
            (Self::RunoffReduction, Pollutant::Phosphorus) => &RR_TP,
            (Self::RunoffReduction, Pollutant::Sediment) => &RR_TSS,
            (Self::StormwaterTreatment, Pollutant::Nitrogen) => &ST_TN,
            (Self::StormwaterTreatment, Pollutant::Phosphorus) => &ST_TP,
            (Self::StormwaterTreatment, Pollutant::Sediment) => &ST_TSS,
        }
    }

    /// Evaluate the curve for `pollutant` at `depth`.
    pub fn evaluate(self, pollutant: Pollutant, depth: f64) -> f64 {
        polynomial(self.coefficients(pollutant), depth)
    }
}

const RR_TN: [f64; 6] = [0.0308, -0.2562, 0.8634, -1.5285, 1.501, -0.013];
const RR_TP: [f64; 6] = [0.0304, -0.2619, 0.9161, -1.6837, 1.7072, -0.0091];
const RR_TSS: [f64; 6] = [0.0326, -0.2806, 0.9816, -1.8039, 1.8292, -0.0098];
const ST_TN: [f64; 6] = [0.0152, -0.1310, 0.4581, -0.8418, 0.8536, -0.0046];
const ST_TP: [f64; 6] = [0.0239, -0.2058, 0.7198, -1.3229, 1.3414, -0.0072];
const ST_TSS: [f64; 6] = [0.0304, -0.2619, 0.9161, -1.6837, 1.7072, -0.0091];

/// Curve value for an optional classification; unknown classification reads
/// as `0.0`.
pub fn adjustor(classification: Option<Classification>, pollutant: Pollutant, depth: f64) -> f64 {
    classification.map_or(0.0, |c| c.evaluate(pollutant, depth))
}

/// Clamp "inches treated" before curve evaluation.
///
/// Values under 0.05 are floored to 0.05. Otherwise the result is
/// `2.5 mod value` (floor modulo), which is not a ceiling: 3.0 maps to 2.5
/// and 1.0 maps to 0.5. The formula is reproduced as published so results
/// match the reference calculator; treat large-value behaviour as suspect.
pub fn adjust_inches_treated(value: f64) -> f64 {
    if value < MIN_INCHES_TREATED {
        return MIN_INCHES_TREATED;
    }
    floor_mod(MAX_INCHES_TREATED, value).unwrap_or(MIN_INCHES_TREATED)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn parses_labels_and_modes() {
        assert_eq!(Classification::parse("Runoff Reduction"), Some(Classification::RunoffReduction));
        assert_eq!(Classification::parse("ST"), Some(Classification::StormwaterTreatment));
        assert_eq!(Classification::parse("bioswale"), None);
    }

    #[test]
    fn curve_at_one_inch_is_coefficient_sum() {
        let expected: f64 = ST_TN.iter().sum();
        let got = Classification::StormwaterTreatment.evaluate(Pollutant::Nitrogen, 1.0);
        assert!((got - expected).abs() < EPS);
    }

    #[test]
    fn unknown_classification_is_zero() {
        assert_eq!(adjustor(None, Pollutant::Sediment, 1.2), 0.0);
    }

    #[test]
    fn inches_treated_clamp_is_literal_modulo() {
        assert!((adjust_inches_treated(0.01) - 0.05).abs() < EPS);
        assert!((adjust_inches_treated(1.0) - 0.5).abs() < EPS);
        assert!((adjust_inches_treated(3.0) - 2.5).abs() < EPS);
        assert!((adjust_inches_treated(2.0) - 0.5).abs() < EPS);
    }
}
