//! Stormwater treatment (`st`) performance curve calculator.
//!
//! # Inputs
//! - `footprint_area`: practice footprint (acres)
//! - `ponding_depth`: surface storage plus media storage (ft)
//! - `impervious_acres`: impervious area draining to the practice
//!
//! # Output
//! `inches_treated` after clamping and the percent removal read off the
//! stormwater-treatment curves.

use crate::Calculator;
use crate::curves::{Classification, adjust_inches_treated};
use crate::numeric::{INCHES_PER_FOOT, safe_div};
use crate::pollutant::Pollutant;
use bmp_types::{NonNumeric, PracticeRecord, ReductionResult};

/// Runoff depth treated per impervious acre, before clamping (inches).
/// `None` when there is no impervious area.
pub fn raw_inches_treated(footprint_area: f64, ponding_depth: f64, impervious_acres: f64) -> Option<f64> {
    let storage = footprint_area * ponding_depth;
    safe_div(storage * INCHES_PER_FOOT, impervious_acres)
}

/// Percent reductions for each pollutant at a clamped depth.
pub fn percent_reductions(classification: Classification, inches_treated: f64) -> ReductionResult {
    Pollutant::ALL.iter().fold(ReductionResult::new(), |acc, p| {
        acc.with(p.key("pct_reduced"), classification.evaluate(*p, inches_treated))
    })
}

/// Percent removal on the stormwater-treatment curve.
#[derive(Debug, Default)]
pub struct StormwaterTreatmentCalculator;

impl StormwaterTreatmentCalculator {
    fn inches(record: &PracticeRecord) -> Result<Option<f64>, NonNumeric> {
        Ok(raw_inches_treated(
            record.numeric("footprint_area")?,
            record.numeric("ponding_depth")?,
            record.numeric("impervious_acres")?,
        ))
    }
}

impl Calculator for StormwaterTreatmentCalculator {
    fn code(&self) -> &'static str {
        "st"
    }

    fn reduction(&self, record: &PracticeRecord) -> ReductionResult {
        match Self::inches(record) {
            Ok(Some(raw)) => {
                let inches = adjust_inches_treated(raw);
                percent_reductions(Classification::StormwaterTreatment, inches)
                    .with("inches_treated", inches)
            }
            _ => ReductionResult::zeroed(&[
                "inches_treated",
                "tn_pct_reduced",
                "tp_pct_reduced",
                "tss_pct_reduced",
            ]),
        }
    }
}
