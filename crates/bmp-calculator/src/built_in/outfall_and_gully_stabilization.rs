//! Outfall and gully stabilization calculator.
//!
//! # Inputs
//! - `total_prevented_sediment`: sediment prevented over the 30-year design life (lbs)

use crate::Calculator;
use bmp_types::{PracticeRecord, ReductionResult};

/// Design life the prevented sediment is spread over (years).
pub const DESIGN_LIFE_YEARS: f64 = 30.0;
/// Credited share of the prevented sediment.
pub const CREDIT_FACTOR: f64 = 0.5;

/// Outfall and gully stabilization from prevented sediment.
#[derive(Debug, Default)]
pub struct OutfallAndGullyStabilizationCalculator;

impl Calculator for OutfallAndGullyStabilizationCalculator {
    fn code(&self) -> &'static str {
        "outfall_and_gully_stabilization"
    }

    fn reduction(&self, record: &PracticeRecord) -> ReductionResult {
        let prevented = record.numeric("total_prevented_sediment").unwrap_or(0.0);
        ReductionResult::new().with("tss_lbs_reduced", CREDIT_FACTOR * (prevented / DESIGN_LIFE_YEARS))
    }
}
