//! Floodplain and channel denitrification calculator.
//!
//! # Inputs
//! - `floodplain_sq_ft`, `channel_sq_ft`: reconnected area (ft²)
//! - `brf`, `fhf`, `acrf`: discount factors, multiplied into one denominator

use crate::Calculator;
use crate::numeric::{product, safe_div};
use bmp_types::{NonNumeric, PracticeRecord, ReductionResult};
use tracing::trace;

/// Base nitrogen removal for an area in ft². The `10e-3` factor is 0.01.
pub fn base_tn(square_feet: f64) -> f64 {
    product(&[2.69, 10e-3, square_feet])
}

/// Floodplain and channel denitrification from area and reduction factors.
#[derive(Debug, Default)]
pub struct DenitrificationCalculator;

impl DenitrificationCalculator {
    fn total(record: &PracticeRecord) -> Result<Option<f64>, NonNumeric> {
        let floodplain = record.numeric("floodplain_sq_ft")?;
        let channel = record.numeric("channel_sq_ft")?;
        let denominator =
            product(&[record.numeric("brf")?, record.numeric("fhf")?, record.numeric("acrf")?]);
        Ok(safe_div(base_tn(floodplain), denominator)
            .zip(safe_div(base_tn(channel), denominator))
            .map(|(a, b)| a + b))
    }
}

impl Calculator for DenitrificationCalculator {
    fn code(&self) -> &'static str {
        "denitrification"
    }

    fn reduction(&self, record: &PracticeRecord) -> ReductionResult {
        let total = match Self::total(record) {
            Ok(Some(total)) => total,
            Ok(None) => {
                trace!("denitrification discount factors multiply to zero");
                0.0
            }
            Err(err) => {
                trace!(%err, "denitrification input rejected");
                0.0
            }
        };
        ReductionResult::new().with("tn_lbs_reduced", total)
    }
}
