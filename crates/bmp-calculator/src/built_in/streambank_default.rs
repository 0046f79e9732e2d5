//! Fallback streambank calculator, registered as `default`.
//!
//! # Inputs
//! - `length_of_streambank`: restored length (ft)

use super::stream::{STREAMBANK_RATES, linear_result};
use crate::Calculator;
use bmp_types::{PracticeRecord, ReductionResult};

/// Interim per-linear-foot streambank rates.
#[derive(Debug, Default)]
pub struct StreambankDefaultCalculator;

impl Calculator for StreambankDefaultCalculator {
    fn code(&self) -> &'static str {
        "default"
    }

    fn reduction(&self, record: &PracticeRecord) -> ReductionResult {
        linear_result(
            record.number("length_of_streambank"),
            STREAMBANK_RATES,
            ["tn_lbs_reduced", "tp_lbs_reduced", "tss_lbs_reduced"],
        )
    }
}
