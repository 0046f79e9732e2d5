//! Outfall stabilization calculator.
//!
//! Designed practices pass their reported reductions through; otherwise the
//! interim per-linear-foot streambank rates apply to `linear_feet`.

use super::stream::{DESIGNED_KEYS, STREAMBANK_RATES, linear_result, reported_reductions};
use crate::Calculator;
use crate::protocol::has_design_completion;
use bmp_types::{PracticeRecord, ReductionResult};

/// Outfall stabilization, reported or per linear foot.
#[derive(Debug, Default)]
pub struct OutfallStabilizationCalculator;

impl Calculator for OutfallStabilizationCalculator {
    fn code(&self) -> &'static str {
        "outfall_stabilization"
    }

    fn reduction(&self, record: &PracticeRecord) -> ReductionResult {
        if has_design_completion(record) {
            return reported_reductions(record);
        }
        linear_result(record.number("linear_feet"), STREAMBANK_RATES, DESIGNED_KEYS)
    }
}
