//! Floodplain reconnection calculator.
//!
//! Designed practices report reductions computed elsewhere; the calculator
//! passes `tn_lbs_reduced`, `tp_lbs_reduced` and `tss_tons_reduced` through.
//! Undesigned practices fall back to the coastal/non-coastal linear-foot
//! model.

use super::stream::{DESIGNED_KEYS, plain_rates, reported_reductions, streambank_metrics};
use crate::Calculator;
use crate::protocol::has_design_completion;
use bmp_types::{PracticeRecord, ReductionResult};

/// Floodplain reconnection, pass-through or per linear foot.
#[derive(Debug, Default)]
pub struct FloodplainReconnectionCalculator;

impl Calculator for FloodplainReconnectionCalculator {
    fn code(&self) -> &'static str {
        "floodplain_reconnection"
    }

    fn reduction(&self, record: &PracticeRecord) -> ReductionResult {
        if has_design_completion(record) {
            return reported_reductions(record);
        }
        let linear = plain_rates(record);
        ReductionResult::new()
            .with(DESIGNED_KEYS[0], linear.tn)
            .with(DESIGNED_KEYS[1], linear.tp)
            .with(DESIGNED_KEYS[2], linear.tss)
    }

    fn metrics(&self, record: &PracticeRecord) -> ReductionResult {
        streambank_metrics(record)
    }
}
