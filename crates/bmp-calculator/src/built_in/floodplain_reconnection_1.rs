//! Floodplain reconnection, step 1: treatable flow credit.
//!
//! # Inputs
//! - `existing_treated_discharge`, `existing_total_discharge`
//! - `proposed_treated_discharge`, `proposed_total_discharge`
//!
//! # Output
//! The share of flow treated before and after, and their difference as
//! `treatable_flow_credit`.

use crate::Calculator;
use crate::numeric::safe_div;
use bmp_types::{NonNumeric, PracticeRecord, ReductionResult};

const KEYS: [&str; 3] =
    ["existing_percent_flow_treated", "proposed_percent_flow_treated", "treatable_flow_credit"];

/// Treated share of the total discharge, or `None` for a zero total.
pub fn percent_flow_treated(treated: f64, total: f64) -> Option<f64> {
    safe_div(treated, total)
}

/// Treatable flow credit from existing and proposed discharges.
#[derive(Debug, Default)]
pub struct TreatableFlowCreditCalculator;

impl TreatableFlowCreditCalculator {
    fn shares(record: &PracticeRecord) -> Result<Option<(f64, f64)>, NonNumeric> {
        let existing = percent_flow_treated(
            record.numeric("existing_treated_discharge")?,
            record.numeric("existing_total_discharge")?,
        );
        let proposed = percent_flow_treated(
            record.numeric("proposed_treated_discharge")?,
            record.numeric("proposed_total_discharge")?,
        );
        Ok(existing.zip(proposed))
    }
}

impl Calculator for TreatableFlowCreditCalculator {
    fn code(&self) -> &'static str {
        "floodplain_reconnection_1"
    }

    fn reduction(&self, record: &PracticeRecord) -> ReductionResult {
        match Self::shares(record) {
            Ok(Some((existing, proposed))) => ReductionResult::new()
                .with(KEYS[0], existing)
                .with(KEYS[1], proposed)
                .with(KEYS[2], proposed - existing),
            _ => ReductionResult::zeroed(&KEYS),
        }
    }
}
