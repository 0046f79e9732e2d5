//! Instream processing calculator.
//!
//! Designed practices get hyporheic-box denitrification (protocol 2) with a
//! user-supplied box depth, capped at five feet, and soil bulk density.
//! Undesigned practices use the interim per-linear-foot rates.
//!
//! # Inputs
//! - `has_majority_design_completion`
//! - `hyporheic_box_depth` (ft, default 0, max 5)
//! - `bulk_density_of_soil_in_hyporheic_zone` (lbs/ft³, default 125)
//! - bank heights and lengths as for stream restoration
//! - `linear_feet` for the interim rates

use super::stream::{
    ConnectedBanks, DESIGNED_KEYS, HYPORHEIC_BOX_DEPTH, HYPORHEIC_BULK_DENSITY, STREAMBANK_RATES,
    hyporheic_nitrogen, linear_result,
};
use crate::Calculator;
use crate::protocol::has_design_completion;
use bmp_types::{PracticeRecord, ReductionResult};

const BULK_DENSITY_KEY: &str = "bulk_density_of_soil_in_hyporheic_zone";

/// Hyporheic nitrogen using the record's box depth and bulk density.
pub fn nitrogen_protocol_2(record: &PracticeRecord) -> f64 {
    let depth = record.number("hyporheic_box_depth").min(HYPORHEIC_BOX_DEPTH);
    let bulk_density = record.number_or(BULK_DENSITY_KEY, HYPORHEIC_BULK_DENSITY);
    hyporheic_nitrogen(ConnectedBanks::from_record(record).treated_area(), depth, bulk_density)
}

/// Hyporheic denitrification or interim per-foot rates.
#[derive(Debug, Default)]
pub struct InstreamProcessingCalculator;

impl Calculator for InstreamProcessingCalculator {
    fn code(&self) -> &'static str {
        "instream_processing"
    }

    fn reduction(&self, record: &PracticeRecord) -> ReductionResult {
        if has_design_completion(record) {
            return ReductionResult::new().with(DESIGNED_KEYS[0], nitrogen_protocol_2(record));
        }
        linear_result(record.number("linear_feet"), STREAMBANK_RATES, DESIGNED_KEYS)
    }

    fn input_defaults(&self) -> PracticeRecord {
        PracticeRecord::new()
            .with("hyporheic_box_depth", 0.0)
            .with(BULK_DENSITY_KEY, HYPORHEIC_BULK_DENSITY)
    }
}
