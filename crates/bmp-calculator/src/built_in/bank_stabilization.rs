//! Bank stabilization calculator (prevented sediment, single bank).
//!
//! The lateral erosion rate (LER) is taken as entered for pre-installation
//! records and halved otherwise, per the expert panel's default 50%
//! efficiency.
//!
//! # Inputs
//! - `installation_length_of_streambank` (ft)
//! - `installation_eroding_bank_height`, `installation_eroding_bank_horizontal_width` (ft)
//! - `installation_lateral_erosion_rate` (ft/yr)
//! - `installation_soil_bulk_density` (lbs/ft³)
//! - `installation_soil_n_content`, `installation_soil_p_content` (lbs/lb)

use crate::Calculator;
use crate::numeric::{FEET_PER_MILE, POUNDS_PER_TON};
use crate::protocol::is_preinstallation;
use bmp_types::{PracticeRecord, ReductionResult};

/// Default efficiency applied to the LER after installation.
pub const INSTALLED_LER_FACTOR: f64 = 0.5;

/// Eroded soil load in lbs/yr.
pub fn eroded_load(record: &PracticeRecord, preinstallation: bool) -> f64 {
    let raw_ler = record.number("installation_lateral_erosion_rate");
    let ler = if preinstallation { raw_ler } else { raw_ler * INSTALLED_LER_FACTOR };
    let height = record.number("installation_eroding_bank_height");
    let width = record.number("installation_eroding_bank_horizontal_width");
    record.number("installation_length_of_streambank")
        * height.hypot(width)
        * ler
        * record.number("installation_soil_bulk_density")
}

/// Prevented sediment and nutrients from a single stabilized bank.
#[derive(Debug, Default)]
pub struct BankStabilizationCalculator;

impl Calculator for BankStabilizationCalculator {
    fn code(&self) -> &'static str {
        "bank_stabilization"
    }

    fn reduction(&self, record: &PracticeRecord) -> ReductionResult {
        let tons = eroded_load(record, is_preinstallation(record)) / POUNDS_PER_TON;
        ReductionResult::new()
            .with("nitrogen", tons * record.number("installation_soil_n_content"))
            .with("phosphorus", tons * record.number("installation_soil_p_content"))
            .with("sediment", tons)
    }

    fn metrics(&self, record: &PracticeRecord) -> ReductionResult {
        ReductionResult::new().with(
            "miles_of_streambank_restored",
            record.number("installation_length_of_streambank") / FEET_PER_MILE,
        )
    }
}
