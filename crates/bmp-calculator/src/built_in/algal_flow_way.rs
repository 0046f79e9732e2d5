//! Algal flow-way calculator.
//!
//! Practice code `algal_flow_way`, optionally `algal_flow_way.monitored`.
//!
//! # Inputs
//! - `surface_area`: flow-way area (acres), default protocol
//! - `biomass`: harvested dry biomass (grams), monitored protocol
//! - `percent_n`, `percent_p`, `percent_ash_solids`: biomass composition (%)

use crate::Calculator;
use crate::numeric::POUNDS_PER_TON;
use bmp_types::{NonNumeric, PracticeRecord, ReductionResult};

/// Grams-to-pounds factor used by the monitored biomass protocol.
pub const BIOMASS_FACTOR: f64 = 0.0022;

const KEYS: [&str; 3] = ["tn_lbs_reduced", "tp_lbs_reduced", "tss_tons_reduced"];

/// Pounds of a constituent making up `percent` of `grams` of biomass.
pub fn biomass_pounds(grams: f64, percent: f64) -> f64 {
    (grams * (percent / 100.0)) / BIOMASS_FACTOR
}

/// Algal flow-way nutrient removal, by monitored biomass or by surface area.
#[derive(Debug, Default)]
pub struct AlgalFlowWayCalculator;

impl AlgalFlowWayCalculator {
    fn monitored(record: &PracticeRecord) -> ReductionResult {
        // Each pollutant only needs its own pair to be numeric.
        let pounds = |percent_key: &str| -> Result<f64, NonNumeric> {
            Ok(biomass_pounds(record.numeric("biomass")?, record.numeric(percent_key)?))
        };
        ReductionResult::new()
            .with(KEYS[0], pounds("percent_n").unwrap_or(0.0))
            .with(KEYS[1], pounds("percent_p").unwrap_or(0.0))
            .with(KEYS[2], pounds("percent_ash_solids").unwrap_or(0.0) / POUNDS_PER_TON)
    }

    fn by_area(record: &PracticeRecord) -> ReductionResult {
        let Ok(area) = record.numeric("surface_area") else {
            return ReductionResult::zeroed(&KEYS);
        };
        ReductionResult::new()
            .with(KEYS[0], area * 545.0)
            .with(KEYS[1], area * 45.0)
            .with(KEYS[2], (area * 3219.0) / POUNDS_PER_TON)
    }
}

impl Calculator for AlgalFlowWayCalculator {
    fn code(&self) -> &'static str {
        "algal_flow_way"
    }

    fn reduction(&self, record: &PracticeRecord) -> ReductionResult {
        match record.secondary_code() {
            Some("monitored") => Self::monitored(record),
            _ => Self::by_area(record),
        }
    }
}
