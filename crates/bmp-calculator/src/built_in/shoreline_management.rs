//! Shoreline management (living shoreline) calculator.
//!
//! Designed practices are credited through four protocols:
//! 1. prevented sediment from bank erosion (`*_1`);
//! 2. denitrification in planted tidal wetland (`tn_lbs_reduced_2`);
//! 3. sedimentation in planted tidal wetland (`*_3`);
//! 4. marsh uptake at Redfield ratios (`*_4`).
//!
//! Undesigned practices use a per-linear-foot rate keyed by jurisdiction
//! (`state_code`, case-insensitive) from [`STATE_RATES`]. A jurisdiction
//! without rates yields an empty result rather than zeros.
//!
//! Absent or null inputs take the defaults in [`INPUT_DEFAULTS`].

use crate::Calculator;
use crate::numeric::{POUNDS_PER_TON, product};
use crate::pollutant::Pollutant;
use crate::protocol::has_design_completion;
use bmp_types::{PracticeRecord, ReductionResult};

/// Inputs substituted when the record leaves them out.
pub const INPUT_DEFAULTS: [(&str, f64); 7] = [
    ("length_of_living_shoreline", 1000.0),
    ("existing_avg_bank_height", 4.0),
    ("existing_shoreline_recession_rate", 1.0),
    ("soil_bulk_density", 93.6),
    ("sand_reduction_factor", 0.551),
    ("bank_instability_reduction_factor", 1.0),
    ("planted_tidal_wetland_area", 0.25),
];

/// Per-linear-foot rates for undesigned practices, keyed by lowercase state
/// code. Virginia nitrogen is the only sourced coefficient; a state or
/// pollutant without an entry contributes no key.
pub const STATE_RATES: [(&str, Pollutant, f64); 1] = [("va", Pollutant::Nitrogen, 0.01218)];

/// Rate for `state` (case-insensitive, trimmed) and `pollutant`, if sourced.
pub fn state_rate(state: &str, pollutant: Pollutant) -> Option<f64> {
    let state = state.trim().to_ascii_lowercase();
    STATE_RATES
        .iter()
        .find(|(code, p, _)| *code == state && *p == pollutant)
        .map(|(_, _, rate)| *rate)
}

const fn rate_key(pollutant: Pollutant) -> &'static str {
    match pollutant {
        Pollutant::Nitrogen => "tn_lbs_reduced",
        Pollutant::Phosphorus => "tp_lbs_reduced",
        Pollutant::Sediment => "tss_tons_reduced",
    }
}

/// Record view with the input defaults applied.
struct ShorelineInputs<'a>(&'a PracticeRecord);

impl ShorelineInputs<'_> {
    fn get(&self, key: &str) -> f64 {
        let default = INPUT_DEFAULTS
            .iter()
            .find_map(|(k, v)| (*k == key).then_some(*v))
            .unwrap_or(0.0);
        self.0.number_or(key, default)
    }

    fn erosion_terms(&self, with_sand: bool) -> f64 {
        let mut terms = vec![
            self.get("length_of_living_shoreline"),
            self.get("existing_avg_bank_height"),
            self.get("existing_shoreline_recession_rate"),
            self.get("soil_bulk_density"),
        ];
        if with_sand {
            terms.push(self.get("sand_reduction_factor"));
        }
        terms.push(self.get("bank_instability_reduction_factor"));
        product(&terms)
    }
}

/// Protocol 1 coefficients applied to the eroded-soil product.
const PROTOCOL_1_TN: f64 = 0.00029;
const PROTOCOL_1_TP: f64 = 0.000205;

fn designed(inputs: &ShorelineInputs<'_>) -> ReductionResult {
    let area = inputs.get("planted_tidal_wetland_area");
    ReductionResult::new()
        .with("tn_lbs_reduced_1", inputs.erosion_terms(false) * PROTOCOL_1_TN)
        .with("tp_lbs_reduced_1", inputs.erosion_terms(true) * PROTOCOL_1_TP)
        .with("tss_tons_reduced_1", inputs.erosion_terms(true) / POUNDS_PER_TON)
        .with("tn_lbs_reduced_2", 85.0 * area)
        .with("tp_lbs_reduced_3", 5.289 * area)
        .with("tss_tons_reduced_3", 3.4795 * area)
        .with("tn_lbs_reduced_4", 6.83 * area)
        .with("tp_lbs_reduced_4", 0.3 * area)
}

/// Living-shoreline reductions, designed or per linear foot.
#[derive(Debug, Default)]
pub struct ShorelineManagementCalculator;

impl Calculator for ShorelineManagementCalculator {
    fn code(&self) -> &'static str {
        "shoreline_management"
    }

    fn reduction(&self, record: &PracticeRecord) -> ReductionResult {
        let inputs = ShorelineInputs(record);
        if has_design_completion(record) {
            return designed(&inputs);
        }
        let Some(state) = record.text("state_code") else {
            return ReductionResult::new();
        };
        let length = inputs.get("length_of_living_shoreline");
        Pollutant::ALL.iter().fold(ReductionResult::new(), |acc, p| match state_rate(state, *p) {
            Some(rate) => acc.with(rate_key(*p), length * rate),
            None => acc,
        })
    }

    fn input_defaults(&self) -> PracticeRecord {
        INPUT_DEFAULTS.iter().fold(PracticeRecord::new(), |acc, (k, v)| acc.with(*k, *v))
    }
}
