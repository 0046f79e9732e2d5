//! Urban stormwater calculator.
//!
//! Each pollutant's load over the drainage area is multiplied by an adjustor
//! read off the site classification's performance curve at the runoff depth
//! treated. Pre-installation records use an adjustor of 1 so they report the
//! untreated load.
//!
//! # Inputs
//! - `site_reduction_classification`: `Runoff Reduction` or `Stormwater Treatment`
//! - `impervious_area`, `total_drainage_area` (ft²)
//! - `runoff_volume_captured` (acre-ft)
//! - `practice_1_extent` .. `practice_4_extent` (acres)
//! - `load_data`: urban unit-area loads
//!
//! # Output
//! `{"nitrogen": {"value", "adjustor"}, "phosphorus": {..}, "sediment": {..}}`

use crate::Calculator;
use crate::curves::{Classification, adjustor};
use crate::numeric::{GALLONS_PER_ACRE_FOOT, INCHES_PER_FOOT, SQUARE_FEET_PER_ACRE};
use crate::pollutant::Pollutant;
use crate::protocol::is_preinstallation;
use crate::urban::{Cover, UrbanLoadData};
use bmp_types::{PracticeRecord, ReductionResult};

/// Practice extent keys summed into installed acres.
pub const PRACTICE_EXTENTS: [&str; 4] =
    ["practice_1_extent", "practice_2_extent", "practice_3_extent", "practice_4_extent"];

/// Runoff depth treated (inches per impervious acre). Defaults to 1.0 unless
/// both the captured volume and the impervious area are non-zero.
pub fn runoff_depth_treated(record: &PracticeRecord) -> f64 {
    let captured = record.number("runoff_volume_captured");
    let impervious = record.number("impervious_area");
    if captured == 0.0 || impervious == 0.0 {
        return 1.0;
    }
    (captured * INCHES_PER_FOOT) / (impervious / SQUARE_FEET_PER_ACRE)
}

/// Rainfall depth corresponding to the treated runoff depth (inches). Zero
/// without impervious area.
pub fn rainfall_depth_treated(record: &PracticeRecord) -> f64 {
    let impervious_acres = record.number("impervious_area") / SQUARE_FEET_PER_ACRE;
    if impervious_acres == 0.0 {
        return 0.0;
    }
    (runoff_depth_treated(record) / impervious_acres) * INCHES_PER_FOOT
}

/// Runoff volume captured implied by the treated depth (acre-ft).
pub fn runoff_volume_captured(record: &PracticeRecord) -> f64 {
    (runoff_depth_treated(record) * record.number("impervious_area"))
        / (INCHES_PER_FOOT * SQUARE_FEET_PER_ACRE)
}

/// Curve adjustor for a pollutant, `1.0` before installation.
pub fn pollutant_adjustor(record: &PracticeRecord, pollutant: Pollutant, preinstallation: bool) -> f64 {
    if preinstallation {
        return 1.0;
    }
    let classification =
        record.text("site_reduction_classification").and_then(Classification::parse);
    adjustor(classification, pollutant, runoff_depth_treated(record))
}

/// Adjusted annual load over the drainage area. Both the impervious and the
/// remaining drainage area are weighted by the impervious unit-area load, as
/// in the published worksheet.
pub fn pollutant_load(record: &PracticeRecord, pollutant: Pollutant, preinstallation: bool) -> ReductionResult {
    let multiplier = pollutant_adjustor(record, pollutant, preinstallation);
    let ual = UrbanLoadData::of(record).ual(Cover::Impervious, pollutant);
    let impervious = record.number("impervious_area");
    let drainage = record.number("total_drainage_area");
    let value = ((impervious * ual) + ((drainage - impervious) * ual)) * multiplier / SQUARE_FEET_PER_ACRE;
    ReductionResult::new().with("value", value).with("adjustor", multiplier)
}

/// Gallons per year detained or infiltrated.
pub fn gallons_detained(record: &PracticeRecord) -> f64 {
    record.number("runoff_volume_captured") * GALLONS_PER_ACRE_FOOT
}

/// Acres draining to the practice.
pub fn acres_protected(record: &PracticeRecord) -> f64 {
    record.number("total_drainage_area") / SQUARE_FEET_PER_ACRE
}

/// Acres of installed practices.
pub fn acres_installed(record: &PracticeRecord) -> f64 {
    PRACTICE_EXTENTS.iter().map(|key| record.number(key)).sum()
}

/// Urban stormwater reductions from the adjustor curves and unit-area loads.
#[derive(Debug, Default)]
pub struct StormwaterCalculator;

impl Calculator for StormwaterCalculator {
    fn code(&self) -> &'static str {
        "stormwater"
    }

    fn reduction(&self, record: &PracticeRecord) -> ReductionResult {
        let preinstallation = is_preinstallation(record);
        Pollutant::ALL.iter().fold(ReductionResult::new(), |acc, p| {
            acc.with(p.name(), pollutant_load(record, *p, preinstallation))
        })
    }

    fn metrics(&self, record: &PracticeRecord) -> ReductionResult {
        ReductionResult::new()
            .with("gallons_per_year_of_stormwater_detained_or_infiltrated", gallons_detained(record))
            .with("acres_of_protected_bmps_to_reduce_stormwater_runoff", acres_protected(record))
            .with("acres_of_installed_bmps_to_reduce_stormwater_runoff", acres_installed(record))
    }
}
