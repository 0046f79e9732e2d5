//! Stream-channel building blocks shared by the restoration calculators:
//! bank height ratios, the hyporheic nitrogen box, linear-foot coefficient
//! models and the streambank reporting metrics.

use crate::numeric::{FEET_PER_MILE, POUNDS_PER_TON, SQUARE_FEET_PER_ACRE, safe_div, weighted_sum};
use crate::protocol::has_design_completion;
use bmp_types::{PracticeRecord, ReductionResult};

/// Banks with a height ratio at or above this are not counted as connected.
pub const BANK_HEIGHT_RATIO_LIMIT: f64 = 1.1;
/// Default soil bulk density in the hyporheic zone (lbs/ft³).
pub const HYPORHEIC_BULK_DENSITY: f64 = 125.0;
/// Default and maximum hyporheic box depth (ft).
pub const HYPORHEIC_BOX_DEPTH: f64 = 5.0;
/// Denitrification rate in the hyporheic box (lbs N per ton soil per day).
pub const HYPORHEIC_DENITRIFICATION_RATE: f64 = 0.000195;
const DAYS_PER_YEAR: f64 = 365.0;

/// Per-pollutant coefficients of a linear-foot model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearCoefficients {
    /// lbs TN per unit
    pub tn: f64,
    /// lbs TP per unit
    pub tp: f64,
    /// TSS per unit (lbs or tons, depending on the practice)
    pub tss: f64,
}

/// Interim streambank restoration rates per linear foot.
pub const STREAMBANK_RATES: LinearCoefficients =
    LinearCoefficients { tn: 0.075, tp: 0.068, tss: 248.0 };

/// Sediment lbs per linear foot in the coastal plain.
pub const COASTAL_PLAIN_TSS: f64 = 15.13;
/// Sediment lbs per linear foot outside the coastal plain.
pub const NONCOASTAL_PLAIN_TSS: f64 = 44.88;

/// Bank height over bankfull height. A zero bank height gives `0.0`; a
/// positive bank height over a zero bankfull height gives infinity, so that
/// bank never counts as connected.
pub fn bank_height_ratio(bank_height: f64, bankfull_height: f64) -> f64 {
    if bank_height == 0.0 {
        return 0.0;
    }
    safe_div(bank_height, bankfull_height).unwrap_or(f64::INFINITY)
}

/// Lengths of each bank with improved floodplain connectivity, kept only when
/// the bank's height ratio is under [`BANK_HEIGHT_RATIO_LIMIT`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ConnectedBanks {
    /// Left bank length (ft)
    pub left: f64,
    /// Right bank length (ft)
    pub right: f64,
    /// Stream width at mean base flow (ft)
    pub stream_width: f64,
}

impl ConnectedBanks {
    /// Read bank geometry from a record.
    pub fn from_record(record: &PracticeRecord) -> Self {
        let bank = |height: &str, bankfull: &str, length: &str| {
            let ratio = bank_height_ratio(record.number(height), record.number(bankfull));
            if ratio < BANK_HEIGHT_RATIO_LIMIT { record.number(length) } else { 0.0 }
        };
        Self {
            left: bank(
                "project_left_bank_height",
                "left_bank_bankfull_height",
                "length_of_left_bank_with_improved_connectivity",
            ),
            right: bank(
                "project_right_bank_height",
                "right_bank_bankfull_height",
                "length_of_right_bank_with_improved_connectivity",
            ),
            stream_width: record.number("stream_width_at_mean_base_flow"),
        }
    }

    /// Plan area of the hyporheic box: each bank length times half the
    /// stream width plus five feet (ft²).
    pub fn treated_area(&self) -> f64 {
        let reach = self.stream_width / 2.0 + 5.0;
        self.left * reach + self.right * reach
    }

    /// Combined connected bank length (ft).
    pub fn length(&self) -> f64 {
        self.left + self.right
    }
}

/// Annual nitrogen removed by denitrification in a hyporheic box of the given
/// plan area (ft²), depth (ft) and bulk density (lbs/ft³).
pub fn hyporheic_nitrogen(area: f64, depth: f64, bulk_density: f64) -> f64 {
    (area * depth * bulk_density / POUNDS_PER_TON) * HYPORHEIC_DENITRIFICATION_RATE * DAYS_PER_YEAR
}

/// Coastal and non-coastal override lengths (ft).
pub fn override_lengths(record: &PracticeRecord) -> (f64, f64) {
    (
        record.number("override_linear_feet_in_coastal_plain"),
        record.number("override_linear_feet_in_noncoastal_plain"),
    )
}

/// Linear-foot model over the coastal and non-coastal override lengths:
/// N and P at the streambank rate, sediment at the plain-specific rate
/// converted to tons.
pub fn plain_rates(record: &PracticeRecord) -> LinearCoefficients {
    let (coastal, noncoastal) = override_lengths(record);
    LinearCoefficients {
        tn: weighted_sum(&[(coastal, STREAMBANK_RATES.tn), (noncoastal, STREAMBANK_RATES.tn)]),
        tp: weighted_sum(&[(coastal, STREAMBANK_RATES.tp), (noncoastal, STREAMBANK_RATES.tp)]),
        tss: weighted_sum(&[(coastal, COASTAL_PLAIN_TSS), (noncoastal, NONCOASTAL_PLAIN_TSS)])
            / POUNDS_PER_TON,
    }
}

/// `quantity × rates` under the given keys.
pub fn linear_result(quantity: f64, rates: LinearCoefficients, keys: [&str; 3]) -> ReductionResult {
    ReductionResult::new()
        .with(keys[0], quantity * rates.tn)
        .with(keys[1], quantity * rates.tp)
        .with(keys[2], quantity * rates.tss)
}

/// Result keys of the designed-practice calculators.
pub const DESIGNED_KEYS: [&str; 3] = ["tn_lbs_reduced", "tp_lbs_reduced", "tss_tons_reduced"];

/// Values computed outside the engine for a designed practice, read back off
/// the record under [`DESIGNED_KEYS`].
pub fn reported_reductions(record: &PracticeRecord) -> ReductionResult {
    DESIGNED_KEYS.iter().fold(ReductionResult::new(), |acc, key| acc.with(*key, record.number(key)))
}

/// Miles of streambank restored. Without design completion this is the
/// override length; with it, the connected banks plus the reconnected stream
/// length.
pub fn miles_of_streambank_restored(record: &PracticeRecord) -> f64 {
    if !has_design_completion(record) {
        let (coastal, noncoastal) = override_lengths(record);
        return (coastal + noncoastal) / FEET_PER_MILE;
    }
    let banks = ConnectedBanks::from_record(record);
    (banks.length() + record.number("stream_length_reconnected_at_floodplain")) / FEET_PER_MILE
}

/// Acres of streambank restored: hyporheic box area plus reconnected stream
/// length, in acres.
pub fn acres_of_streambank_restored(record: &PracticeRecord) -> f64 {
    let banks = ConnectedBanks::from_record(record);
    (banks.treated_area() + record.number("stream_length_reconnected_at_floodplain"))
        / SQUARE_FEET_PER_ACRE
}

/// Reporting metrics shared by stream restoration and floodplain
/// reconnection.
pub fn streambank_metrics(record: &PracticeRecord) -> ReductionResult {
    ReductionResult::new()
        .with("miles_of_streambank_restored", miles_of_streambank_restored(record))
        .with("acres_of_streambank_restored", acres_of_streambank_restored(record))
        .with(
            "acres_of_floodplain_reconnected",
            record.number("connected_floodplain_surface_area"),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn ratio_edge_cases() {
        assert_eq!(bank_height_ratio(0.0, 0.0), 0.0);
        assert!(bank_height_ratio(2.0, 0.0).is_infinite());
        assert!((bank_height_ratio(2.0, 4.0) - 0.5).abs() < EPS);
    }

    #[test]
    fn tall_banks_are_excluded() {
        let record = PracticeRecord::new()
            .with("project_left_bank_height", 5.0)
            .with("left_bank_bankfull_height", 4.0)
            .with("length_of_left_bank_with_improved_connectivity", 100.0)
            .with("length_of_right_bank_with_improved_connectivity", 200.0)
            .with("stream_width_at_mean_base_flow", 10.0);
        let banks = ConnectedBanks::from_record(&record);
        assert_eq!(banks.left, 0.0);
        assert_eq!(banks.right, 200.0);
        assert!((banks.treated_area() - 2000.0).abs() < EPS);
    }

    #[test]
    fn hyporheic_box_rate() {
        // 2000 ft² × 5 ft × 125 / 2000 = 625 tons; × 0.000195 × 365
        let expected = 625.0 * 0.000195 * 365.0;
        assert!((hyporheic_nitrogen(2000.0, 5.0, 125.0) - expected).abs() < EPS);
    }
}
