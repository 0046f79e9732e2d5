//! Before/after protocol support shared by the floodplain calculators.
//!
//! The protocol compares a `Pre-Project` reading with a `Planning` reading of
//! the same practice. Both must carry a truthy
//! `has_majority_design_completion`; otherwise the protocol contributes zero.

use crate::pollutant::Pollutant;
use crate::urban::UrbanLoadData;
use bmp_types::{MeasurementPeriod, PracticeRecord};

/// Branch flag shared by most protocol-selecting calculators.
pub const DESIGN_COMPLETION: &str = "has_majority_design_completion";
/// Record key listing the practice's historical readings.
pub const READINGS: &str = "readings";

/// Whether the record reports majority design completion.
pub fn has_design_completion(record: &PracticeRecord) -> bool {
    record.flag(DESIGN_COMPLETION)
}

/// Whether the record describes pre-installation conditions, either through
/// an explicit `preinstallation` flag or a `Pre-Project` period tag.
pub fn is_preinstallation(record: &PracticeRecord) -> bool {
    record.flag("preinstallation")
        || record.measurement_period() == Some(MeasurementPeriod::PreProject)
}

/// The pre-project and planning readings used by the comparison.
#[derive(Debug, Clone, PartialEq)]
pub struct BeforeAfter {
    /// Baseline reading
    pub before: PracticeRecord,
    /// Designed reading
    pub after: PracticeRecord,
}

impl BeforeAfter {
    /// Pick the qualifying readings. When several readings qualify for the
    /// same period the last one wins.
    pub fn select(readings: &[PracticeRecord]) -> Option<Self> {
        let pick = |period: MeasurementPeriod| {
            readings
                .iter()
                .rev()
                .find(|r| r.measurement_period() == Some(period) && has_design_completion(r))
                .cloned()
        };
        Some(Self {
            before: pick(MeasurementPeriod::PreProject)?,
            after: pick(MeasurementPeriod::Planning)?,
        })
    }

    /// Select from the `readings` list on a record.
    pub fn from_record(record: &PracticeRecord) -> Option<Self> {
        Self::select(&record.records(READINGS))
    }

    /// Change in the fraction of runoff treated by the floodplain.
    pub fn fraction_gain(&self) -> f64 {
        runoff_fraction(&self.after) - runoff_fraction(&self.before)
    }

    /// `gain × efficiency × (area × impervious UAL + area × pervious UAL)`
    /// where the area is the planning reading's `watershed_impervious_area`.
    /// Zero when the load table lacks either cover class for the pollutant.
    pub fn reduction(&self, efficiency: f64, loads: &UrbanLoadData<'_>, pollutant: Pollutant) -> f64 {
        let Some((impervious, pervious)) = loads.pair(pollutant) else {
            return 0.0;
        };
        let area = self.after.number("watershed_impervious_area");
        self.fraction_gain() * efficiency * (area * impervious + area * pervious)
    }
}

/// Quadratic response surface for the fraction of runoff a reconnected
/// floodplain treats, from the rainfall depth at which connection occurs and
/// the floodplain connection volume. Zero when either input is zero.
pub fn fraction_of_runoff_treated(fraction_in_channel: f64, fraction_runoff_treated: f64) -> f64 {
    if fraction_in_channel == 0.0 || fraction_runoff_treated == 0.0 {
        return 0.0;
    }
    let fic = fraction_in_channel;
    let frt = fraction_runoff_treated;
    (fic.powi(2) + 0.3 * fic - 0.98) * frt.powi(2) + (-2.35 * fic + 2.0) * frt
}

fn runoff_fraction(reading: &PracticeRecord) -> f64 {
    fraction_of_runoff_treated(
        reading.number("rainfall_depth_where_connection_occurs"),
        reading.number("floodplain_connection_volume"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(period: &str, depth: f64, volume: f64) -> PracticeRecord {
        PracticeRecord::new()
            .with("measurement_period", period)
            .with(DESIGN_COMPLETION, true)
            .with("rainfall_depth_where_connection_occurs", depth)
            .with("floodplain_connection_volume", volume)
    }

    #[test]
    fn requires_both_periods() {
        assert!(BeforeAfter::select(&[reading("Pre-Project", 1.0, 0.5)]).is_none());
        let pair = BeforeAfter::select(&[
            reading("Pre-Project", 1.0, 0.5),
            reading("Planning", 0.5, 0.5),
        ]);
        assert!(pair.is_some());
    }

    #[test]
    fn ignores_readings_without_design_completion() {
        let mut planning = reading("Planning", 0.5, 0.5);
        planning.insert(DESIGN_COMPLETION, false);
        assert!(BeforeAfter::select(&[reading("Pre-Project", 1.0, 0.5), planning]).is_none());
    }

    #[test]
    fn last_qualifying_reading_wins() {
        let pair = BeforeAfter::select(&[
            reading("Planning", 0.1, 0.1),
            reading("Pre-Project", 1.0, 0.5),
            reading("Planning", 0.5, 0.5),
        ])
        .unwrap();
        assert_eq!(pair.after.number("rainfall_depth_where_connection_occurs"), 0.5);
    }

    #[test]
    fn response_surface_values() {
        assert_eq!(fraction_of_runoff_treated(0.0, 0.5), 0.0);
        // (1 + 0.3 - 0.98) * 0.25 + (-2.35 + 2) * 0.5 = 0.08 - 0.175
        assert!((fraction_of_runoff_treated(1.0, 0.5) - (-0.095)).abs() < 1e-12);
    }
}
