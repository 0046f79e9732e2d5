//! Enhanced stream restoration calculator.
//!
//! With majority design completion the reduction combines:
//! - protocol 2, hyporheic denitrification over banks with a height ratio
//!   below 1.1 (`nitrogen.protocol_2`);
//! - protocol 3, the before/after floodplain comparison over `readings`
//!   weighted by the record's urban unit-area loads (`nitrogen.protocol_3`,
//!   `phosphorus.protocol_3`, `sediment`).
//!
//! Without it every protocol reports zero and the coastal/non-coastal
//! linear-foot estimate is returned under `overrides` instead.

use super::stream::{
    ConnectedBanks, HYPORHEIC_BOX_DEPTH, HYPORHEIC_BULK_DENSITY, hyporheic_nitrogen, plain_rates,
    streambank_metrics,
};
use crate::Calculator;
use crate::pollutant::Pollutant;
use crate::protocol::{BeforeAfter, has_design_completion};
use crate::urban::UrbanLoadData;
use bmp_types::{PracticeRecord, ReductionResult};

/// Floodplain treatment efficiency per pollutant.
pub const fn efficiency(pollutant: Pollutant) -> f64 {
    match pollutant {
        Pollutant::Nitrogen => 0.2,
        Pollutant::Phosphorus => 0.3,
        Pollutant::Sediment => 0.2,
    }
}

/// Hyporheic nitrogen with the fixed five-foot box and default bulk density.
pub fn nitrogen_protocol_2(record: &PracticeRecord) -> f64 {
    let banks = ConnectedBanks::from_record(record);
    hyporheic_nitrogen(banks.treated_area(), HYPORHEIC_BOX_DEPTH, HYPORHEIC_BULK_DENSITY)
}

/// Before/after floodplain reduction for one pollutant. Zero unless both a
/// qualifying pre-project and planning reading exist.
pub fn floodplain_protocol(record: &PracticeRecord, pollutant: Pollutant) -> f64 {
    BeforeAfter::from_record(record).map_or(0.0, |pair| {
        pair.reduction(efficiency(pollutant), &UrbanLoadData::of(record), pollutant)
    })
}

fn shaped(protocol_2: f64, nitrogen_3: f64, phosphorus_3: f64, sediment: f64) -> ReductionResult {
    ReductionResult::new()
        .with(
            "nitrogen",
            ReductionResult::new().with("protocol_2", protocol_2).with("protocol_3", nitrogen_3),
        )
        .with("phosphorus", ReductionResult::new().with("protocol_3", phosphorus_3))
        .with("sediment", sediment)
}

/// Enhanced stream restoration by hyporheic and floodplain protocols.
#[derive(Debug, Default)]
pub struct EnhancedStreamRestorationCalculator;

impl Calculator for EnhancedStreamRestorationCalculator {
    fn code(&self) -> &'static str {
        "enhanced_stream_restoration"
    }

    fn reduction(&self, record: &PracticeRecord) -> ReductionResult {
        if has_design_completion(record) {
            return shaped(
                nitrogen_protocol_2(record),
                floodplain_protocol(record, Pollutant::Nitrogen),
                floodplain_protocol(record, Pollutant::Phosphorus),
                floodplain_protocol(record, Pollutant::Sediment),
            );
        }
        let linear = plain_rates(record);
        shaped(0.0, 0.0, 0.0, 0.0).with("overrides", shaped(linear.tn, 0.0, linear.tp, linear.tss))
    }

    fn metrics(&self, record: &PracticeRecord) -> ReductionResult {
        streambank_metrics(record)
    }
}
