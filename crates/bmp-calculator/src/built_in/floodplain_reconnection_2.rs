//! Floodplain reconnection, step 2: baseline and treatable loads.
//!
//! Normalized load rates are averaged over every segment in `segments` that
//! has a row for the source, then scaled by `upstream_miles` for the
//! baseline load and by `treatable_flow_credit` for the treatable load.
//!
//! # Inputs
//! - `segments`: list of geography segment keys
//! - `upstream_miles`: contributing stream length
//! - `treatable_flow_credit`: output of step 1
//! - `source_key`: normalized load source (default `stream_bed_and_bank`)

use crate::Calculator;
use crate::load_rates::{LoadRateStore, NormalizedRates, average_normalized, segment_keys};
use crate::pollutant::Pollutant;
use bmp_types::{NonNumeric, PracticeRecord, ReductionResult};
use std::sync::Arc;
use tracing::trace;

/// Source used when the record names none.
pub const DEFAULT_SOURCE_KEY: &str = "stream_bed_and_bank";

/// Baseline and treatable load per pollutant.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SegmentLoads {
    /// Average normalized rate × upstream miles
    pub baseline: NormalizedRates,
    /// Baseline × treatable flow credit
    pub treatable: NormalizedRates,
}

impl SegmentLoads {
    /// Scale averaged rates. Missing rates give all-zero loads.
    pub fn new(average: Option<NormalizedRates>, upstream_miles: f64, credit: f64) -> Self {
        let baseline = average.unwrap_or_default().scale(upstream_miles);
        Self { baseline, treatable: baseline.scale(credit) }
    }

    fn into_result(self) -> ReductionResult {
        Pollutant::ALL.iter().fold(ReductionResult::new(), |acc, p| {
            acc.with(p.key("load"), self.baseline.get(*p))
                .with(p.key("treatable_load"), self.treatable.get(*p))
        })
    }
}

/// Upstream loads averaged over geography segments, scaled by treatable flow credit.
pub struct SegmentLoadCalculator {
    store: Arc<dyn LoadRateStore>,
    parallel: bool,
}

impl SegmentLoadCalculator {
    pub fn new(store: Arc<dyn LoadRateStore>, parallel: bool) -> Self {
        Self { store, parallel }
    }

    fn loads(&self, record: &PracticeRecord) -> Result<SegmentLoads, NonNumeric> {
        let upstream_miles = record.numeric("upstream_miles")?;
        let credit = record.numeric("treatable_flow_credit")?;
        let segments = segment_keys(record.list("segments"));
        let source = record.text("source_key").unwrap_or(DEFAULT_SOURCE_KEY);
        let average = average_normalized(self.store.as_ref(), &segments, source, self.parallel);
        Ok(SegmentLoads::new(average, upstream_miles, credit))
    }
}

impl std::fmt::Debug for SegmentLoadCalculator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SegmentLoadCalculator").field("parallel", &self.parallel).finish()
    }
}

impl Calculator for SegmentLoadCalculator {
    fn code(&self) -> &'static str {
        "floodplain_reconnection_2"
    }

    fn reduction(&self, record: &PracticeRecord) -> ReductionResult {
        let loads = self.loads(record).unwrap_or_else(|err| {
            trace!(%err, "segment load input rejected");
            SegmentLoads::default()
        });
        loads.into_result()
    }

    fn input_defaults(&self) -> PracticeRecord {
        PracticeRecord::new().with("source_key", DEFAULT_SOURCE_KEY)
    }
}
