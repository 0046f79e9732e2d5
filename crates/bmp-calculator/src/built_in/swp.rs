//! Stormwater performance standard (`swp`) calculator.
//!
//! Works in two passes over the same record:
//! 1. With `segments` but no `load_sources` list, it returns the load
//!    sources present in those segments so a form can offer them.
//! 2. With `load_sources` present, each entry of `input_groups` is scored:
//!    inches treated → percent removed on the `mode` curve (`rr` or `st`) →
//!    segment-averaged normalized load for the group's `source_key` × percent.
//!
//! Groups that cannot be scored (missing `source_key`, non-numeric sizes,
//! zero impervious acres, unknown mode) are echoed with zero reductions.

use super::st::raw_inches_treated;
use crate::Calculator;
use crate::curves::{Classification, adjust_inches_treated};
use crate::load_rates::{LoadRateStore, average_normalized, segment_keys};
use crate::pollutant::Pollutant;
use bmp_types::{AttrValue, PracticeRecord, ReductionResult};
use std::sync::Arc;
use tracing::trace;

const TOTAL_KEYS: [&str; 3] = ["tn_lbs_reduced", "tp_lbs_reduced", "tss_lbs_reduced"];

/// Why an input group could not be scored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupError {
    /// `source_key` absent or not text
    MissingSource,
    /// `mode` is neither `rr` nor `st`
    InvalidMode,
    /// A size input is not a number or impervious acres is zero
    InvalidInputs,
}

/// Stormwater performance scoring, per practice group or per segment.
pub struct StormwaterPerformanceCalculator {
    store: Arc<dyn LoadRateStore>,
    parallel: bool,
}

impl StormwaterPerformanceCalculator {
    pub fn new(store: Arc<dyn LoadRateStore>, parallel: bool) -> Self {
        Self { store, parallel }
    }

    /// Score one input group, returning the group with `*_pct_reduced` and
    /// `*_lbs_reduced` filled in.
    pub fn score_group(
        &self,
        segments: &[String],
        mode: &str,
        group: &PracticeRecord,
    ) -> Result<PracticeRecord, GroupError> {
        let source = group.text("source_key").ok_or(GroupError::MissingSource)?;
        let classification = match mode {
            "rr" => Classification::RunoffReduction,
            "st" => Classification::StormwaterTreatment,
            _ => return Err(GroupError::InvalidMode),
        };
        let numeric = |key: &str| group.numeric(key).map_err(|_| GroupError::InvalidInputs);
        let raw = raw_inches_treated(
            numeric("footprint_area")?,
            numeric("ponding_depth")?,
            numeric("impervious_acres")?,
        )
        .ok_or(GroupError::InvalidInputs)?;
        let inches = adjust_inches_treated(raw);

        let rates = average_normalized(self.store.as_ref(), segments, source, self.parallel);
        let mut scored = group.clone();
        for pollutant in Pollutant::ALL {
            let percent = classification.evaluate(pollutant, inches);
            let pounds = rates.map_or(0.0, |r| r.get(pollutant) * percent);
            scored.insert(pollutant.key("pct_reduced"), percent);
            scored.insert(pollutant.key("lbs_reduced"), pounds);
        }
        Ok(scored)
    }

    fn unscored(group: &PracticeRecord) -> PracticeRecord {
        Pollutant::ALL.iter().fold(group.clone(), |acc, p| {
            acc.with(p.key("pct_reduced"), 0.0).with(p.key("lbs_reduced"), 0.0)
        })
    }
}

impl std::fmt::Debug for StormwaterPerformanceCalculator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StormwaterPerformanceCalculator").field("parallel", &self.parallel).finish()
    }
}

impl Calculator for StormwaterPerformanceCalculator {
    fn code(&self) -> &'static str {
        "swp"
    }

    fn reduction(&self, record: &PracticeRecord) -> ReductionResult {
        let Some(AttrValue::Array(raw_segments)) = record.get("segments") else {
            return ReductionResult::zeroed(&TOTAL_KEYS);
        };
        let segments = segment_keys(raw_segments);

        if !matches!(record.get("load_sources"), Some(AttrValue::Array(_))) {
            let sources: Vec<AttrValue> = self
                .store
                .load_sources(&segments)
                .into_iter()
                .map(|s| {
                    AttrValue::Object(
                        [("name".to_string(), s.name.into()), ("key".to_string(), s.key.into())]
                            .into_iter()
                            .collect(),
                    )
                })
                .collect();
            return ReductionResult::new().with("load_sources", sources);
        }

        let mode = record.text("mode").unwrap_or("rr");
        let groups: Vec<PracticeRecord> = record
            .records("input_groups")
            .iter()
            .map(|group| {
                self.score_group(&segments, mode, group).unwrap_or_else(|err| {
                    trace!(?err, "input group not scored");
                    Self::unscored(group)
                })
            })
            .collect();

        let mut result = TOTAL_KEYS.iter().fold(ReductionResult::new(), |acc, key| {
            acc.with(*key, groups.iter().map(|g| g.number(key)).sum::<f64>())
        });
        result.insert(
            "input_groups",
            groups.into_iter().map(AttrValue::from).collect::<Vec<_>>(),
        );
        result
    }

    fn input_defaults(&self) -> PracticeRecord {
        PracticeRecord::new().with("mode", "rr")
    }
}
