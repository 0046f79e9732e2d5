//! Prevented sediment calculator (multi-bank).
//!
//! Each entry of `banks` contributes `density × erosion rate × length ×
//! height` lbs of sediment, and that load times its N and P concentrations.
//! A bank with any non-numeric input is skipped. Totals are credited at 50%.

use crate::Calculator;
use crate::numeric::product;
use bmp_types::{NonNumeric, PracticeRecord, ReductionResult};
use tracing::trace;

/// Credited share of the prevented load.
pub const CREDIT_FACTOR: f64 = 0.5;

/// Prevented loads of one bank in lbs: `(tn, tp, tss)`.
pub fn bank_loads(bank: &PracticeRecord) -> Result<(f64, f64, f64), NonNumeric> {
    let n_concentration = bank.numeric("nitrogen_concentration")?;
    let p_concentration = bank.numeric("phosphorus_concentration")?;
    let tss = product(&[
        bank.numeric("bulk_density_of_soil")?,
        bank.numeric("bank_erosion_rate")?,
        bank.numeric("eroding_bank_length")?,
        bank.numeric("eroding_bank_height")?,
    ]);
    Ok((tss * n_concentration, tss * p_concentration, tss))
}

/// Prevented sediment summed over eroding banks.
#[derive(Debug, Default)]
pub struct PreventedSedimentCalculator;

impl Calculator for PreventedSedimentCalculator {
    fn code(&self) -> &'static str {
        "prevented_sediment"
    }

    fn reduction(&self, record: &PracticeRecord) -> ReductionResult {
        let (tn, tp, tss) = record
            .records("banks")
            .iter()
            .filter_map(|bank| {
                bank_loads(bank).map_err(|err| trace!(%err, "skipping bank")).ok()
            })
            .fold((0.0, 0.0, 0.0), |(n, p, s), (bn, bp, bs)| (n + bn, p + bp, s + bs));
        ReductionResult::new()
            .with("tn_lbs_reduced", tn * CREDIT_FACTOR)
            .with("tp_lbs_reduced", tp * CREDIT_FACTOR)
            .with("tss_lbs_reduced", tss * CREDIT_FACTOR)
    }
}
