//! Pollutant load-reduction calculators.
//!
//! This crate provides the `Calculator` trait, one implementation per
//! conservation-practice type, the shared numeric helpers those
//! implementations lean on, and the `LoadRateStore` seam used by the
//! segment-weighted protocols.

use bmp_types::{PracticeRecord, ReductionResult};

pub mod built_in;
pub mod curves;
pub mod load_rates;
pub mod numeric;
pub mod pollutant;
pub mod protocol;
pub mod registry;
pub mod urban;

/// A trait for all practice calculators.
///
/// Calculators are stateless and thread-safe. `reduction` never fails:
/// missing or malformed inputs collapse to zero-valued (or, for a few lookup
/// models, empty) results.
pub trait Calculator: Send + Sync {
    /// Primary practice code this calculator answers to.
    fn code(&self) -> &'static str;

    /// Estimated pollutant reductions for one record.
    fn reduction(&self, record: &PracticeRecord) -> ReductionResult;

    /// Reporting metrics (miles restored, acres treated, ...) for one record.
    fn metrics(&self, _record: &PracticeRecord) -> ReductionResult {
        ReductionResult::new()
    }

    /// Values substituted for absent inputs, exposed so form builders can
    /// pre-fill them.
    fn input_defaults(&self) -> PracticeRecord {
        PracticeRecord::new()
    }
}

pub use load_rates::{
    InMemoryLoadRateStore, LoadRate, LoadRateError, LoadRateRow, LoadRateStore, LoadSource,
    NormalizedRates,
};
pub use pollutant::Pollutant;
pub use registry::CalculatorRegistry;
