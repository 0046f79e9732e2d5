//! Core of the BMP load-reduction engine.
//!
//! This crate wraps the calculator registry in a validating dispatcher,
//! rolls per-period results up into installed-to-date and percent-of-planned
//! totals, and builds per-practice summaries. Calculation itself lives in
//! `bmp-calculator`.

/// Installed-to-date and percent-of-planned aggregation
pub mod aggregation;
/// TOML configuration with environment overrides
pub mod config;
/// Validating dispatcher over the calculator registry
pub mod engine;
/// Caller-visible error types
pub mod error;
/// Per-practice period summaries
pub mod summary;

pub use aggregation::{Accumulation, AggregateTotals, Metric, MetricSet, aggregate};
pub use config::EngineConfig;
pub use engine::BmpEngine;
pub use error::{EngineError, EngineResult};
pub use summary::PracticeSummary;

pub use bmp_calculator::{Calculator, CalculatorRegistry, InMemoryLoadRateStore, LoadRateStore};
pub use bmp_types::{AttrValue, MeasurementPeriod, PracticeCode, PracticeRecord, ReductionResult};
