//! BMP Types
//!
//! This crate defines the shared data structures used throughout the BMP
//! load-reduction workspace (currently `bmp-calculator`, `bmp-core` and the
//! `bmp` binary). Keeping them here lets calculators and the engine agree on
//! record and result shapes without depending on each other.

#![warn(missing_docs)]

mod period;
mod record;
mod result;
mod value;

pub use period::{MeasurementPeriod, PracticeCode};
pub use record::{NonNumeric, PracticeRecord};
pub use result::ReductionResult;
pub use value::AttrValue;
