//! Urban unit-area loads (UAL) carried on a record under `load_data`.
//!
//! Shape: `{"impervious": {"tn_ual": .., "tp_ual": .., "tss_ual": ..},
//! "pervious": {..}}`, in pounds (tons for TSS) per acre per year.

use crate::pollutant::Pollutant;
use bmp_types::{AttrValue, PracticeRecord};

/// Record key holding the unit-area load table.
pub const LOAD_DATA_KEY: &str = "load_data";

/// Land cover class of a unit-area load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cover {
    /// Impervious surface
    Impervious,
    /// Pervious surface
    Pervious,
}

impl Cover {
    const fn key(self) -> &'static str {
        match self {
            Self::Impervious => "impervious",
            Self::Pervious => "pervious",
        }
    }
}

/// Borrowed view over a record's `load_data` table.
#[derive(Debug, Clone, Copy)]
pub struct UrbanLoadData<'a> {
    record: &'a PracticeRecord,
}

impl<'a> UrbanLoadData<'a> {
    /// View the `load_data` of `record`. An absent table behaves as empty.
    pub const fn of(record: &'a PracticeRecord) -> Self {
        Self { record }
    }

    /// Unit-area load if it is present and numeric.
    pub fn get(&self, cover: Cover, pollutant: Pollutant) -> Option<f64> {
        self.record
            .object(LOAD_DATA_KEY)?
            .get(cover.key())?
            .as_object()?
            .get(&pollutant.key("ual"))
            .and_then(AttrValue::as_number)
    }

    /// Unit-area load, zero when absent.
    pub fn ual(&self, cover: Cover, pollutant: Pollutant) -> f64 {
        self.get(cover, pollutant).unwrap_or(0.0)
    }

    /// Impervious and pervious loads together, only when both are present.
    pub fn pair(&self, pollutant: Pollutant) -> Option<(f64, f64)> {
        Some((self.get(Cover::Impervious, pollutant)?, self.get(Cover::Pervious, pollutant)?))
    }
}
