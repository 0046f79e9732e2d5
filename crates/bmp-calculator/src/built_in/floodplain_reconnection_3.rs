//! Floodplain reconnection, step 3: wetland efficiencies.
//!
//! Every wetland efficiency class is applied to the treatable loads from
//! step 2 and the products are summed. The `wetland_restoration`,
//! `wetland_creation` and `wetland_rehab` inputs are validated as numbers but
//! do not weight the sum; the reference worksheet behaves the same way.

use crate::Calculator;
use crate::pollutant::Pollutant;
use bmp_types::{NonNumeric, PracticeRecord, ReductionResult};

/// Wetland treatment class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WetlandClass {
    /// Restoration of a former wetland
    Restoration,
    /// Creation of a new wetland
    Creation,
    /// Rehabilitation of a degraded wetland
    Rehabilitation,
}

impl WetlandClass {
    /// All classes.
    pub const ALL: [Self; 3] = [Self::Restoration, Self::Creation, Self::Rehabilitation];

    /// Removal efficiency of this class for one pollutant.
    pub const fn efficiency(self, pollutant: Pollutant) -> f64 {
        match (self, pollutant) {
            (Self::Restoration, Pollutant::Nitrogen) => 0.42,
            (Self::Restoration, Pollutant::Phosphorus) => 0.4,
            (Self::Restoration, Pollutant::Sediment) => 0.31,
            (Self::Creation, Pollutant::Nitrogen) => 0.3,
            (Self::Creation, Pollutant::Phosphorus) => 0.33,
            (Self::Creation, Pollutant::Sediment) => 0.27,
            (Self::Rehabilitation, Pollutant::Nitrogen) => 0.16,
            (Self::Rehabilitation, Pollutant::Phosphorus) => 0.22,
            (Self::Rehabilitation, Pollutant::Sediment) => 0.19,
        }
    }
}

/// Sum of every class efficiency times the treatable load.
pub fn wetland_reduction(treatable_load: f64, pollutant: Pollutant) -> f64 {
    WetlandClass::ALL.iter().map(|class| class.efficiency(pollutant) * treatable_load).sum()
}

/// Treatable load removed across the floodplain wetland classes.
#[derive(Debug, Default)]
pub struct WetlandEfficiencyCalculator;

impl WetlandEfficiencyCalculator {
    fn treatable_loads(record: &PracticeRecord) -> Result<[f64; 3], NonNumeric> {
        for key in ["wetland_restoration", "wetland_creation", "wetland_rehab"] {
            record.numeric(key)?;
        }
        Ok([
            record.numeric("tn_treatable_load")?,
            record.numeric("tp_treatable_load")?,
            record.numeric("tss_treatable_load")?,
        ])
    }
}

impl Calculator for WetlandEfficiencyCalculator {
    fn code(&self) -> &'static str {
        "floodplain_reconnection_3"
    }

    fn reduction(&self, record: &PracticeRecord) -> ReductionResult {
        let loads = Self::treatable_loads(record).unwrap_or_default();
        Pollutant::ALL.iter().zip(loads).fold(ReductionResult::new(), |acc, (p, load)| {
            acc.with(p.key("lbs_reduced"), wetland_reduction(load, *p))
        })
    }
}
