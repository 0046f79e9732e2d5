use serde::{Deserialize, Serialize};
use std::fmt;

/// The three tracked pollutants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pollutant {
    /// Total nitrogen (TN)
    Nitrogen,
    /// Total phosphorus (TP)
    Phosphorus,
    /// Total suspended solids (TSS)
    Sediment,
}

impl Pollutant {
    /// All pollutants in reporting order.
    pub const ALL: [Self; 3] = [Self::Nitrogen, Self::Phosphorus, Self::Sediment];

    /// Short prefix used in result keys (`tn`, `tp`, `tss`).
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Nitrogen => "tn",
            Self::Phosphorus => "tp",
            Self::Sediment => "tss",
        }
    }

    /// Long name used in nested result keys.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Nitrogen => "nitrogen",
            Self::Phosphorus => "phosphorus",
            Self::Sediment => "sediment",
        }
    }

    /// `<prefix>_<suffix>`, e.g. `key("lbs_reduced")` → `tn_lbs_reduced`.
    pub fn key(self, suffix: &str) -> String {
        format!("{}_{suffix}", self.prefix())
    }
}

impl fmt::Display for Pollutant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
