use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle stage at which a practice's attributes were recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MeasurementPeriod {
    /// Baseline conditions before any work began.
    #[serde(rename = "Pre-Project", alias = "Pre-Installation")]
    PreProject,
    /// Designed (planned) conditions.
    Planning,
    /// As-built conditions.
    Installation,
    /// Post-installation monitoring.
    Monitoring,
}

impl MeasurementPeriod {
    /// Canonical label as it appears on records.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::PreProject => "Pre-Project",
            Self::Planning => "Planning",
            Self::Installation => "Installation",
            Self::Monitoring => "Monitoring",
        }
    }
}

impl fmt::Display for MeasurementPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MeasurementPeriod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Pre-Project" | "Pre-Installation" => Ok(Self::PreProject),
            "Planning" => Ok(Self::Planning),
            "Installation" => Ok(Self::Installation),
            "Monitoring" => Ok(Self::Monitoring),
            other => Err(format!("unknown measurement period '{other}'")),
        }
    }
}

/// A dotted `<primary>.<secondary>` practice token.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PracticeCode {
    /// Selects the calculator.
    pub primary: String,
    /// Selects a variant inside the calculator (size class, jurisdiction, ...).
    pub secondary: Option<String>,
}

impl PracticeCode {
    /// Split a raw token on `.`. Returns `None` when the primary segment is
    /// empty. Segments beyond the second are ignored.
    pub fn parse(token: &str) -> Option<Self> {
        let mut parts = token.trim().split('.');
        let primary = parts.next()?.trim();
        if primary.is_empty() {
            return None;
        }
        let secondary = parts
            .next()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        Some(Self { primary: primary.to_string(), secondary })
    }
}

impl fmt::Display for PracticeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.secondary {
            Some(secondary) => write!(f, "{}.{}", self.primary, secondary),
            None => f.write_str(&self.primary),
        }
    }
}
