//! Per-segment pollutant export rates.
//!
//! The engine only reads load rates. Ownership of the table belongs to
//! whatever loads it; `InMemoryLoadRateStore` covers tests, the CLI and any
//! host that can hand the engine a row dump.

use crate::numeric::mean;
use crate::pollutant::Pollutant;
use dashmap::DashMap;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, trace};

/// Normalized source excluded from load-source discovery.
pub const REGULATED_CONSTRUCTION: &str = "regulated_construction";

/// One row of the load-rate table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadRateRow {
    /// Geography segment key
    pub key: String,
    /// Human-readable source label
    pub source: String,
    /// Normalized source key
    pub normalized_source: String,
    /// Total load rate for the segment and source
    pub load_rate: f64,
    /// Nitrogen rate
    pub n: f64,
    /// Phosphorus rate
    pub p: f64,
    /// Sediment rate
    pub tss: f64,
}

/// Rates for one `(segment, source)` lookup.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoadRate {
    /// Total load rate
    pub load_rate: f64,
    /// Nitrogen rate
    pub n: f64,
    /// Phosphorus rate
    pub p: f64,
    /// Sediment rate
    pub tss: f64,
}

impl LoadRate {
    /// Pollutant rates divided by the total load rate. `None` when the total
    /// is zero or the quotients are not finite.
    pub fn normalized(&self) -> Option<NormalizedRates> {
        if self.load_rate == 0.0 {
            return None;
        }
        let rates = NormalizedRates {
            n: self.n / self.load_rate,
            p: self.p / self.load_rate,
            tss: self.tss / self.load_rate,
        };
        (rates.n.is_finite() && rates.p.is_finite() && rates.tss.is_finite()).then_some(rates)
    }
}

impl From<&LoadRateRow> for LoadRate {
    fn from(row: &LoadRateRow) -> Self {
        Self { load_rate: row.load_rate, n: row.n, p: row.p, tss: row.tss }
    }
}

/// Normalized rates, or their average across segments.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NormalizedRates {
    /// Nitrogen
    pub n: f64,
    /// Phosphorus
    pub p: f64,
    /// Sediment
    pub tss: f64,
}

impl NormalizedRates {
    /// Rate for one pollutant.
    pub const fn get(&self, pollutant: Pollutant) -> f64 {
        match pollutant {
            Pollutant::Nitrogen => self.n,
            Pollutant::Phosphorus => self.p,
            Pollutant::Sediment => self.tss,
        }
    }

    /// Every rate multiplied by `factor`.
    pub fn scale(&self, factor: f64) -> Self {
        Self { n: self.n * factor, p: self.p * factor, tss: self.tss * factor }
    }

    /// Per-pollutant mean, or `None` for an empty slice.
    pub fn average(rates: &[Self]) -> Option<Self> {
        let column = |f: fn(&Self) -> f64| mean(&rates.iter().map(f).collect::<Vec<_>>());
        Some(Self { n: column(|r| r.n)?, p: column(|r| r.p)?, tss: column(|r| r.tss)? })
    }
}

/// A distinct load source present in a set of segments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadSource {
    /// Source label
    pub name: String,
    /// Normalized source key
    pub key: String,
}

/// Read-only access to load rates. Implementations must tolerate concurrent
/// readers.
pub trait LoadRateStore: Send + Sync {
    /// Rates for a segment and normalized source, if a row exists.
    fn lookup(&self, segment: &str, normalized_source: &str) -> Option<LoadRate>;

    /// Distinct sources across `segments`, ordered by label, excluding
    /// regulated construction.
    fn load_sources(&self, segments: &[String]) -> Vec<LoadSource>;
}

/// Errors raised while loading a load-rate table.
#[derive(Debug, Error)]
pub enum LoadRateError {
    /// The file could not be read.
    #[error("failed to read load rates from {path}: {source}")]
    Io {
        /// Path that failed
        path: String,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },
    /// The contents were not a JSON array of rows.
    #[error("invalid load rate table: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Load-rate table held in memory, keyed by segment.
#[derive(Debug, Default)]
pub struct InMemoryLoadRateStore {
    segments: DashMap<String, Vec<LoadRateRow>>,
}

impl InMemoryLoadRateStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from rows.
    pub fn from_rows(rows: impl IntoIterator<Item = LoadRateRow>) -> Self {
        let store = Self::new();
        for row in rows {
            store.insert(row);
        }
        store
    }

    /// Parse a JSON array of rows.
    pub fn from_json_str(json: &str) -> Result<Self, LoadRateError> {
        let rows: Vec<LoadRateRow> = serde_json::from_str(json)?;
        Ok(Self::from_rows(rows))
    }

    /// Read a JSON array of rows from disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, LoadRateError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|source| LoadRateError::Io { path: path.display().to_string(), source })?;
        let store = Self::from_json_str(&contents)?;
        debug!(path = %path.display(), rows = store.len(), "loaded load rate table");
        Ok(store)
    }

    /// Add a row. Rows for the same segment keep insertion order; lookups
    /// return the first match.
    pub fn insert(&self, row: LoadRateRow) {
        self.segments.entry(row.key.clone()).or_default().push(row);
    }

    /// Total number of rows.
    pub fn len(&self) -> usize {
        self.segments.iter().map(|entry| entry.value().len()).sum()
    }

    /// Whether the store has no rows.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

impl LoadRateStore for InMemoryLoadRateStore {
    fn lookup(&self, segment: &str, normalized_source: &str) -> Option<LoadRate> {
        let rows = self.segments.get(segment)?;
        rows.iter().find(|row| row.normalized_source == normalized_source).map(LoadRate::from)
    }

    fn load_sources(&self, segments: &[String]) -> Vec<LoadSource> {
        let mut by_label: BTreeMap<String, String> = BTreeMap::new();
        for segment in segments {
            let Some(rows) = self.segments.get(segment) else {
                continue;
            };
            for row in rows.iter().filter(|r| r.normalized_source != REGULATED_CONSTRUCTION) {
                by_label
                    .entry(row.source.clone())
                    .or_insert_with(|| row.normalized_source.clone());
            }
        }
        by_label.into_iter().map(|(name, key)| LoadSource { name, key }).collect()
    }
}

/// Average normalized rates over every segment with a usable row for
/// `source`. Segments without a row, or whose total rate is zero, are
/// skipped rather than counted as zero. `None` when nothing was found.
pub fn average_normalized(
    store: &dyn LoadRateStore,
    segments: &[String],
    source: &str,
    parallel: bool,
) -> Option<NormalizedRates> {
    let lookup = |segment: &String| store.lookup(segment, source).and_then(|r| r.normalized());
    let found: Vec<NormalizedRates> = if parallel {
        segments.par_iter().filter_map(lookup).collect()
    } else {
        segments.iter().filter_map(lookup).collect()
    };
    trace!(requested = segments.len(), found = found.len(), source, "segment lookups");
    NormalizedRates::average(&found)
}

/// Text entries of a `segments` list; non-text entries are ignored.
pub fn segment_keys(values: &[bmp_types::AttrValue]) -> Vec<String> {
    values.iter().filter_map(|v| v.as_str()).map(str::to_string).collect()
}
