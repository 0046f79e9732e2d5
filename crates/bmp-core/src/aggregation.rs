//! Installed-to-date and percent-of-planned roll-ups over a practice's
//! measurement periods.
//!
//! `Planning` periods feed the planned bucket and `Installation` periods the
//! installed bucket; every other period is ignored. Each tracked metric is
//! read off a period through a dotted path, so calculator output attached to
//! the period (`planning.nitrogen.value`, `metrics.acres_...`) can be rolled
//! up alongside raw inputs (`practice_1_extent`).

use bmp_types::{MeasurementPeriod, PracticeRecord};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeMap;
use tracing::{debug, instrument};

/// How a metric combines across periods of the same bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Accumulation {
    /// Add every period's value.
    Sum,
    /// Keep the value of the last period in the bucket. A period without the
    /// metric resets it to zero.
    Latest,
}

/// One tracked metric.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metric {
    /// Key of the metric in [`AggregateTotals`].
    pub name: String,
    /// Path read from `Planning` periods.
    pub planned_path: String,
    /// Path read from `Installation` periods.
    pub installed_path: String,
    /// How periods within a bucket combine.
    pub accumulation: Accumulation,
}

impl Metric {
    /// A summed metric read from the same path in both buckets.
    pub fn summed(name: &str, path: &str) -> Self {
        Self::new(name, path, path, Accumulation::Sum)
    }

    /// A last-wins metric read from the same path in both buckets.
    pub fn latest(name: &str, path: &str) -> Self {
        Self::new(name, path, path, Accumulation::Latest)
    }

    /// A summed metric read from `planning.<suffix>` and
    /// `installation.<suffix>`.
    pub fn by_period(name: &str, suffix: &str) -> Self {
        Self::new(
            name,
            &format!("planning.{suffix}"),
            &format!("installation.{suffix}"),
            Accumulation::Sum,
        )
    }

    /// A metric with distinct planned and installed paths.
    pub fn new(name: &str, planned_path: &str, installed_path: &str, accumulation: Accumulation) -> Self {
        Self {
            name: name.to_string(),
            planned_path: planned_path.to_string(),
            installed_path: installed_path.to_string(),
            accumulation,
        }
    }

    fn path(&self, bucket: Bucket) -> &str {
        match bucket {
            Bucket::Planned => &self.planned_path,
            Bucket::Installed => &self.installed_path,
        }
    }
}

/// A named collection of tracked metrics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricSet {
    /// Name accepted by [`MetricSet::by_name`] for the built-in sets.
    pub name: String,
    /// Metrics in reporting order.
    pub metrics: Vec<Metric>,
}

const STORMWATER_METRICS: [&str; 3] = [
    "gallons_per_year_of_stormwater_detained_or_infiltrated",
    "acres_of_protected_bmps_to_reduce_stormwater_runoff",
    "acres_of_installed_bmps_to_reduce_stormwater_runoff",
];

const INSTREAM_HABITAT_METRICS: [&str; 10] = [
    "metrics_areas_protected",
    "metrics_areas_of_habitat_restored",
    "metrics_acres_of_wetlands_restored",
    "metrics_miles_of_living_shoreline_restored",
    "metrics_miles_of_stream_opened",
    "metrics_acres_of_oyster_habitat_restored",
    "metrics_fish_passage_improvements_number_of_passage_barriers_re",
    "metrics_fish_passage_improvements_number_of_fish_crossing_barri",
    "metrics_number_of_reintroduced_subwatersheds_eastern_brook_trou",
    "metrics_number_of_habitat_units_improved_eastern_brook_trout",
];

impl MetricSet {
    pub fn new(name: &str, metrics: Vec<Metric>) -> Self {
        Self { name: name.to_string(), metrics }
    }

    /// Names accepted by [`MetricSet::by_name`].
    pub const NAMES: [&'static str; 4] =
        ["pollutants", "stormwater", "bank_stabilization", "instream_habitat"];

    /// Look up a built-in set.
    pub fn by_name(name: &str) -> Option<Self> {
        match name {
            "pollutants" => Some(Self::pollutants()),
            "stormwater" => Some(Self::stormwater()),
            "bank_stabilization" => Some(Self::bank_stabilization()),
            "instream_habitat" => Some(Self::instream_habitat()),
            _ => None,
        }
    }

    /// Flat reduction keys shared by most calculators, read from the
    /// `planning` and `installation` results.
    pub fn pollutants() -> Self {
        let metrics = ["tn_lbs_reduced", "tp_lbs_reduced", "tss_lbs_reduced", "tss_tons_reduced"]
            .iter()
            .map(|key| Metric::by_period(key, key))
            .collect();
        Self::new("pollutants", metrics)
    }

    /// Curve-adjusted loads, the stormwater reporting metrics, and the
    /// practice extents and drainage areas as last reported.
    pub fn stormwater() -> Self {
        let mut metrics: Vec<Metric> = ["nitrogen", "phosphorus", "sediment"]
            .iter()
            .map(|p| Metric::by_period(p, &format!("{p}.value")))
            .collect();
        metrics.extend(STORMWATER_METRICS.iter().map(|m| Metric::summed(m, &format!("metrics.{m}"))));
        metrics.extend(
            ["practice_1_extent", "practice_2_extent", "practice_3_extent", "practice_4_extent"]
                .iter()
                .map(|m| Metric::latest(m, m)),
        );
        metrics.push(Metric::latest("impervious_area", "impervious_area"));
        metrics.push(Metric::latest("total_drainage_area", "total_drainage_area"));
        Self::new("stormwater", metrics)
    }

    /// Bank stabilization loads and miles restored.
    pub fn bank_stabilization() -> Self {
        let mut metrics: Vec<Metric> = ["nitrogen", "phosphorus", "sediment"]
            .iter()
            .map(|p| Metric::by_period(p, p))
            .collect();
        metrics.push(Metric::summed(
            "miles_of_streambank_restored",
            "metrics.miles_of_streambank_restored",
        ));
        Self::new("bank_stabilization", metrics)
    }

    /// Habitat structure extents and the habitat reporting metrics, read
    /// straight off the period inputs.
    pub fn instream_habitat() -> Self {
        let mut metrics: Vec<Metric> = (1..=4)
            .map(|n| {
                Metric::summed(
                    &format!("installation_structure_type_{n}"),
                    &format!("installation_structure_extent_{n}"),
                )
            })
            .collect();
        metrics.extend(INSTREAM_HABITAT_METRICS.iter().map(|m| Metric::summed(m, m)));
        Self::new("instream_habitat", metrics)
    }
}

/// Metric name to installed-to-date value or percent of planned.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AggregateTotals {
    values: BTreeMap<String, f64>,
}

impl AggregateTotals {
    /// Value of a metric, `0.0` when it is not tracked.
    pub fn get(&self, name: &str) -> f64 {
        self.values.get(name).copied().unwrap_or(0.0)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Every value passed through `f`.
    pub fn map_values(self, f: impl Fn(f64) -> f64) -> Self {
        Self { values: self.values.into_iter().map(|(k, v)| (k, f(v))).collect() }
    }
}

impl FromIterator<(String, f64)> for AggregateTotals {
    fn from_iter<T: IntoIterator<Item = (String, f64)>>(iter: T) -> Self {
        Self { values: iter.into_iter().collect() }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Bucket {
    Planned,
    Installed,
}

impl Bucket {
    fn of(period: &PracticeRecord) -> Option<Self> {
        match period.measurement_period()? {
            MeasurementPeriod::Planning => Some(Self::Planned),
            MeasurementPeriod::Installation => Some(Self::Installed),
            MeasurementPeriod::PreProject | MeasurementPeriod::Monitoring => None,
        }
    }
}

/// Running sums for both buckets.
#[derive(Debug, Clone, Default)]
struct BucketTotals {
    planned: BTreeMap<String, f64>,
    installed: BTreeMap<String, f64>,
}

impl BucketTotals {
    fn seeded(set: &MetricSet) -> Self {
        let zeros: BTreeMap<String, f64> = set.metrics.iter().map(|m| (m.name.clone(), 0.0)).collect();
        Self { planned: zeros.clone(), installed: zeros }
    }

    fn absorb(mut self, set: &MetricSet, period: &PracticeRecord) -> Self {
        let Some(bucket) = Bucket::of(period) else {
            return self;
        };
        let totals = match bucket {
            Bucket::Planned => &mut self.planned,
            Bucket::Installed => &mut self.installed,
        };
        for metric in &set.metrics {
            let value = period.path_number(metric.path(bucket));
            let slot = totals.entry(metric.name.clone()).or_insert(0.0);
            match metric.accumulation {
                Accumulation::Sum => *slot += value,
                Accumulation::Latest => *slot = value,
            }
        }
        self
    }
}

/// Percent of planned, zero unless something was planned.
pub fn percent_of_planned(installed: f64, planned: f64) -> f64 {
    if planned > 0.0 { (installed / planned) * 100.0 } else { 0.0 }
}

/// Period attributes, unwrapping a `properties` envelope when present.
pub fn period_properties(period: &PracticeRecord) -> Cow<'_, PracticeRecord> {
    match period.record("properties") {
        Some(properties) => Cow::Owned(properties),
        None => Cow::Borrowed(period),
    }
}

/// Roll `periods` up into installed-to-date totals, or percent of planned
/// when `as_percentage` is set. Every metric in `set` appears in the output.
#[instrument(skip_all, fields(metric_set = %set.name, periods = periods.len(), as_percentage = as_percentage))]
pub fn aggregate(periods: &[PracticeRecord], set: &MetricSet, as_percentage: bool) -> AggregateTotals {
    let buckets = periods
        .iter()
        .fold(BucketTotals::seeded(set), |acc, period| acc.absorb(set, &period_properties(period)));
    debug!("aggregated periods");

    if !as_percentage {
        return buckets.installed.into_iter().collect();
    }
    set.metrics
        .iter()
        .map(|metric| {
            let installed = buckets.installed.get(&metric.name).copied().unwrap_or(0.0);
            let planned = buckets.planned.get(&metric.name).copied().unwrap_or(0.0);
            (metric.name.clone(), percent_of_planned(installed, planned))
        })
        .collect()
}
