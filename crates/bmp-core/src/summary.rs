//! Per-practice report over every measurement period.
//!
//! Planning periods are evaluated twice, once as designed (`planning`) and
//! once as the untreated baseline (`preinstallation`). Installation periods
//! get an `installation` reduction. Both carry the calculator's `metrics`.
//! The annotated periods are then rolled up by [`aggregate`].

use crate::aggregation::{AggregateTotals, MetricSet, aggregate, period_properties};
use bmp_calculator::Calculator;
use bmp_types::{MeasurementPeriod, PracticeRecord};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Annotated periods of one practice with their rolled-up totals.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PracticeSummary {
    /// Periods in input order, annotated with their reductions and metrics.
    pub periods: Vec<PracticeRecord>,
    /// Installed-to-date totals.
    pub quantity_installed: AggregateTotals,
    /// Installed totals as percent of planned.
    pub percentage_installed: AggregateTotals,
    pub has_planning_data: bool,
    pub has_installation_data: bool,
    pub has_monitoring_data: bool,
    /// The last annotated `Planning` period, used to pre-fill later periods.
    pub defaults: Option<PracticeRecord>,
}

/// Annotate one period. `secondary_code` is injected before evaluation so
/// variant tables resolve the same way they do through dispatch.
pub fn annotate_period(
    calculator: &dyn Calculator,
    secondary_code: Option<&str>,
    period: &PracticeRecord,
) -> PracticeRecord {
    let mut base = period_properties(period).into_owned();
    if let Some(secondary) = secondary_code {
        base.insert("secondary_code", secondary);
    }

    let mut annotated = base.clone();
    match base.measurement_period() {
        Some(MeasurementPeriod::Planning) => {
            let baseline = base.clone().with("preinstallation", true);
            annotated.insert("preinstallation", calculator.reduction(&baseline));
            annotated.insert("planning", calculator.reduction(&base));
            annotated.insert("metrics", calculator.metrics(&base));
        }
        Some(MeasurementPeriod::Installation) => {
            annotated.insert("installation", calculator.reduction(&base));
            annotated.insert("metrics", calculator.metrics(&base));
        }
        Some(MeasurementPeriod::PreProject | MeasurementPeriod::Monitoring) | None => {}
    }
    annotated
}

/// Build the summary for one practice's periods.
pub fn summarize(
    calculator: &dyn Calculator,
    secondary_code: Option<&str>,
    periods: &[PracticeRecord],
    set: &MetricSet,
) -> PracticeSummary {
    let annotated: Vec<PracticeRecord> =
        periods.iter().map(|p| annotate_period(calculator, secondary_code, p)).collect();

    let has_period = |tag: MeasurementPeriod| annotated.iter().any(|p| p.measurement_period() == Some(tag));
    let defaults = annotated
        .iter()
        .rev()
        .find(|p| p.measurement_period() == Some(MeasurementPeriod::Planning))
        .cloned();
    debug!(code = calculator.code(), periods = annotated.len(), "summarized practice");

    PracticeSummary {
        quantity_installed: aggregate(&annotated, set, false),
        percentage_installed: aggregate(&annotated, set, true),
        has_planning_data: has_period(MeasurementPeriod::Planning),
        has_installation_data: has_period(MeasurementPeriod::Installation),
        has_monitoring_data: has_period(MeasurementPeriod::Monitoring),
        defaults,
        periods: annotated,
    }
}
