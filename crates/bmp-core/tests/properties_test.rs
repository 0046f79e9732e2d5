use bmp_core::{BmpEngine, Metric, MetricSet, PracticeRecord, aggregate};
use proptest::prelude::{Just, Strategy, prop_assert, prop_assert_eq, prop_oneof, proptest};

/// Inputs without a published default; absent and zero must read the same.
const OPTIONAL_INPUTS: [&str; 19] = [
    "length_of_streambank",
    "linear_feet",
    "surface_area",
    "biomass",
    "percent_n",
    "impervious_area",
    "total_drainage_area",
    "runoff_volume_captured",
    "upstream_miles",
    "treatable_flow_credit",
    "floodplain_sq_ft",
    "channel_sq_ft",
    "total_prevented_sediment",
    "animal_units",
    "footprint_area",
    "ponding_depth",
    "impervious_acres",
    "existing_total_discharge",
    "installation_lateral_erosion_rate",
];

fn optional_values() -> impl Strategy<Value = Vec<Option<f64>>> {
    proptest::collection::vec(
        prop_oneof![Just(None), (0.5f64..1000.0).prop_map(Some)],
        OPTIONAL_INPUTS.len(),
    )
}

fn period_values() -> impl Strategy<Value = Vec<(u8, f64)>> {
    proptest::collection::vec((0u8..4, 0.0f64..500.0), 0..12)
}

fn history(values: &[(u8, f64)]) -> Vec<PracticeRecord> {
    let tags = ["Pre-Project", "Planning", "Installation", "Monitoring"];
    values
        .iter()
        .map(|(tag, value)| {
            PracticeRecord::new()
                .with("measurement_period", tags[usize::from(*tag)])
                .with("metric", *value)
                .with("extent", *value / 2.0)
        })
        .collect()
}

fn metric_set() -> MetricSet {
    MetricSet::new(
        "property",
        vec![Metric::summed("metric", "metric"), Metric::latest("extent", "extent")],
    )
}

proptest! {
    #![proptest_config(proptest::test_runner::Config::with_cases(32))]

    #[test]
    fn omitted_inputs_match_explicit_zero(values in optional_values()) {
        let engine = BmpEngine::without_load_rates();
        for code in engine.codes() {
            let mut omitted = PracticeRecord::new().with("practice_code", code);
            let mut zeroed = omitted.clone();
            for (key, value) in OPTIONAL_INPUTS.iter().zip(&values) {
                match value {
                    Some(v) => {
                        omitted.insert(*key, *v);
                        zeroed.insert(*key, *v);
                    }
                    None => zeroed.insert(*key, 0.0),
                }
            }
            let lhs = engine.dispatch(&omitted);
            let rhs = engine.dispatch(&zeroed);
            prop_assert_eq!(lhs, rhs, "code {}", code);
        }
    }

    #[test]
    fn aggregate_is_repeatable(values in period_values(), as_percentage in proptest::bool::ANY) {
        let periods = history(&values);
        let set = metric_set();
        let first = aggregate(&periods, &set, as_percentage);
        let second = aggregate(&periods, &set, as_percentage);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn percentages_are_finite(values in period_values()) {
        let totals = aggregate(&history(&values), &metric_set(), true);
        prop_assert!(totals.iter().all(|(_, v)| v.is_finite() && v >= 0.0));
        prop_assert_eq!(totals.len(), 2);
    }
}
