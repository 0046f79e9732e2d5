use std::sync::Arc;

use bmp_calculator::curves::adjust_inches_treated;
use bmp_calculator::{Calculator, CalculatorRegistry, InMemoryLoadRateStore};
use bmp_types::{AttrValue, PracticeRecord};
use proptest::prelude::{prop_assert, prop_assert_eq, proptest};

fn registry() -> CalculatorRegistry {
    CalculatorRegistry::with_builtins(Arc::new(InMemoryLoadRateStore::new()), false)
}

fn numeric_leaves(value: &serde_json::Value, out: &mut Vec<f64>) {
    match value {
        serde_json::Value::Number(n) => out.extend(n.as_f64()),
        serde_json::Value::Array(items) => items.iter().for_each(|v| numeric_leaves(v, out)),
        serde_json::Value::Object(map) => map.values().for_each(|v| numeric_leaves(v, out)),
        _ => {}
    }
}

#[test]
fn empty_record_reduces_to_zero_everywhere() {
    let registry = registry();
    for code in registry.codes() {
        let calculator = registry.get(code).unwrap();
        let result = calculator.reduction(&PracticeRecord::new());
        let mut leaves = Vec::new();
        numeric_leaves(&serde_json::to_value(&result).unwrap(), &mut leaves);
        assert!(leaves.iter().all(|v| *v == 0.0), "{code} produced {leaves:?}");
    }
}

#[test]
fn defaults_are_objects() {
    let registry = registry();
    let shoreline = registry.get("shoreline_management").unwrap().input_defaults();
    assert_eq!(shoreline.number("length_of_living_shoreline"), 1000.0);
    assert!(registry.get("default").unwrap().input_defaults().is_empty());
}

proptest! {
    #![proptest_config(proptest::test_runner::Config::with_cases(64))]

    #[test]
    fn clamped_inches_stay_on_curve(raw in 0.0f64..50.0) {
        let inches = adjust_inches_treated(raw);
        prop_assert!((0.0..=2.5).contains(&inches));
    }

    #[test]
    fn shoreline_rate_is_linear(length in 0u32..100_000) {
        let calculator = registry();
        let record = PracticeRecord::new()
            .with("state_code", "va")
            .with("length_of_living_shoreline", f64::from(length));
        let result = calculator.get("shoreline_management").unwrap().reduction(&record);
        prop_assert!((result.number("tn_lbs_reduced") - f64::from(length) * 0.01218).abs() < 1e-6);
        prop_assert_eq!(result.len(), 1);
    }

    #[test]
    fn text_inputs_do_not_credit_streambank(text in "[a-z]{1,8}") {
        let calculator = registry();
        let record = PracticeRecord::new()
            .with("length_of_streambank", AttrValue::String(text.clone()))
            .with("linear_feet", AttrValue::String(text));
        for code in ["default", "outfall_stabilization", "instream_processing"] {
            let result = calculator.get(code).unwrap().reduction(&record);
            prop_assert!(result.iter().all(|(_, v)| v.as_number() == Some(0.0)));
        }
    }
}
