use std::sync::Arc;

use bmp_calculator::built_in::algal_flow_way::AlgalFlowWayCalculator;
use bmp_calculator::built_in::bank_stabilization::BankStabilizationCalculator;
use bmp_calculator::built_in::denitrification::DenitrificationCalculator;
use bmp_calculator::built_in::enhanced_stream_restoration::EnhancedStreamRestorationCalculator;
use bmp_calculator::built_in::floodplain_reconnection::FloodplainReconnectionCalculator;
use bmp_calculator::built_in::floodplain_reconnection_1::TreatableFlowCreditCalculator;
use bmp_calculator::built_in::floodplain_reconnection_2::SegmentLoadCalculator;
use bmp_calculator::built_in::floodplain_reconnection_3::WetlandEfficiencyCalculator;
use bmp_calculator::built_in::instream_processing::InstreamProcessingCalculator;
use bmp_calculator::built_in::outfall_and_gully_stabilization::OutfallAndGullyStabilizationCalculator;
use bmp_calculator::built_in::outfall_stabilization::OutfallStabilizationCalculator;
use bmp_calculator::built_in::oyster_aquaculture::OysterAquacultureCalculator;
use bmp_calculator::built_in::prevented_sediment::PreventedSedimentCalculator;
use bmp_calculator::built_in::shoreline_management::{ShorelineManagementCalculator, state_rate};
use bmp_calculator::built_in::st::StormwaterTreatmentCalculator;
use bmp_calculator::built_in::stormwater::StormwaterCalculator;
use bmp_calculator::built_in::streambank_default::StreambankDefaultCalculator;
use bmp_calculator::built_in::swp::StormwaterPerformanceCalculator;
use bmp_calculator::curves::Classification;
use bmp_calculator::{
    Calculator, CalculatorRegistry, InMemoryLoadRateStore, LoadRateRow, LoadRateStore, Pollutant,
};
use bmp_types::{PracticeRecord, ReductionResult};

const EPS: f64 = 1e-6;

fn record(json: &str) -> PracticeRecord {
    PracticeRecord::from_json(json).unwrap()
}

fn at(result: &ReductionResult, path: &str) -> f64 {
    let mut value = serde_json::to_value(result).unwrap();
    for segment in path.split('.') {
        value = value[segment].clone();
    }
    value.as_f64().unwrap()
}

fn assert_close(actual: f64, expected: f64) {
    assert!((actual - expected).abs() < EPS, "expected {expected}, got {actual}");
}

fn row(key: &str, source: &str, load_rate: f64, n: f64, p: f64, tss: f64) -> LoadRateRow {
    LoadRateRow {
        key: key.to_string(),
        source: source.replace('_', " "),
        normalized_source: source.to_string(),
        load_rate,
        n,
        p,
        tss,
    }
}

fn store(rows: Vec<LoadRateRow>) -> Arc<dyn LoadRateStore> {
    Arc::new(InMemoryLoadRateStore::from_rows(rows))
}

#[test]
fn algal_flow_way_monitored_biomass() {
    let input = record(
        r#"{"secondary_code": "monitored", "biomass": 1000, "percent_n": 5,
            "percent_p": 1, "percent_ash_solids": 20}"#,
    );
    let result = AlgalFlowWayCalculator.reduction(&input);
    assert_close(result.number("tn_lbs_reduced"), 22727.272727);
    assert_close(result.number("tp_lbs_reduced"), 4545.454545);
    assert_close(result.number("tss_tons_reduced"), 90909.090909 / 2000.0);
}

#[test]
fn algal_flow_way_by_surface_area() {
    let result = AlgalFlowWayCalculator.reduction(&record(r#"{"surface_area": 2}"#));
    assert_close(result.number("tn_lbs_reduced"), 1090.0);
    assert_close(result.number("tp_lbs_reduced"), 90.0);
    assert_close(result.number("tss_tons_reduced"), 3.219);

    let rejected = AlgalFlowWayCalculator.reduction(&record(r#"{"surface_area": "two"}"#));
    assert_eq!(rejected.len(), 3);
    assert_eq!(rejected.number("tn_lbs_reduced"), 0.0);
}

#[test]
fn bank_stabilization_halves_erosion_after_installation() {
    let base = r#"{"installation_length_of_streambank": 100,
        "installation_eroding_bank_height": 3, "installation_eroding_bank_horizontal_width": 4,
        "installation_lateral_erosion_rate": 0.2, "installation_soil_bulk_density": 90,
        "installation_soil_n_content": 0.002, "installation_soil_p_content": 0.001"#;

    let installed = BankStabilizationCalculator.reduction(&record(&format!("{base}}}")));
    assert_close(installed.number("sediment"), 2.25);
    assert_close(installed.number("nitrogen"), 0.0045);
    assert_close(installed.number("phosphorus"), 0.00225);

    let pre = BankStabilizationCalculator
        .reduction(&record(&format!(r#"{base}, "measurement_period": "Pre-Project"}}"#)));
    assert_close(pre.number("sediment"), 4.5);

    let metrics = BankStabilizationCalculator.metrics(&record(&format!("{base}}}")));
    assert_close(metrics.number("miles_of_streambank_restored"), 100.0 / 5280.0);
}

#[test]
fn default_streambank_rates() {
    let result = StreambankDefaultCalculator.reduction(&record(r#"{"length_of_streambank": 100}"#));
    assert_close(result.number("tn_lbs_reduced"), 7.5);
    assert_close(result.number("tp_lbs_reduced"), 6.8);
    assert_close(result.number("tss_lbs_reduced"), 24800.0);
}

#[test]
fn denitrification_discounts_and_guards() {
    let ok = DenitrificationCalculator.reduction(&record(
        r#"{"floodplain_sq_ft": 1000, "channel_sq_ft": 500, "brf": 1, "fhf": 1, "acrf": 1}"#,
    ));
    assert_close(ok.number("tn_lbs_reduced"), 40.35);

    let halved = DenitrificationCalculator.reduction(&record(
        r#"{"floodplain_sq_ft": 1000, "channel_sq_ft": 500, "brf": 2, "fhf": 1, "acrf": 1}"#,
    ));
    assert_close(halved.number("tn_lbs_reduced"), 20.175);

    let zero = DenitrificationCalculator
        .reduction(&record(r#"{"floodplain_sq_ft": 1000, "brf": 0, "fhf": 1, "acrf": 1}"#));
    assert_eq!(zero.number("tn_lbs_reduced"), 0.0);

    let text = DenitrificationCalculator.reduction(&record(r#"{"brf": "high"}"#));
    assert!(text.contains_key("tn_lbs_reduced"));
    assert_eq!(text.number("tn_lbs_reduced"), 0.0);
}

#[test]
fn enhanced_stream_restoration_without_design_uses_overrides() {
    let result = EnhancedStreamRestorationCalculator.reduction(&record(
        r#"{"override_linear_feet_in_coastal_plain": 1000,
            "override_linear_feet_in_noncoastal_plain": 2000}"#,
    ));
    assert_eq!(at(&result, "nitrogen.protocol_2"), 0.0);
    assert_eq!(at(&result, "sediment"), 0.0);
    assert_close(at(&result, "overrides.nitrogen.protocol_2"), 225.0);
    assert_eq!(at(&result, "overrides.nitrogen.protocol_3"), 0.0);
    assert_close(at(&result, "overrides.phosphorus.protocol_3"), 204.0);
    assert_close(at(&result, "overrides.sediment"), 52.445);
}

#[test]
fn enhanced_stream_restoration_before_after_protocol() {
    let input = record(
        r#"{
        "has_majority_design_completion": true,
        "load_data": {
            "impervious": {"tn_ual": 15, "tp_ual": 2, "tss_ual": 0.5},
            "pervious": {"tn_ual": 10, "tp_ual": 1}
        },
        "readings": [
            {"properties": {"measurement_period": "Pre-Project", "has_majority_design_completion": true,
                            "rainfall_depth_where_connection_occurs": 1.0, "floodplain_connection_volume": 0.5}},
            {"properties": {"measurement_period": "Planning", "has_majority_design_completion": true,
                            "rainfall_depth_where_connection_occurs": 0.5, "floodplain_connection_volume": 0.5,
                            "watershed_impervious_area": 10}}
        ]
    }"#,
    );
    let result = EnhancedStreamRestorationCalculator.reduction(&input);
    // gain = 0.2675 - (-0.095) = 0.3625
    assert_close(at(&result, "nitrogen.protocol_3"), 0.3625 * 0.2 * 250.0);
    assert_close(at(&result, "phosphorus.protocol_3"), 0.3625 * 0.3 * 30.0);
    // No pervious sediment load: protocol contributes zero.
    assert_eq!(at(&result, "sediment"), 0.0);
    assert_eq!(at(&result, "nitrogen.protocol_2"), 0.0);
    assert!(result.get("overrides").is_none());
}

#[test]
fn enhanced_stream_restoration_missing_planning_reading_is_zero() {
    let input = record(
        r#"{"has_majority_design_completion": true,
            "load_data": {"impervious": {"tn_ual": 15}, "pervious": {"tn_ual": 10}},
            "readings": [{"measurement_period": "Pre-Project", "has_majority_design_completion": true,
                          "rainfall_depth_where_connection_occurs": 1.0, "floodplain_connection_volume": 0.5}]}"#,
    );
    let result = EnhancedStreamRestorationCalculator.reduction(&input);
    assert_eq!(at(&result, "nitrogen.protocol_3"), 0.0);
}

#[test]
fn streambank_metrics_respect_bank_height_ratio() {
    let input = record(
        r#"{"has_majority_design_completion": true,
            "project_left_bank_height": 2, "left_bank_bankfull_height": 4,
            "project_right_bank_height": 6, "right_bank_bankfull_height": 4,
            "length_of_left_bank_with_improved_connectivity": 2640,
            "length_of_right_bank_with_improved_connectivity": 5000,
            "stream_length_reconnected_at_floodplain": 2640,
            "stream_width_at_mean_base_flow": 10,
            "connected_floodplain_surface_area": 3.5}"#,
    );
    let metrics = EnhancedStreamRestorationCalculator.metrics(&input);
    assert_close(metrics.number("miles_of_streambank_restored"), 1.0);
    assert_close(metrics.number("acres_of_streambank_restored"), (26400.0 + 2640.0) / 43560.0);
    assert_close(metrics.number("acres_of_floodplain_reconnected"), 3.5);
}

#[test]
fn floodplain_reconnection_branches() {
    let designed = FloodplainReconnectionCalculator.reduction(&record(
        r#"{"has_majority_design_completion": true, "tn_lbs_reduced": 12, "tss_tons_reduced": 1.5}"#,
    ));
    assert_eq!(designed.number("tn_lbs_reduced"), 12.0);
    assert_eq!(designed.number("tp_lbs_reduced"), 0.0);
    assert_eq!(designed.number("tss_tons_reduced"), 1.5);

    let linear = FloodplainReconnectionCalculator
        .reduction(&record(r#"{"override_linear_feet_in_coastal_plain": 2000}"#));
    assert_close(linear.number("tn_lbs_reduced"), 150.0);
    assert_close(linear.number("tss_tons_reduced"), 15.13);
}

#[test]
fn treatable_flow_credit() {
    let result = TreatableFlowCreditCalculator.reduction(&record(
        r#"{"existing_treated_discharge": 20, "existing_total_discharge": 100,
            "proposed_treated_discharge": 60, "proposed_total_discharge": 100}"#,
    ));
    assert_close(result.number("existing_percent_flow_treated"), 0.2);
    assert_close(result.number("proposed_percent_flow_treated"), 0.6);
    assert_close(result.number("treatable_flow_credit"), 0.4);

    let degenerate = TreatableFlowCreditCalculator.reduction(&PracticeRecord::new());
    assert_eq!(degenerate.number("treatable_flow_credit"), 0.0);
    assert_eq!(degenerate.len(), 3);
}

#[test]
fn segment_weighted_loads_average_found_segments() {
    let rates = store(vec![
        row("A", "stream_bed_and_bank", 10.0, 20.0, 5.0, 10.0),
        row("B", "stream_bed_and_bank", 5.0, 20.0, 5.0, 10.0),
    ]);
    let calculator = SegmentLoadCalculator::new(rates, false);
    let result = calculator.reduction(&record(
        r#"{"segments": ["A", "B", "missing"], "upstream_miles": 10, "treatable_flow_credit": 0.5}"#,
    ));
    assert_close(result.number("tn_load"), 30.0);
    assert_close(result.number("tn_treatable_load"), 15.0);
    assert_close(result.number("tp_load"), 7.5);
    assert_close(result.number("tss_load"), 15.0);
}

#[test]
fn segment_weighted_loads_without_rows_are_zero() {
    let calculator = SegmentLoadCalculator::new(store(vec![]), true);
    let result = calculator
        .reduction(&record(r#"{"segments": ["A"], "upstream_miles": 10, "treatable_flow_credit": 0.5}"#));
    assert_eq!(result.number("tn_load"), 0.0);
    assert_eq!(result.number("tss_treatable_load"), 0.0);
    assert_eq!(result.len(), 6);
}

#[test]
fn wetland_efficiencies_sum_all_classes() {
    let result = WetlandEfficiencyCalculator.reduction(&record(
        r#"{"tn_treatable_load": 100, "tp_treatable_load": 10, "tss_treatable_load": 1,
            "wetland_restoration": 1}"#,
    ));
    assert_close(result.number("tn_lbs_reduced"), 88.0);
    assert_close(result.number("tp_lbs_reduced"), 9.5);
    assert_close(result.number("tss_lbs_reduced"), 0.77);
}

#[test]
fn instream_processing_caps_box_depth() {
    let designed = InstreamProcessingCalculator.reduction(&record(
        r#"{"has_majority_design_completion": true, "hyporheic_box_depth": 10,
            "length_of_left_bank_with_improved_connectivity": 100,
            "stream_width_at_mean_base_flow": 10}"#,
    ));
    assert_close(designed.number("tn_lbs_reduced"), 312.5 * 0.000195 * 365.0);
    assert_eq!(designed.len(), 1);

    let interim = InstreamProcessingCalculator.reduction(&record(r#"{"linear_feet": 10}"#));
    assert_close(interim.number("tss_tons_reduced"), 2480.0);
}

#[test]
fn outfall_calculators() {
    let linear = OutfallStabilizationCalculator.reduction(&record(r#"{"linear_feet": 10}"#));
    assert_close(linear.number("tn_lbs_reduced"), 0.75);

    let gully = OutfallAndGullyStabilizationCalculator
        .reduction(&record(r#"{"total_prevented_sediment": 600}"#));
    assert_close(gully.number("tss_lbs_reduced"), 10.0);
}

#[test]
fn oyster_aquaculture_size_class_protocol() {
    let result = OysterAquacultureCalculator
        .reduction(&record(r#"{"secondary_code": "triploid_4", "animal_units": 453592.37}"#));
    assert_close(result.number("tn_lbs_reduced"), 260.0);
    assert_close(result.number("tp_lbs_reduced"), 30.0);
}

#[test]
fn oyster_aquaculture_tissue_protocol() {
    let result = OysterAquacultureCalculator.reduction(&record(
        r#"{"units": {"diploid_3": 100, "triploid_gt_6": 10},
            "avg_tissue_dry_weight": {"triploid_gt_6": 10.0}}"#,
    ));
    let n_grams = 100.0 * 1.06 * 8.2 + 10.0 * 10.0 * 8.2;
    assert_close(result.number("tn_lbs_reduced"), n_grams / 453.59237);

    assert!(OysterAquacultureCalculator.reduction(&PracticeRecord::new()).is_empty());
}

#[test]
fn prevented_sediment_skips_invalid_banks() {
    let result = PreventedSedimentCalculator.reduction(&record(
        r#"{"banks": [
            {"bulk_density_of_soil": 90, "bank_erosion_rate": 0.1, "eroding_bank_length": 100,
             "eroding_bank_height": 5, "nitrogen_concentration": 0.002, "phosphorus_concentration": 0.001},
            {"bulk_density_of_soil": "dense", "bank_erosion_rate": 1}
        ]}"#,
    ));
    assert_close(result.number("tss_lbs_reduced"), 2250.0);
    assert_close(result.number("tn_lbs_reduced"), 4.5);
    assert_close(result.number("tp_lbs_reduced"), 2.25);
}

#[test]
fn shoreline_state_lookup() {
    let va = ShorelineManagementCalculator
        .reduction(&record(r#"{"state_code": "va", "length_of_living_shoreline": 1000}"#));
    assert_close(va.number("tn_lbs_reduced"), 12.18);
    assert_eq!(va.keys().collect::<Vec<_>>(), vec!["tn_lbs_reduced"]);

    let upper = ShorelineManagementCalculator
        .reduction(&record(r#"{"state_code": "VA", "length_of_living_shoreline": 1000}"#));
    assert_eq!(upper, va);

    let unknown = ShorelineManagementCalculator
        .reduction(&record(r#"{"state_code": "ny", "length_of_living_shoreline": 1000}"#));
    assert!(unknown.is_empty());
}

#[test]
fn shoreline_states_without_rates_report_nothing() {
    for state in ["md", "dc", "de", " Md "] {
        let body = format!(r#"{{"state_code": "{state}", "length_of_living_shoreline": 1000}}"#);
        assert!(ShorelineManagementCalculator.reduction(&record(&body)).is_empty(), "state {state}");
    }
    assert_eq!(state_rate(" VA ", Pollutant::Nitrogen), Some(0.01218));
    assert_eq!(state_rate("va", Pollutant::Phosphorus), None);
    assert_eq!(state_rate("va", Pollutant::Sediment), None);
}

#[test]
fn shoreline_designed_protocols_use_defaults() {
    let result = ShorelineManagementCalculator
        .reduction(&record(r#"{"has_majority_design_completion": true}"#));
    let eroded = 1000.0 * 4.0 * 1.0 * 93.6 * 1.0;
    assert_close(result.number("tn_lbs_reduced_1"), eroded * 0.00029);
    assert_close(result.number("tp_lbs_reduced_1"), eroded * 0.551 * 0.000205);
    assert_close(result.number("tss_tons_reduced_1"), eroded * 0.551 / 2000.0);
    assert_close(result.number("tn_lbs_reduced_2"), 21.25);
    assert_close(result.number("tp_lbs_reduced_4"), 0.075);
}

#[test]
fn st_curve_uses_clamped_inches() {
    let result = StormwaterTreatmentCalculator.reduction(&record(
        r#"{"footprint_area": 0.1, "ponding_depth": 2, "impervious_acres": 1}"#,
    ));
    let inches = result.number("inches_treated");
    assert_close(inches, 0.1);
    assert_close(
        result.number("tn_pct_reduced"),
        Classification::StormwaterTreatment.evaluate(Pollutant::Nitrogen, inches),
    );

    let degenerate = StormwaterTreatmentCalculator.reduction(&PracticeRecord::new());
    assert_eq!(degenerate.number("inches_treated"), 0.0);
}

#[test]
fn stormwater_adjustor_and_metrics() {
    let base = r#""impervious_area": 43560, "total_drainage_area": 87120,
        "load_data": {"impervious": {"tn_ual": 10}}, "runoff_volume_captured": 0"#;

    let pre = StormwaterCalculator
        .reduction(&record(&format!(r#"{{{base}, "preinstallation": true}}"#)));
    assert_close(at(&pre, "nitrogen.value"), 20.0);
    assert_close(at(&pre, "nitrogen.adjustor"), 1.0);

    let planned = StormwaterCalculator.reduction(&record(&format!(
        r#"{{{base}, "site_reduction_classification": "Runoff Reduction"}}"#
    )));
    let adjustor = 0.0308 - 0.2562 + 0.8634 - 1.5285 + 1.501 - 0.013;
    assert_close(at(&planned, "nitrogen.adjustor"), adjustor);
    assert_close(at(&planned, "nitrogen.value"), 20.0 * adjustor);

    let unclassified = StormwaterCalculator.reduction(&record(&format!("{{{base}}}")));
    assert_eq!(at(&unclassified, "sediment.value"), 0.0);

    let metrics = StormwaterCalculator.metrics(&record(
        r#"{"runoff_volume_captured": 2, "total_drainage_area": 87120,
            "practice_1_extent": 0.5, "practice_3_extent": 0.25}"#,
    ));
    assert_close(metrics.number("gallons_per_year_of_stormwater_detained_or_infiltrated"), 651702.8);
    assert_close(metrics.number("acres_of_protected_bmps_to_reduce_stormwater_runoff"), 2.0);
    assert_close(metrics.number("acres_of_installed_bmps_to_reduce_stormwater_runoff"), 0.75);
}

#[test]
fn swp_discovers_sources_then_scores_groups() {
    let rates = store(vec![
        row("A", "urban", 10.0, 20.0, 1.0, 5.0),
        row("A", "regulated_construction", 1.0, 1.0, 1.0, 1.0),
        row("B", "agriculture", 4.0, 4.0, 4.0, 4.0),
    ]);
    let calculator = StormwaterPerformanceCalculator::new(rates, false);

    let discovery = calculator.reduction(&record(r#"{"segments": ["A", "B"]}"#));
    let sources = serde_json::to_value(&discovery).unwrap();
    assert_eq!(sources["load_sources"][0]["key"], "agriculture");
    assert_eq!(sources["load_sources"][1]["key"], "urban");
    assert_eq!(sources["load_sources"].as_array().unwrap().len(), 2);

    let scored = calculator.reduction(&record(
        r#"{"segments": ["A", "B"], "load_sources": [], "mode": "st",
            "input_groups": [
                {"source_key": "urban", "footprint_area": 0.1, "ponding_depth": 2, "impervious_acres": 1},
                {"footprint_area": 1, "ponding_depth": 1, "impervious_acres": 1}
            ]}"#,
    ));
    let inches = 2.5_f64 % 2.4;
    let tn_pct = Classification::StormwaterTreatment.evaluate(Pollutant::Nitrogen, inches);
    assert_close(scored.number("tn_lbs_reduced"), 2.0 * tn_pct);
    let tss_pct = Classification::StormwaterTreatment.evaluate(Pollutant::Sediment, inches);
    assert_close(scored.number("tss_lbs_reduced"), 0.5 * tss_pct);
    assert!(scored.contains_key("tp_lbs_reduced"));
}

#[test]
fn registry_holds_every_practice() {
    let registry = CalculatorRegistry::with_builtins(store(vec![]), false);
    assert_eq!(
        registry.codes(),
        vec![
            "algal_flow_way",
            "bank_stabilization",
            "default",
            "denitrification",
            "enhanced_stream_restoration",
            "floodplain_reconnection",
            "floodplain_reconnection_1",
            "floodplain_reconnection_2",
            "floodplain_reconnection_3",
            "instream_processing",
            "outfall_and_gully_stabilization",
            "outfall_stabilization",
            "oyster_aquaculture",
            "prevented_sediment",
            "shoreline_management",
            "st",
            "stormwater",
            "swp",
        ]
    );
    assert!(registry.get("stormwater").is_some());
    assert!(registry.get("unknown").is_none());
}
