//! Built-in practice calculators.

use crate::Calculator;
use crate::load_rates::LoadRateStore;
use std::sync::Arc;

pub mod stream;

// Stream and floodplain practices
pub mod bank_stabilization;
pub mod enhanced_stream_restoration;
pub mod floodplain_reconnection;
pub mod floodplain_reconnection_1;
pub mod floodplain_reconnection_2;
pub mod floodplain_reconnection_3;
pub mod instream_processing;
pub mod outfall_and_gully_stabilization;
pub mod outfall_stabilization;
pub mod prevented_sediment;
pub mod streambank_default;

// Nitrogen removal
pub mod algal_flow_way;
pub mod denitrification;
pub mod oyster_aquaculture;
pub mod shoreline_management;

// Urban stormwater
pub mod st;
pub mod stormwater;
pub mod swp;

/// One instance of every built-in calculator.
pub fn all(store: Arc<dyn LoadRateStore>, parallel_lookups: bool) -> Vec<Arc<dyn Calculator>> {
    vec![
        Arc::new(algal_flow_way::AlgalFlowWayCalculator),
        Arc::new(bank_stabilization::BankStabilizationCalculator),
        Arc::new(streambank_default::StreambankDefaultCalculator),
        Arc::new(denitrification::DenitrificationCalculator),
        Arc::new(enhanced_stream_restoration::EnhancedStreamRestorationCalculator),
        Arc::new(floodplain_reconnection::FloodplainReconnectionCalculator),
        Arc::new(floodplain_reconnection_1::TreatableFlowCreditCalculator),
        Arc::new(floodplain_reconnection_2::SegmentLoadCalculator::new(
            Arc::clone(&store),
            parallel_lookups,
        )),
        Arc::new(floodplain_reconnection_3::WetlandEfficiencyCalculator),
        Arc::new(instream_processing::InstreamProcessingCalculator),
        Arc::new(outfall_stabilization::OutfallStabilizationCalculator),
        Arc::new(outfall_and_gully_stabilization::OutfallAndGullyStabilizationCalculator),
        Arc::new(oyster_aquaculture::OysterAquacultureCalculator),
        Arc::new(prevented_sediment::PreventedSedimentCalculator),
        Arc::new(shoreline_management::ShorelineManagementCalculator),
        Arc::new(st::StormwaterTreatmentCalculator),
        Arc::new(stormwater::StormwaterCalculator),
        Arc::new(swp::StormwaterPerformanceCalculator::new(store, parallel_lookups)),
    ]
}
