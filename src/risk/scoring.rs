//! The aggregate wallet score.
//!
//! Both the synthetic generator and the band thresholds in
//! [`super::types::RiskLevel`] are calibrated against this one formula.

pub const ILLICIT_WEIGHT: f64 = 50.0;
pub const GRAPH_WEIGHT: f64 = 0.5;
pub const AUTOMATION_WEIGHT: f64 = 10.0;
pub const GAS_OVERPAY_WEIGHT: f64 = 2.0;

/// Illicit exposure + graph proximity + behavioral signal.
pub fn aggregate_score(
    illicit_ratio: f64,
    max_score: f64,
    automation_score: f64,
    gas_overpay_ratio: f64,
) -> f64 {
    let illicit = illicit_ratio * ILLICIT_WEIGHT;
    let graph = max_score * GRAPH_WEIGHT;
    let behavior = automation_score * AUTOMATION_WEIGHT + gas_overpay_ratio * GAS_OVERPAY_WEIGHT;
    illicit + graph + behavior
}
