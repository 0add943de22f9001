use super::types::FeatureVector;

/// A single explanation heuristic. Returns a reason when it fires.
#[derive(Clone, Copy)]
pub struct Rule {
    pub name: &'static str,
    pub check: fn(&FeatureVector) -> Option<String>,
}

/// The battery in evaluation order. Reasons are reported in this order.
pub const RULES: &[Rule] = &[
    Rule {
        name: "illicit_exposure",
        check: check_illicit_exposure,
    },
    Rule {
        name: "network_proximity",
        check: check_network_proximity,
    },
    Rule {
        name: "automation",
        check: check_automation,
    },
    Rule {
        name: "gas_overpay",
        check: check_gas_overpay,
    },
];

pub const AGGREGATE_REASON: &str = "Aggregate risk score is high based on combined factors";
pub const NORMAL_ACTIVITY_REASON: &str = "Behavior appears consistent with normal human activity";

/// Share of funds traced to illicit sources.
pub fn check_illicit_exposure(features: &FeatureVector) -> Option<String> {
    let illicit = features.illicit_ratio;
    let percent = illicit * 100.0;

    if illicit > 0.5 {
        Some(format!(
            "CRITICAL: {percent:.1}% of funds are from illicit sources"
        ))
    } else if illicit > 0.1 {
        Some(format!(
            "Significant exposure to illicit transactions ({percent:.1}%)"
        ))
    } else {
        None
    }
}

/// Graph proximity to known illicit clusters.
pub fn check_network_proximity(features: &FeatureVector) -> Option<String> {
    if features.max_score > 15.0 {
        Some("Directly connected to high-risk criminal clusters".to_string())
    } else if features.max_score > 8.0 {
        Some("Wallet is within 2 hops of known illicit entities".to_string())
    } else {
        None
    }
}

/// Bot-driven execution. A high automation score takes precedence over
/// the timing entropy signal.
pub fn check_automation(features: &FeatureVector) -> Option<String> {
    if features.automation_score > 0.8 {
        Some("High probability of automated/bot behavior (Score > 0.8)".to_string())
    } else if features.tx_time_entropy < 0.2 {
        Some(format!(
            "Low transaction time entropy ({:?}) suggests programmatic execution",
            features.tx_time_entropy
        ))
    } else {
        None
    }
}

pub fn check_gas_overpay(features: &FeatureVector) -> Option<String> {
    if features.gas_overpay_ratio > 2.0 {
        Some(format!(
            "Consistently overpays gas ({:?}x avg), indicating urgency/front-running",
            features.gas_overpay_ratio
        ))
    } else {
        None
    }
}

/// Only consulted when no battery rule fired.
pub fn check_aggregate_score(features: &FeatureVector) -> Option<String> {
    if features.wallet_score > 20.0 {
        Some(AGGREGATE_REASON.to_string())
    } else {
        None
    }
}
