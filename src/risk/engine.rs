use serde::Serialize;

use super::rules::{self, Rule, NORMAL_ACTIVITY_REASON, RULES};
use super::types::{FeatureVector, RiskLevel};

/// Classification plus the narrative behind it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Assessment {
    pub risk_score: f64,
    pub risk_level: RiskLevel,
    pub reasons: Vec<String>,
}

/// The explanation engine. Runs the rule battery in order against a feature vector.
pub struct RiskEngine {
    rules: &'static [Rule],
}

impl Default for RiskEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl RiskEngine {
    pub fn new() -> Self {
        Self { rules: RULES }
    }

    /// Collect the reasons for a wallet's score, in rule-priority order.
    /// Never returns an empty list.
    pub fn explain(&self, features: &FeatureVector) -> Vec<String> {
        let mut reasons: Vec<String> = self
            .rules
            .iter()
            .filter_map(|rule| {
                let reason = (rule.check)(features);
                if reason.is_some() {
                    tracing::trace!(rule = rule.name, "Explanation rule fired");
                }
                reason
            })
            .collect();

        if reasons.is_empty() {
            if let Some(reason) = rules::check_aggregate_score(features) {
                reasons.push(reason);
            }
        }

        if reasons.is_empty() {
            reasons.push(NORMAL_ACTIVITY_REASON.to_string());
        }

        reasons
    }

    pub fn assess(&self, features: &FeatureVector) -> Assessment {
        Assessment {
            risk_score: features.wallet_score,
            risk_level: RiskLevel::from_score(features.wallet_score),
            reasons: self.explain(features),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::risk::rules::AGGREGATE_REASON;

    #[test]
    fn test_wallet_without_signals_hits_normal_fallback() {
        let reasons = RiskEngine::new().explain(&FeatureVector::default());
        assert_eq!(reasons, vec![NORMAL_ACTIVITY_REASON.to_string()]);
    }

    #[test]
    fn test_literal_zero_vector_still_explained() {
        let zero = FeatureVector {
            wallet_score: 0.0,
            illicit_ratio: 0.0,
            max_score: 0.0,
            automation_score: 0.0,
            tx_time_entropy: 0.0,
            gas_overpay_ratio: 0.0,
        };
        // Zero timing entropy is itself a signal
        let reasons = RiskEngine::new().explain(&zero);
        assert_eq!(
            reasons,
            vec!["Low transaction time entropy (0.0) suggests programmatic execution".to_string()]
        );
    }

    #[test]
    fn test_low_risk_example_wallet() {
        let features = FeatureVector {
            wallet_score: 7.0,
            illicit_ratio: 0.05,
            max_score: 5.0,
            automation_score: 0.1,
            tx_time_entropy: 0.9,
            gas_overpay_ratio: 1.0,
        };
        let assessment = RiskEngine::new().assess(&features);
        assert_eq!(assessment.risk_level, RiskLevel::Low);
        assert_eq!(
            assessment.reasons,
            vec!["Behavior appears consistent with normal human activity".to_string()]
        );
    }

    #[test]
    fn test_critical_illicit_reason_comes_first() {
        let features = FeatureVector {
            wallet_score: 55.0,
            illicit_ratio: 0.6,
            max_score: 30.0,
            automation_score: 0.95,
            tx_time_entropy: 0.1,
            gas_overpay_ratio: 4.0,
        };
        let reasons = RiskEngine::new().explain(&features);
        assert_eq!(reasons.len(), 4);
        assert!(reasons[0].starts_with("CRITICAL"));
        assert!(reasons[1].starts_with("Directly connected"));
        assert!(reasons[2].contains("automated/bot"));
        assert!(reasons[3].contains("overpays gas"));
    }

    #[test]
    fn test_aggregate_fallback_only_without_other_reasons() {
        let quiet_but_high = FeatureVector {
            wallet_score: 25.0,
            ..FeatureVector::default()
        };
        assert_eq!(
            RiskEngine::new().explain(&quiet_but_high),
            vec![AGGREGATE_REASON.to_string()]
        );

        let noisy_and_high = FeatureVector {
            wallet_score: 25.0,
            max_score: 10.0,
            ..FeatureVector::default()
        };
        let reasons = RiskEngine::new().explain(&noisy_and_high);
        assert_eq!(reasons.len(), 1);
        assert!(reasons[0].contains("within 2 hops"));
    }

    #[test]
    fn test_explain_is_reproducible() {
        let engine = RiskEngine::new();
        let features = FeatureVector {
            wallet_score: 30.0,
            illicit_ratio: 0.2,
            max_score: 9.0,
            automation_score: 0.4,
            tx_time_entropy: 0.15,
            gas_overpay_ratio: 2.5,
        };
        assert_eq!(engine.explain(&features), engine.explain(&features));
        assert_eq!(engine.assess(&features).risk_level, RiskLevel::Medium);
    }
}
