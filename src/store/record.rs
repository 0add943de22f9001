use serde::Serialize;
use std::fmt;

use crate::risk::FeatureVector;

/// A numeric column as read from the score file.
///
/// Cells that do not parse as a number keep their raw text instead of
/// failing the record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Parsed(f64),
    Unparsed(String),
}

impl FieldValue {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().parse::<f64>() {
            Ok(value) => Self::Parsed(value),
            Err(_) => Self::Unparsed(raw.to_string()),
        }
    }

    /// The numeric value, or `None` for an unparsed cell or NaN.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Parsed(value) if !value.is_nan() => Some(*value),
            _ => None,
        }
    }

    pub fn is_parsed(&self) -> bool {
        matches!(self, Self::Parsed(_))
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        Self::Parsed(value)
    }
}

impl Default for FieldValue {
    fn default() -> Self {
        Self::Parsed(0.0)
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parsed(value) => write!(f, "{value}"),
            Self::Unparsed(raw) => f.write_str(raw),
        }
    }
}

/// Transaction-fee and timing metrics. Older score files carry none of them.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct BehavioralMetrics {
    pub avg_gas_paid: FieldValue,
    pub gas_volatility: FieldValue,
    pub gas_overpay_ratio: FieldValue,
    pub tx_time_entropy: FieldValue,
    pub automation_score: FieldValue,
}

/// One scored wallet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WalletRecord {
    pub wallet_id: String,
    pub wallet_score: FieldValue,
    pub illicit_ratio: FieldValue,
    pub max_score: FieldValue,
    #[serde(flatten)]
    pub behavior: Option<BehavioralMetrics>,
}

impl WalletRecord {
    /// Aggregate score used for ranking and classification. Unparsed counts as 0.
    pub fn score(&self) -> f64 {
        self.wallet_score.as_f64().unwrap_or(0.0)
    }

    pub fn features(&self) -> FeatureVector {
        let defaults = FeatureVector::default();
        let or = |field: &FieldValue, default: f64| field.as_f64().unwrap_or(default);

        let mut features = FeatureVector {
            wallet_score: self.score(),
            illicit_ratio: or(&self.illicit_ratio, defaults.illicit_ratio),
            max_score: or(&self.max_score, defaults.max_score),
            ..defaults
        };

        if let Some(behavior) = &self.behavior {
            features.automation_score = or(&behavior.automation_score, defaults.automation_score);
            features.tx_time_entropy = or(&behavior.tx_time_entropy, defaults.tx_time_entropy);
            features.gas_overpay_ratio =
                or(&behavior.gas_overpay_ratio, defaults.gas_overpay_ratio);
        }

        features
    }
}
