use serde::{Serialize, Serializer};
use std::fmt;

/// Scores strictly above this are High Risk.
pub const HIGH_RISK_THRESHOLD: f64 = 35.0;
/// Scores at or above this (and at or below the high threshold) are Medium Risk.
pub const MEDIUM_RISK_THRESHOLD: f64 = 20.0;

/// Risk band of a wallet, derived from its aggregate score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Classify an aggregate score. Medium is closed on both ends:
    /// 20.0 and 35.0 are both Medium. NaN falls through to Low.
    pub fn from_score(score: f64) -> Self {
        if score > HIGH_RISK_THRESHOLD {
            Self::High
        } else if score >= MEDIUM_RISK_THRESHOLD {
            Self::Medium
        } else {
            Self::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "Low Risk",
            Self::Medium => "Medium Risk",
            Self::High => "High Risk",
        }
    }

    /// Whether `score` lands in this band.
    pub fn contains(&self, score: f64) -> bool {
        Self::from_score(score) == *self
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for RiskLevel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// The numeric view of a wallet that the rule battery inspects.
///
/// Fields missing from a record take the neutral defaults below, so an
/// absent behavioral group never triggers a behavioral rule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector {
    pub wallet_score: f64,
    pub illicit_ratio: f64,
    pub max_score: f64,
    pub automation_score: f64,
    pub tx_time_entropy: f64,
    pub gas_overpay_ratio: f64,
}

impl Default for FeatureVector {
    fn default() -> Self {
        Self {
            wallet_score: 0.0,
            illicit_ratio: 0.0,
            max_score: 0.0,
            automation_score: 0.0,
            tx_time_entropy: 1.0,
            gas_overpay_ratio: 1.0,
        }
    }
}

/// Per-band wallet counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BandCounts {
    pub total: usize,
    pub low: usize,
    pub medium: usize,
    pub high: usize,
}

impl BandCounts {
    pub fn from_scores(scores: impl IntoIterator<Item = f64>) -> Self {
        let mut counts = Self::default();
        for score in scores {
            counts.record(RiskLevel::from_score(score));
        }
        counts
    }

    pub fn record(&mut self, level: RiskLevel) {
        self.total += 1;
        match level {
            RiskLevel::Low => self.low += 1,
            RiskLevel::Medium => self.medium += 1,
            RiskLevel::High => self.high += 1,
        }
    }

    pub fn get(&self, level: RiskLevel) -> usize {
        match level {
            RiskLevel::Low => self.low,
            RiskLevel::Medium => self.medium,
            RiskLevel::High => self.high,
        }
    }
}
