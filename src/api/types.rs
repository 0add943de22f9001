use serde::{Deserialize, Serialize};

use crate::risk::RiskLevel;
use crate::store::{BehavioralMetrics, WalletRecord};

// ============================================================
// Query params
// ============================================================

#[derive(Debug, Deserialize)]
pub struct TopParams {
    pub n: Option<usize>,
}

// ============================================================
// Response types
// ============================================================

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
}

/// A stored record annotated with its band at query time.
#[derive(Debug, Serialize)]
pub struct ScoredWallet {
    #[serde(flatten)]
    pub record: WalletRecord,
    pub risk_level: RiskLevel,
}

impl From<WalletRecord> for ScoredWallet {
    fn from(record: WalletRecord) -> Self {
        let risk_level = RiskLevel::from_score(record.score());
        Self { record, risk_level }
    }
}

#[derive(Debug, Serialize)]
pub struct BehaviorResponse {
    pub wallet_id: String,
    pub metrics: BehavioralMetrics,
    pub analysis: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ExplainResponse {
    pub wallet_id: String,
    pub risk_score: f64,
    pub risk_level: RiskLevel,
    pub reasons: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub total_wallets: usize,
    pub high_risk: usize,
    pub medium_risk: usize,
    pub low_risk: usize,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub detail: String,
}
