use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use std::sync::Arc;

use crate::store::WalletRecord;

use super::types::*;
use super::AppState;

type ApiResult<T> = Result<Json<T>, (StatusCode, Json<ErrorResponse>)>;

const DEFAULT_TOP_N: usize = 5;

fn api_error(status: StatusCode, msg: impl Into<String>) -> (StatusCode, Json<ErrorResponse>) {
    (
        status,
        Json(ErrorResponse {
            detail: msg.into(),
        }),
    )
}

fn find_wallet(
    state: &AppState,
    wallet_id: &str,
) -> Result<WalletRecord, (StatusCode, Json<ErrorResponse>)> {
    state
        .store
        .get_by_id(wallet_id)
        .ok_or_else(|| api_error(StatusCode::NOT_FOUND, "Wallet not found"))
}

// ============================================================
// Health
// ============================================================

pub async fn root() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "AML Guardian backend is running".to_string(),
    })
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        service: "AML Backend".to_string(),
    })
}

// ============================================================
// Wallets
// ============================================================

pub async fn all_wallets(State(state): State<Arc<AppState>>) -> Json<Vec<WalletRecord>> {
    Json(state.store.get_all().to_vec())
}

pub async fn top_wallets(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TopParams>,
) -> Json<Vec<ScoredWallet>> {
    let n = params.n.unwrap_or(DEFAULT_TOP_N);
    Json(
        state
            .store
            .get_top(n)
            .into_iter()
            .map(ScoredWallet::from)
            .collect(),
    )
}

pub async fn wallet_details(
    State(state): State<Arc<AppState>>,
    Path(wallet_id): Path<String>,
) -> ApiResult<ScoredWallet> {
    find_wallet(&state, &wallet_id).map(|w| Json(w.into()))
}

pub async fn wallet_behavior(
    State(state): State<Arc<AppState>>,
    Path(wallet_id): Path<String>,
) -> ApiResult<BehaviorResponse> {
    let wallet = find_wallet(&state, &wallet_id)?;
    let analysis = state.engine.explain(&wallet.features());
    Ok(Json(BehaviorResponse {
        wallet_id,
        metrics: wallet.behavior.unwrap_or_default(),
        analysis,
    }))
}

pub async fn wallet_explanation(
    State(state): State<Arc<AppState>>,
    Path(wallet_id): Path<String>,
) -> ApiResult<ExplainResponse> {
    let wallet = find_wallet(&state, &wallet_id)?;
    let assessment = state.engine.assess(&wallet.features());
    Ok(Json(ExplainResponse {
        wallet_id,
        risk_score: assessment.risk_score,
        risk_level: assessment.risk_level,
        reasons: assessment.reasons,
    }))
}

// ============================================================
// Summary
// ============================================================

pub async fn summary(State(state): State<Arc<AppState>>) -> Json<SummaryResponse> {
    let counts = state.store.summary();
    Json(SummaryResponse {
        total_wallets: counts.total,
        high_risk: counts.high,
        medium_risk: counts.medium,
        low_risk: counts.low,
    })
}
