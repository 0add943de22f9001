pub mod handlers;
pub mod types;

use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::risk::RiskEngine;
use crate::store::WalletStore;

pub struct AppState {
    pub store: WalletStore,
    pub engine: RiskEngine,
}

pub fn router(store: WalletStore) -> Router {
    let state = Arc::new(AppState {
        store,
        engine: RiskEngine::new(),
    });

    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/wallets", get(handlers::all_wallets))
        .route("/wallets/top", get(handlers::top_wallets))
        .route("/wallet/{wallet_id}", get(handlers::wallet_details))
        .route(
            "/wallet/{wallet_id}/behavior",
            get(handlers::wallet_behavior),
        )
        .route(
            "/wallet/{wallet_id}/explain",
            get(handlers::wallet_explanation),
        )
        .route("/summary", get(handlers::summary))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

pub async fn serve(store: WalletStore, host: &str, port: u16) -> eyre::Result<()> {
    let app = router(store);
    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "API server listening");
    axum::serve(listener, app).await?;
    Ok(())
}
