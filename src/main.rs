use tracing_subscriber::EnvFilter;

use aml_wallet_risk::config::Config;
use aml_wallet_risk::store::WalletStore;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    color_eyre::install()?;

    // Initialize structured logging (set RUST_LOG=debug for more output)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    tracing::info!("AML wallet risk API starting");

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.toml".to_string());

    let config = Config::load_or_default(&config_path)?;
    tracing::info!(
        store = %config.store.path,
        "Configuration loaded from {}",
        config_path
    );

    let mut store = WalletStore::new(&config.store.path);
    if config.api.preload {
        // File IO stays off the async workers
        store = tokio::task::spawn_blocking(move || {
            let records = store.load();
            tracing::info!(wallets = records.len(), "Wallet scores preloaded");
            store
        })
        .await?;
    }

    aml_wallet_risk::api::serve(store, &config.api.host, config.api.port).await?;

    tracing::info!("AML wallet risk API stopped");
    Ok(())
}
