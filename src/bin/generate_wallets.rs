use std::path::Path;

use tracing_subscriber::EnvFilter;

use aml_wallet_risk::config::Config;
use aml_wallet_risk::generator::SyntheticGenerator;

fn main() -> eyre::Result<()> {
    color_eyre::install()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.toml".to_string());
    let config = Config::load_or_default(&config_path)?;

    let output = Path::new(&config.generator.output_path);
    let report = SyntheticGenerator::new(&config.generator).run(output)?;

    println!(
        "Successfully generated {} with {} wallets.",
        report.path.display(),
        report.distribution.total
    );
    println!(
        "Distribution -> Low: {}, Med: {}, High: {}",
        report.distribution.low, report.distribution.medium, report.distribution.high
    );
    Ok(())
}
