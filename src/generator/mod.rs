//! Stratified synthetic wallet population.
//!
//! Each wallet is drawn for a target risk band and kept only if its
//! aggregate score lands in that band. A small per-attempt bleed chance and
//! a hard attempt cap bound the rejection loop.

pub mod bands;
pub mod rng;

use std::path::{Path, PathBuf};

use crate::config::GeneratorConfig;
use crate::risk::{aggregate_score, BandCounts, RiskLevel};
use crate::store::source::write_records;
use crate::store::{BehavioralMetrics, WalletRecord};

use self::rng::GeneratorRng;

/// Target wallets per band, in generation order.
pub const POPULATION: [(RiskLevel, usize); 3] = [
    (RiskLevel::Low, 30),
    (RiskLevel::Medium, 40),
    (RiskLevel::High, 30),
];

/// Baseline fee the overpay ratio is measured against.
pub const GAS_REFERENCE_FEE: f64 = 30.0;
pub const GAS_VOLATILITY: bands::Span = (5.0, 30.0);

const MONEY_DECIMALS: i32 = 2;
const RATIO_DECIMALS: i32 = 3;

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// A rounded candidate wallet. `wallet_score` is computed from the rounded
/// features, so the persisted row re-scores to itself.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub wallet_score: f64,
    pub illicit_ratio: f64,
    pub max_score: f64,
    pub avg_gas_paid: f64,
    pub gas_volatility: f64,
    pub gas_overpay_ratio: f64,
    pub tx_time_entropy: f64,
    pub automation_score: f64,
}

impl Candidate {
    pub fn into_record(self, wallet_id: String) -> WalletRecord {
        WalletRecord {
            wallet_id,
            wallet_score: self.wallet_score.into(),
            illicit_ratio: self.illicit_ratio.into(),
            max_score: self.max_score.into(),
            behavior: Some(BehavioralMetrics {
                avg_gas_paid: self.avg_gas_paid.into(),
                gas_volatility: self.gas_volatility.into(),
                gas_overpay_ratio: self.gas_overpay_ratio.into(),
                tx_time_entropy: self.tx_time_entropy.into(),
                automation_score: self.automation_score.into(),
            }),
        }
    }
}

/// One generated wallet and how it was accepted.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedWallet {
    pub target: RiskLevel,
    pub record: WalletRecord,
    pub attempts: u32,
    pub in_band: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenerationReport {
    pub path: PathBuf,
    /// Counts by target band.
    pub targets: BandCounts,
    /// Counts by the band each persisted score actually falls in.
    pub distribution: BandCounts,
    /// Wallets accepted outside their target band.
    pub bled: usize,
}

pub struct SyntheticGenerator {
    rng: GeneratorRng,
    bleed_probability: f64,
    max_attempts: u32,
}

impl SyntheticGenerator {
    pub fn new(config: &GeneratorConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => GeneratorRng::from_seed(seed),
            None => GeneratorRng::from_entropy(),
        };
        Self {
            rng,
            bleed_probability: config.bleed_probability,
            max_attempts: config.max_attempts.max(1),
        }
    }

    /// Draw one candidate for `target`. Not yet checked against the band.
    pub fn candidate(&mut self, target: RiskLevel) -> Candidate {
        let params = bands::draw(target, &mut self.rng);

        let avg_gas_paid = round_to(params.gas_base, MONEY_DECIMALS);
        let gas_volatility = round_to(
            self.rng.uniform(GAS_VOLATILITY.0, GAS_VOLATILITY.1),
            MONEY_DECIMALS,
        );
        let gas_overpay_ratio = round_to(avg_gas_paid / GAS_REFERENCE_FEE, MONEY_DECIMALS);

        let illicit_ratio = round_to(params.illicit_ratio, RATIO_DECIMALS);
        let max_score = round_to(params.max_score, MONEY_DECIMALS);
        let automation_score = round_to(params.automation_score, MONEY_DECIMALS);
        let tx_time_entropy = round_to(params.tx_time_entropy, RATIO_DECIMALS);

        let wallet_score = round_to(
            aggregate_score(illicit_ratio, max_score, automation_score, gas_overpay_ratio),
            MONEY_DECIMALS,
        );

        Candidate {
            wallet_score,
            illicit_ratio,
            max_score,
            avg_gas_paid,
            gas_volatility,
            gas_overpay_ratio,
            tx_time_entropy,
            automation_score,
        }
    }

    /// Rejection-sample one wallet for `target`.
    pub fn generate_wallet(&mut self, wallet_id: String, target: RiskLevel) -> GeneratedWallet {
        let mut attempts = 0u32;
        loop {
            attempts += 1;
            let candidate = self.candidate(target);
            let in_band = target.contains(candidate.wallet_score);

            let accept = if in_band {
                true
            } else if attempts >= self.max_attempts {
                tracing::warn!(
                    wallet_id = %wallet_id,
                    band = %target,
                    attempts,
                    score = candidate.wallet_score,
                    "Attempt cap reached, accepting out-of-band wallet"
                );
                true
            } else {
                self.rng.chance(self.bleed_probability)
            };

            if accept {
                return GeneratedWallet {
                    target,
                    record: candidate.into_record(wallet_id),
                    attempts,
                    in_band,
                };
            }
        }
    }

    /// The full population in band order, ids `WALLET_000` upwards.
    pub fn generate_population(&mut self) -> Vec<GeneratedWallet> {
        let total: usize = POPULATION.iter().map(|(_, n)| n).sum();
        let mut wallets = Vec::with_capacity(total);

        for (target, count) in POPULATION {
            for _ in 0..count {
                let wallet_id = format!("WALLET_{:03}", wallets.len());
                wallets.push(self.generate_wallet(wallet_id, target));
            }
        }

        wallets
    }

    pub fn shuffle(&mut self, wallets: &mut [GeneratedWallet]) {
        self.rng.shuffle(wallets);
    }

    /// Generate, shuffle and write the population to `path`.
    pub fn run(&mut self, path: &Path) -> eyre::Result<GenerationReport> {
        tracing::info!("Generating 100 stratified wallets (30 Low, 40 Medium, 30 High)");

        let mut wallets = self.generate_population();

        let mut targets = BandCounts::default();
        for wallet in &wallets {
            targets.record(wallet.target);
        }

        self.shuffle(&mut wallets);

        let records: Vec<WalletRecord> = wallets.iter().map(|w| w.record.clone()).collect();
        write_records(path, &records)?;

        let distribution = BandCounts::from_scores(records.iter().map(WalletRecord::score));
        let bled = wallets.iter().filter(|w| !w.in_band).count();

        tracing::info!(
            path = %path.display(),
            wallets = records.len(),
            bled,
            "Wrote synthetic wallet scores"
        );
        tracing::info!(
            low = distribution.low,
            medium = distribution.medium,
            high = distribution.high,
            "Distribution"
        );

        Ok(GenerationReport {
            path: path.to_path_buf(),
            targets,
            distribution,
            bled,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strict_config(seed: u64) -> GeneratorConfig {
        GeneratorConfig {
            seed: Some(seed),
            bleed_probability: 0.0,
            max_attempts: 100_000,
            ..GeneratorConfig::default()
        }
    }

    fn scores(wallets: &[GeneratedWallet]) -> Vec<f64> {
        let mut scores: Vec<f64> = wallets.iter().map(|w| w.record.score()).collect();
        scores.sort_by(f64::total_cmp);
        scores
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(12.345_67, 2), 12.35);
        assert_eq!(round_to(0.123_45, 3), 0.123);
        assert_eq!(round_to(40.0 / 30.0, 2), 1.33);
    }

    #[test]
    fn test_population_targets_are_stratified() {
        let mut generator = SyntheticGenerator::new(&strict_config(42));
        let wallets = generator.generate_population();
        assert_eq!(wallets.len(), 100);

        let mut targets = BandCounts::default();
        for wallet in &wallets {
            targets.record(wallet.target);
        }
        assert_eq!((targets.low, targets.medium, targets.high), (30, 40, 30));

        assert_eq!(wallets[0].record.wallet_id, "WALLET_000");
        assert_eq!(wallets[99].record.wallet_id, "WALLET_099");
        assert_eq!(wallets[30].target, RiskLevel::Medium);
    }

    #[test]
    fn test_strict_generation_hits_every_band() {
        let mut generator = SyntheticGenerator::new(&strict_config(7));
        let wallets = generator.generate_population();
        assert!(wallets.iter().all(|w| w.in_band));

        let counts = BandCounts::from_scores(wallets.iter().map(|w| w.record.score()));
        assert_eq!((counts.low, counts.medium, counts.high), (30, 40, 30));
    }

    #[test]
    fn test_scores_follow_the_aggregate_formula() {
        let mut generator = SyntheticGenerator::new(&strict_config(99));
        for wallet in generator.generate_population() {
            let f = wallet.record.features();
            let rescored = round_to(
                aggregate_score(
                    f.illicit_ratio,
                    f.max_score,
                    f.automation_score,
                    f.gas_overpay_ratio,
                ),
                2,
            );
            assert!((rescored - f.wallet_score).abs() < 0.01);
        }
    }

    #[test]
    fn test_shuffle_is_a_pure_reordering() {
        let mut generator = SyntheticGenerator::new(&strict_config(3));
        let mut wallets = generator.generate_population();
        let before = scores(&wallets);
        let ids_before: Vec<String> = wallets.iter().map(|w| w.record.wallet_id.clone()).collect();

        generator.shuffle(&mut wallets);

        assert_eq!(scores(&wallets), before);
        let ids_after: Vec<String> = wallets.iter().map(|w| w.record.wallet_id.clone()).collect();
        assert_ne!(ids_after, ids_before);
        let mut sorted = ids_after.clone();
        sorted.sort();
        assert_eq!(sorted, ids_before);
    }

    #[test]
    fn test_attempt_cap_terminates() {
        let config = GeneratorConfig {
            seed: Some(1),
            bleed_probability: 0.0,
            max_attempts: 1,
            ..GeneratorConfig::default()
        };
        let mut generator = SyntheticGenerator::new(&config);
        let wallets = generator.generate_population();
        assert_eq!(wallets.len(), 100);
        assert!(wallets.iter().all(|w| w.attempts == 1));
    }

    #[test]
    fn test_full_bleed_accepts_first_candidate() {
        let config = GeneratorConfig {
            seed: Some(1),
            bleed_probability: 1.0,
            max_attempts: 50,
            ..GeneratorConfig::default()
        };
        let mut generator = SyntheticGenerator::new(&config);
        let wallet = generator.generate_wallet("W".to_string(), RiskLevel::High);
        assert_eq!(wallet.attempts, 1);
    }

    #[test]
    fn test_same_seed_same_population() {
        let a = SyntheticGenerator::new(&strict_config(1234)).generate_population();
        let b = SyntheticGenerator::new(&strict_config(1234)).generate_population();
        assert_eq!(a, b);
    }

    #[test]
    fn test_generated_fields_are_rounded() {
        let mut generator = SyntheticGenerator::new(&strict_config(8));
        let c = generator.candidate(RiskLevel::Medium);
        assert_eq!(round_to(c.illicit_ratio, 3), c.illicit_ratio);
        assert_eq!(round_to(c.tx_time_entropy, 3), c.tx_time_entropy);
        assert_eq!(round_to(c.avg_gas_paid, 2), c.avg_gas_paid);
        assert_eq!(round_to(c.gas_overpay_ratio, 2), c.gas_overpay_ratio);
        assert_eq!(round_to(c.wallet_score, 2), c.wallet_score);
    }

    #[test]
    fn test_run_writes_and_reports() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wallet_scores.csv");
        let report = SyntheticGenerator::new(&strict_config(21))
            .run(&path)
            .unwrap();

        assert!(path.exists());
        assert_eq!(report.targets.total, 100);
        assert_eq!(report.distribution.total, 100);
        assert_eq!(report.bled, 0);
        assert_eq!(report.distribution, report.targets);
    }
}
