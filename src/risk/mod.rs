pub mod engine;
pub mod rules;
pub mod scoring;
pub mod types;

pub use engine::{Assessment, RiskEngine};
pub use scoring::aggregate_score;
pub use types::{BandCounts, FeatureVector, RiskLevel};
