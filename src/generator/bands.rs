use crate::risk::RiskLevel;

use super::rng::GeneratorRng;

/// Closed uniform range `(low, high)`.
pub type Span = (f64, f64);

/// Parameter ranges for one target band.
#[derive(Debug, Clone, Copy)]
pub struct BandProfile {
    pub illicit_ratio: Span,
    pub max_score: Span,
    pub automation_score: Span,
    pub tx_time_entropy: Span,
    pub gas_base: Span,
}

pub const LOW_PROFILE: BandProfile = BandProfile {
    illicit_ratio: (0.0, 0.1),
    max_score: (0.0, 10.0),
    automation_score: (0.0, 0.3),
    tx_time_entropy: (0.6, 1.0),
    gas_base: (20.0, 40.0),
};

pub const MEDIUM_PROFILE: BandProfile = BandProfile {
    illicit_ratio: (0.1, 0.35),
    max_score: (5.0, 20.0),
    automation_score: (0.2, 0.6),
    tx_time_entropy: (0.3, 0.7),
    gas_base: (30.0, 60.0),
};

/// High risk through direct illicit exposure.
pub const HIGH_PROFILE: BandProfile = BandProfile {
    illicit_ratio: (0.3, 0.8),
    max_score: (15.0, 50.0),
    automation_score: (0.6, 1.0),
    tx_time_entropy: (0.0, 0.4),
    gas_base: (50.0, 150.0),
};

/// Share of high-risk wallets that launder through behavior rather than
/// illicit funds.
pub const BEHAVIORAL_LAUNDERING_SHARE: f64 = 0.3;
pub const LAUNDERING_ILLICIT_RATIO: Span = (0.0, 0.2);
pub const LAUNDERING_AUTOMATION_SCORE: Span = (0.8, 1.0);
pub const LAUNDERING_GAS_BASE: Span = (100.0, 200.0);

/// Below this illicit ratio a high-risk wallet needs the behavioral boost.
const LAUNDERING_BOOST_BELOW: f64 = 0.2;

pub fn profile(level: RiskLevel) -> BandProfile {
    match level {
        RiskLevel::Low => LOW_PROFILE,
        RiskLevel::Medium => MEDIUM_PROFILE,
        RiskLevel::High => HIGH_PROFILE,
    }
}

/// Raw, unrounded parameters for one candidate wallet.
#[derive(Debug, Clone, Copy)]
pub struct ParameterDraw {
    pub illicit_ratio: f64,
    pub max_score: f64,
    pub automation_score: f64,
    pub tx_time_entropy: f64,
    pub gas_base: f64,
}

fn sample(rng: &mut GeneratorRng, (low, high): Span) -> f64 {
    rng.uniform(low, high)
}

pub fn draw(level: RiskLevel, rng: &mut GeneratorRng) -> ParameterDraw {
    let profile = profile(level);
    let illicit_ratio = if level == RiskLevel::High && rng.chance(BEHAVIORAL_LAUNDERING_SHARE) {
        sample(rng, LAUNDERING_ILLICIT_RATIO)
    } else {
        sample(rng, profile.illicit_ratio)
    };

    let mut params = ParameterDraw {
        illicit_ratio,
        max_score: sample(rng, profile.max_score),
        automation_score: sample(rng, profile.automation_score),
        tx_time_entropy: sample(rng, profile.tx_time_entropy),
        gas_base: sample(rng, profile.gas_base),
    };

    if level == RiskLevel::High && params.illicit_ratio < LAUNDERING_BOOST_BELOW {
        params.automation_score = sample(rng, LAUNDERING_AUTOMATION_SCORE);
        params.gas_base = sample(rng, LAUNDERING_GAS_BASE);
    }

    params
}
