use serde::Deserialize;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub generator: GeneratorConfig,
}

// ============================================================
// Store Config
// ============================================================

#[derive(Debug, Deserialize, Clone)]
pub struct StoreConfig {
    #[serde(default = "default_scores_path")]
    pub path: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_scores_path(),
        }
    }
}

fn default_scores_path() -> String {
    "wallet_scores.csv".to_string()
}

// ============================================================
// API Config
// ============================================================

#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    #[serde(default = "default_api_port")]
    pub port: u16,
    #[serde(default = "default_api_host")]
    pub host: String,
    /// Load the score file before accepting requests instead of on first query.
    #[serde(default = "default_true")]
    pub preload: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            port: 8000,
            host: "0.0.0.0".to_string(),
            preload: true,
        }
    }
}

fn default_api_port() -> u16 {
    8000
}

fn default_api_host() -> String {
    "0.0.0.0".to_string()
}

fn default_true() -> bool {
    true
}

// ============================================================
// Generator Config
// ============================================================

#[derive(Debug, Deserialize, Clone)]
pub struct GeneratorConfig {
    #[serde(default = "default_scores_path")]
    pub output_path: String,
    /// Fixed seed for a reproducible population. Random when unset.
    pub seed: Option<u64>,
    /// Chance per rejected attempt of keeping the candidate anyway.
    #[serde(default = "default_bleed_probability")]
    pub bleed_probability: f64,
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            output_path: default_scores_path(),
            seed: None,
            bleed_probability: default_bleed_probability(),
            max_attempts: default_max_attempts(),
        }
    }
}

fn default_bleed_probability() -> f64 {
    0.05
}

fn default_max_attempts() -> u32 {
    1_000
}

impl Config {
    pub fn load(path: &str) -> eyre::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| eyre::eyre!("Failed to read config file '{}': {}", path, e))?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| eyre::eyre!("Failed to parse config file '{}': {}", path, e))?;
        config.validate()?;
        Ok(config)
    }

    /// Like [`Config::load`], but a missing file yields the defaults.
    pub fn load_or_default(path: &str) -> eyre::Result<Self> {
        if std::path::Path::new(path).exists() {
            Self::load(path)
        } else {
            tracing::warn!(path, "Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    fn validate(&self) -> eyre::Result<()> {
        if self.store.path.trim().is_empty() {
            return Err(eyre::eyre!("store.path must not be empty"));
        }
        if self.generator.output_path.trim().is_empty() {
            return Err(eyre::eyre!("generator.output_path must not be empty"));
        }
        let bleed = self.generator.bleed_probability;
        if !(0.0..=1.0).contains(&bleed) {
            return Err(eyre::eyre!(
                "generator.bleed_probability must be within [0, 1], got {}",
                bleed
            ));
        }
        if self.generator.max_attempts == 0 {
            return Err(eyre::eyre!("generator.max_attempts must be at least 1"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let toml_str = r#"
[store]
path = "data/scores.csv"

[api]
port = 9000
preload = true

[generator]
seed = 42
"#;

        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.store.path, "data/scores.csv");
        assert_eq!(config.api.port, 9000);
        assert_eq!(config.api.host, "0.0.0.0"); // default
        assert!(config.api.preload);
        assert_eq!(config.generator.seed, Some(42));
        assert_eq!(config.generator.max_attempts, 1_000); // default
        assert_eq!(config.generator.output_path, "wallet_scores.csv"); // default
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.store.path, "wallet_scores.csv");
        assert_eq!(config.api.port, 8000);
        assert!((config.generator.bleed_probability - 0.05).abs() < f64::EPSILON);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_preload_defaults_on() {
        assert!(ApiConfig::default().preload);

        let config: Config = toml::from_str("").unwrap();
        assert!(config.api.preload);

        let config: Config = toml::from_str("[api]\nport = 9001\n").unwrap();
        assert!(config.api.preload);

        let config: Config = toml::from_str("[api]\npreload = false\n").unwrap();
        assert!(!config.api.preload);
    }

    #[test]
    fn test_validate_bad_bleed_probability() {
        let config = Config {
            generator: GeneratorConfig {
                bleed_probability: 1.5,
                ..GeneratorConfig::default()
            },
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_zero_attempts() {
        let config = Config {
            generator: GeneratorConfig {
                max_attempts: 0,
                ..GeneratorConfig::default()
            },
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }
}
