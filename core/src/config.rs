use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;
use std::path::Path;

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct EncoderConfig {
    pub hidden_dim: usize,
    pub epochs: usize,
    pub learning_rate: f32,
    /// Seed for weight initialization; unset draws from entropy.
    pub seed: Option<u64>,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            hidden_dim: 16,
            epochs: 200,
            learning_rate: 0.01,
            seed: None,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ScoringConfig {
    pub top_k: usize,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self { top_k: 10 }
    }
}

#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub encoder: EncoderConfig,
    pub scoring: ScoringConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let builder = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            .add_source(Environment::with_prefix("CHAINSIGHT"));

        builder.build()?.try_deserialize()
    }

    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::from(path.as_ref()))
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_documented_values() {
        let config = AppConfig::default();
        assert_eq!(config.encoder.hidden_dim, 16);
        assert_eq!(config.encoder.epochs, 200);
        assert_eq!(config.encoder.learning_rate, 0.01);
        assert_eq!(config.encoder.seed, None);
        assert_eq!(config.scoring.top_k, 10);
    }

    #[test]
    fn load_from_file_overrides_partially() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pipeline.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "[encoder]\nepochs = 50\nseed = 7\n\n[scoring]\ntop_k = 3").unwrap();

        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.encoder.epochs, 50);
        assert_eq!(config.encoder.seed, Some(7));
        assert_eq!(config.scoring.top_k, 3);
        // untouched keys keep their defaults
        assert_eq!(config.encoder.hidden_dim, 16);
        assert_eq!(config.encoder.learning_rate, 0.01);
    }
}
