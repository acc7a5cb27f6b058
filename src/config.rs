//! Game configuration
//!
//! Resolution order: explicit `--config` path, then
//! `<config_dir>/margin-masters/config.json` if it exists, then defaults.
//! `MARGIN_MASTERS_SEED` overrides the seed from any source.

use crate::catalog::CatalogSet;
use crate::engine::TerminationRule;
use crate::error::GameError;
use crate::state::InitialValues;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const SEED_ENV: &str = "MARGIN_MASTERS_SEED";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GameConfig {
    pub catalog: CatalogSet,
    pub termination: TerminationRule,
    /// Fixed RNG seed for reproducible games (None = entropy)
    pub seed: Option<u64>,
    pub initial: InitialValues,
}

impl GameConfig {
    /// Parse a config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {:?}", path))?;
        let config: GameConfig = serde_json::from_str(&content)
            .with_context(|| format!("Invalid config {:?}", path))?;
        Ok(config)
    }

    /// Resolve configuration for a run
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let seed_override = std::env::var(SEED_ENV).ok();
        Self::resolve(explicit, default_config_path(), seed_override.as_deref())
    }

    fn resolve(explicit: Option<&Path>, fallback: Option<PathBuf>, seed_override: Option<&str>) -> Result<Self> {
        let mut config = match explicit {
            Some(path) => Self::from_file(path)?,
            None => match fallback {
                Some(path) if path.exists() => Self::from_file(&path)?,
                _ => Self::default(),
            },
        };

        if let Some(raw) = seed_override {
            let seed = raw
                .trim()
                .parse::<u64>()
                .with_context(|| format!("{} must be an unsigned integer, got '{}'", SEED_ENV, raw))?;
            config.seed = Some(seed);
        }

        config.validate()?;
        Ok(config)
    }

    /// Reject starting values no game can be played from
    pub fn validate(&self) -> crate::error::Result<()> {
        let initial = &self.initial;
        if !(initial.revenue.is_finite() && initial.revenue > 0.0) {
            return Err(GameError::InvalidConfig(format!(
                "initial revenue must be positive, got {}",
                initial.revenue
            )));
        }
        if !(initial.initial_margin.is_finite() && initial.cash_flow.is_finite()) {
            return Err(GameError::InvalidConfig(
                "initial margin and cash flow must be finite".to_string(),
            ));
        }
        Ok(())
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|base| base.join("margin-masters").join("config.json"))
}
