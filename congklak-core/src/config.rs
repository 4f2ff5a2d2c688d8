//! Engine configuration: difficulty levels, search limits and weights

use crate::eval::EvalWeights;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

/// Errors from parsing configuration values
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("unknown difficulty {0:?} (expected easy, medium, hard, expert or 1-4)")]
    UnknownDifficulty(String),
}

/// Depth and wall-clock budget for one search
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SearchLimits {
    /// Deepest iteration to attempt
    pub max_depth: u32,
    /// Soft time budget, in seconds when serialized
    #[serde(with = "duration_secs")]
    pub max_time: Duration,
}

impl SearchLimits {
    pub fn new(max_depth: u32, max_time: Duration) -> Self {
        Self {
            max_depth,
            max_time,
        }
    }
}

impl Default for SearchLimits {
    fn default() -> Self {
        Difficulty::default().limits()
    }
}

/// Preset strength levels
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
    Expert,
}

impl Difficulty {
    pub fn limits(self) -> SearchLimits {
        match self {
            Difficulty::Easy => SearchLimits::new(6, Duration::from_millis(1000)),
            Difficulty::Medium => SearchLimits::new(8, Duration::from_millis(1500)),
            Difficulty::Hard => SearchLimits::new(10, Duration::from_millis(2000)),
            Difficulty::Expert => SearchLimits::new(12, Duration::from_millis(3000)),
        }
    }
}

impl FromStr for Difficulty {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "1" | "easy" => Ok(Difficulty::Easy),
            "2" | "medium" => Ok(Difficulty::Medium),
            "3" | "hard" => Ok(Difficulty::Hard),
            "4" | "expert" => Ok(Difficulty::Expert),
            _ => Err(ConfigError::UnknownDifficulty(s.to_string())),
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
            Difficulty::Expert => "Expert",
        };
        write!(f, "{}", name)
    }
}

/// Full engine setup, loadable from JSON
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub limits: SearchLimits,
    #[serde(default)]
    pub weights: EvalWeights,
}

impl EngineConfig {
    pub fn from_difficulty(difficulty: Difficulty) -> Self {
        Self {
            limits: difficulty.limits(),
            weights: EvalWeights::default(),
        }
    }

    /// Load from a JSON file; missing sections fall back to defaults
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read engine config: {}", path.display()))?;
        let config = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse engine config: {}", path.display()))?;
        Ok(config)
    }

    /// Write as pretty-printed JSON
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write engine config: {}", path.display()))?;
        Ok(())
    }
}

/// Serialize a `Duration` as fractional seconds
mod duration_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(value.as_secs_f64())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs).map_err(serde::de::Error::custom)
    }
}
