use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::errors::CoreError;

/// Blob-store key the session snapshot lives under.
pub const DEFAULT_STORAGE_KEY: &str = "neon_ex_state";

/// Default generative-language REST endpoint.
pub const DEFAULT_ANALYSIS_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default text-generation model used for analysis blurbs.
pub const DEFAULT_ANALYSIS_MODEL: &str = "gemini-3-flash-preview";

/// Price simulation parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Period between ticks, in milliseconds.
    pub tick_interval_ms: u64,

    /// Width of the uniform delta band: `delta = (U[0,1) - 0.5) * volatility`.
    pub volatility: f64,

    /// Number of samples kept in every instrument's rolling history.
    pub history_len: usize,

    /// Fixed RNG seed for reproducible runs. `None` seeds from OS entropy.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 5_000,
            volatility: 0.005,
            history_len: 20,
            seed: None,
        }
    }
}

impl SimulationConfig {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

/// Settings for the outbound analysis request.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    pub base_url: String,
    pub model: String,

    /// Upper bound on a single analysis request, in seconds.
    pub timeout_secs: u64,

    #[serde(default)]
    pub api_key: Option<String>,
}

// Hand-written so the key never shows up in logs.
impl std::fmt::Debug for AnalysisConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnalysisConfig")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("timeout_secs", &self.timeout_secs)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_ANALYSIS_BASE_URL.to_string(),
            model: DEFAULT_ANALYSIS_MODEL.to_string(),
            timeout_secs: 30,
            api_key: None,
        }
    }
}

impl AnalysisConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Top-level configuration for a [`crate::MarketSession`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_storage_key")]
    pub storage_key: String,

    #[serde(default)]
    pub simulation: SimulationConfig,

    #[serde(default)]
    pub analysis: AnalysisConfig,
}

fn default_storage_key() -> String {
    DEFAULT_STORAGE_KEY.to_string()
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            storage_key: default_storage_key(),
            simulation: SimulationConfig::default(),
            analysis: AnalysisConfig::default(),
        }
    }
}

impl SessionConfig {
    /// Defaults, overridden by environment variables:
    /// - `API_KEY` (or `GEMINI_API_KEY`): analysis service key
    /// - `NEON_EX_TICK_MS`: simulation tick period
    /// - `NEON_EX_SEED`: fixed simulation seed
    pub fn from_env() -> Result<Self, CoreError> {
        let mut config = Self::default();

        config.analysis.api_key = std::env::var("API_KEY")
            .or_else(|_| std::env::var("GEMINI_API_KEY"))
            .ok()
            .filter(|k| !k.trim().is_empty());

        if let Ok(raw) = std::env::var("NEON_EX_TICK_MS") {
            config.simulation.tick_interval_ms = raw.trim().parse().map_err(|e| {
                CoreError::Config(format!("NEON_EX_TICK_MS must be an integer: {e}"))
            })?;
        }

        if let Ok(raw) = std::env::var("NEON_EX_SEED") {
            let seed = raw
                .trim()
                .parse()
                .map_err(|e| CoreError::Config(format!("NEON_EX_SEED must be an integer: {e}")))?;
            config.simulation.seed = Some(seed);
        }

        config.validate()?;
        Ok(config)
    }

    /// Reject settings the session cannot run with.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.storage_key.trim().is_empty() {
            return Err(CoreError::Config("storage_key must not be empty".into()));
        }
        if self.simulation.tick_interval_ms == 0 {
            return Err(CoreError::Config("tick_interval_ms must be positive".into()));
        }
        if self.simulation.history_len == 0 {
            return Err(CoreError::Config("history_len must be positive".into()));
        }
        let v = self.simulation.volatility;
        if !v.is_finite() || v < 0.0 {
            return Err(CoreError::Config(format!(
                "volatility must be a finite non-negative number, got {v}"
            )));
        }
        if self.analysis.timeout_secs == 0 {
            return Err(CoreError::Config("analysis timeout_secs must be positive".into()));
        }
        Ok(())
    }
}
