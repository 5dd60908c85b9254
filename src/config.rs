//! Orchestrator configuration.
//!
//! Every numeric knob the core consults lives here and is supplied by the
//! embedder, either programmatically or from a YAML file. Nothing in the
//! component logic hardcodes a threshold or budget.

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::OrchestratorError;

/// External configuration for a session run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OrchestratorConfig {
    /// Minimum acceptable score per criterion (1-7 scale).
    pub adequacy_threshold: u8,
    /// Maximum collaborator turns per session.
    pub max_turns: u32,
    /// Consecutive stagnant revision passes before an example is stalled.
    pub max_stagnant_passes: u32,
    /// Attempts the router grants a stage before declaring it blocked.
    pub stage_retry_limit: u32,
    /// Per-turn timeout in seconds.
    pub turn_timeout_secs: u64,
    /// Overall wall-clock budget for a session, in seconds.
    pub session_timeout_secs: u64,
    /// Opaque rubric text per capability, keyed by the capability's
    /// kebab-case name. Passed verbatim into prompt contexts.
    pub rubrics: BTreeMap<String, String>,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            adequacy_threshold: 4,
            max_turns: 100,
            max_stagnant_passes: 3,
            stage_retry_limit: 3,
            turn_timeout_secs: 60,
            session_timeout_secs: 3600,
            rubrics: BTreeMap::new(),
        }
    }
}

impl OrchestratorConfig {
    /// Parse a configuration from YAML text.
    pub fn from_yaml(text: &str) -> Result<Self, OrchestratorError> {
        let config: Self = serde_yaml::from_str(text)
            .map_err(|e| OrchestratorError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, OrchestratorError> {
        let text = std::fs::read_to_string(path.as_ref())
            .map_err(|e| OrchestratorError::InvalidConfig(e.to_string()))?;
        Self::from_yaml(&text)
    }

    /// Check internal consistency.
    pub fn validate(&self) -> Result<(), OrchestratorError> {
        if !(1..=7).contains(&self.adequacy_threshold) {
            return Err(OrchestratorError::InvalidConfig(format!(
                "adequacy_threshold must be within 1..=7, got {}",
                self.adequacy_threshold
            )));
        }
        if self.max_turns == 0 {
            return Err(OrchestratorError::InvalidConfig(
                "max_turns must be at least 1".into(),
            ));
        }
        if self.stage_retry_limit == 0 {
            return Err(OrchestratorError::InvalidConfig(
                "stage_retry_limit must be at least 1".into(),
            ));
        }
        if self.turn_timeout_secs == 0 || self.session_timeout_secs == 0 {
            return Err(OrchestratorError::InvalidConfig(
                "timeouts must be non-zero".into(),
            ));
        }
        Ok(())
    }

    /// Per-turn timeout as a [`Duration`].
    pub fn turn_timeout(&self) -> Duration {
        Duration::from_secs(self.turn_timeout_secs)
    }

    /// Session wall-clock budget as a [`Duration`].
    pub fn session_timeout(&self) -> Duration {
        Duration::from_secs(self.session_timeout_secs)
    }

    /// Rubric text configured for a capability, if any.
    pub fn rubric_for(&self, capability: &str) -> Option<&str> {
        self.rubrics.get(capability).map(String::as_str)
    }
}
