//! Voting configuration container
//!
//! Groups the consensus policy with engine-level settings. Use cases
//! receive only the [`ConsensusPolicy`] slice they need; embedders hold the
//! full `VotingConfig` and wire it in at startup (typically loaded from
//! file/env by the infrastructure config loader).

use serde::{Deserialize, Serialize};
use std::time::Duration;
use wayfarer_domain::ConsensusPolicy;

/// Configuration for the voting engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VotingConfig {
    /// Thresholds and timing windows for the decision rules
    pub policy: ConsensusPolicy,
    /// Seconds between periodic re-evaluation passes (sweep)
    pub sweep_interval_secs: u64,
}

impl Default for VotingConfig {
    fn default() -> Self {
        Self {
            policy: ConsensusPolicy::default(),
            sweep_interval_secs: 60,
        }
    }
}

impl VotingConfig {
    /// Thresholds and timing windows for the decision rules
    pub fn policy(&self) -> &ConsensusPolicy {
        &self.policy
    }

    /// Sweep cadence as a `Duration`
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }

    /// Replace the consensus policy
    pub fn with_policy(mut self, policy: ConsensusPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Set the sweep cadence in seconds
    pub fn with_sweep_interval_secs(mut self, secs: u64) -> Self {
        self.sweep_interval_secs = secs;
        self
    }
}
