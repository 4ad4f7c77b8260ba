use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Configuration for the transition engine.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Candidate case ids tried before `createShippingCase` gives up.
    pub max_id_attempts: u32,
    /// Reject transfers that would leave the source balance below zero.
    ///
    /// Off by default: the legacy ledger lets balances go negative, and
    /// existing deployments rely on that.
    pub enforce_non_negative: bool,
    /// Seed for case id generation. `None` draws from OS entropy.
    pub case_id_seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_id_attempts: 8,
            enforce_non_negative: false,
            case_id_seed: None,
        }
    }
}

impl EngineConfig {
    /// Configuration with the sufficient-funds check enabled.
    pub fn hardened() -> Self {
        Self {
            enforce_non_negative: true,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> EngineResult<()> {
        if self.max_id_attempts == 0 {
            return Err(EngineError::InvalidConfig(
                "max_id_attempts must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
