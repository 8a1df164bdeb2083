//! Configuration for a SpokePool engine instance.

use serde::{Deserialize, Serialize};

use crate::{Address, DomainId, Result, SpokePoolError};

/// Deployment-time configuration of one engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpokeConfig {
    /// The domain this engine serves. Leaves for any other domain are rejected.
    pub domain_id: DomainId,
    /// Address under which the engine holds its own token balances.
    pub vault: Address,
    /// Initial state of the fills-pause flag. Does not gate leaf execution.
    #[serde(default)]
    pub fills_paused: bool,
}

impl SpokeConfig {
    #[must_use]
    pub fn new(domain_id: DomainId, vault: Address) -> Self {
        Self {
            domain_id,
            vault,
            fills_paused: false,
        }
    }

    /// Parse a JSON config document.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| SpokePoolError::Configuration(e.to_string()))?;
        if config.vault == Address::ZERO {
            return Err(SpokePoolError::Configuration(
                "vault address must not be zero".into(),
            ));
        }
        Ok(config)
    }
}
