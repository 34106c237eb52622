use serde::{Deserialize, Serialize};

use crate::error::ModuleError;
use crate::types::{Address, BasisPoints, ChainId, MAX_FEE_RATE};

/// Construction parameters for a settlement module instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleConfig {
    /// Initial administrator; also receives platform fees.
    pub administrator: Address,
    /// Initial platform fee rate.
    #[serde(default)]
    pub fee_rate: BasisPoints,
    /// Refuse administrator transfers to the zero address.
    #[serde(default)]
    pub harden_admin_transfer: bool,
    /// Seed the module account address is derived from.
    #[serde(default = "default_deployment_salt")]
    pub deployment_salt: String,
}

fn default_deployment_salt() -> String {
    "scratch-v1".into()
}

impl ModuleConfig {
    /// Config with the given administrator and every other field defaulted.
    pub fn new(administrator: Address) -> Self {
        Self {
            administrator,
            fee_rate: BasisPoints::ZERO,
            harden_admin_transfer: false,
            deployment_salt: default_deployment_salt(),
        }
    }

    pub fn with_fee_rate(mut self, fee_rate: BasisPoints) -> Self {
        self.fee_rate = fee_rate;
        self
    }

    pub fn with_hardening(mut self, harden: bool) -> Self {
        self.harden_admin_transfer = harden;
        self
    }

    pub fn with_salt(mut self, salt: impl Into<String>) -> Self {
        self.deployment_salt = salt.into();
        self
    }

    /// Address of the module's own account for this deployment.
    pub fn module_address(&self) -> Address {
        let mut seed = self.administrator.as_bytes().to_vec();
        seed.extend_from_slice(self.deployment_salt.as_bytes());
        Address::derive(&seed, "scratch-module")
    }

    /// Check construction invariants.
    pub fn validate(&self) -> Result<(), ModuleError> {
        if self.administrator.is_zero() {
            return Err(ModuleError::InvalidAdministrator);
        }
        if self.fee_rate > MAX_FEE_RATE {
            return Err(ModuleError::FeeTooHigh {
                requested: self.fee_rate,
                max: MAX_FEE_RATE,
            });
        }
        Ok(())
    }
}

/// Parameters describing the network a module is deployed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainConfig {
    pub chain_id: ChainId,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            chain_id: ChainId::DEVNET,
        }
    }
}
