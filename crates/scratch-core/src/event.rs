//! Events emitted by the settlement module.
//!
//! Events are the only audit trail the module produces. They are built and
//! emitted in the same state transition as the fund movement they describe
//! and never change afterwards.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{Address, BasisPoints, Wei};

/// A settled payment. `amount` is the gross value attached by the sender,
/// so observers can recompute the fee from the rate in force.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentSent {
    pub sender: Address,
    pub recipient: Address,
    pub amount: Wei,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeRateUpdated {
    pub previous: BasisPoints,
    pub current: BasisPoints,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdministratorTransferred {
    pub previous: Address,
    pub current: Address,
    pub timestamp: DateTime<Utc>,
}

/// Any event the module can emit.
/// Externally tagged on the wire (`{"PaymentSent": {..}}`), which keeps
/// wei amounts above `u64::MAX` decodable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModuleEvent {
    PaymentSent(PaymentSent),
    FeeRateUpdated(FeeRateUpdated),
    AdministratorTransferred(AdministratorTransferred),
}

impl ModuleEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::PaymentSent(_) => "PaymentSent",
            Self::FeeRateUpdated(_) => "FeeRateUpdated",
            Self::AdministratorTransferred(_) => "AdministratorTransferred",
        }
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Self::PaymentSent(e) => e.timestamp,
            Self::FeeRateUpdated(e) => e.timestamp,
            Self::AdministratorTransferred(e) => e.timestamp,
        }
    }

    pub fn as_payment(&self) -> Option<&PaymentSent> {
        match self {
            Self::PaymentSent(e) => Some(e),
            _ => None,
        }
    }
}
