use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ModuleError;

/// Currency value in the smallest native unit (wei).
pub type Wei = u128;

/// One whole unit of the native currency, in wei.
pub const ETHER: Wei = 1_000_000_000_000_000_000;

/// Basis points in one whole (100%).
pub const BPS_DENOMINATOR: u16 = 10_000;

/// Upper bound on the platform fee rate: 1000 bps = 10%.
pub const MAX_FEE_RATE: BasisPoints = BasisPoints(1_000);

/// Account identity on the ledger: 20 raw bytes, shown as `0x`-prefixed hex.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address([u8; 20]);

impl Address {
    /// The null identity. Never a valid recipient or administrator.
    pub const ZERO: Address = Address([0u8; 20]);

    pub const fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 20]
    }

    /// Deterministically derive an address from a seed and a domain label.
    ///
    /// Takes the first 20 bytes of `BLAKE3(label || seed)`. Used to give a
    /// module instance its own account and to mint development identities.
    pub fn derive(seed: &[u8], label: &str) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(label.as_bytes());
        hasher.update(seed);
        let digest = hasher.finalize();
        let mut bytes = [0u8; 20];
        bytes.copy_from_slice(&digest.as_bytes()[..20]);
        Self(bytes)
    }

    /// Well-known development identity for `name` (`"admin"`, `"alice"`, ...).
    pub fn dev(name: &str) -> Self {
        Self::derive(name.as_bytes(), "scratch-dev")
    }

    /// Parse a `0x`-prefixed (or bare) 40-digit hex string.
    pub fn parse(s: &str) -> Result<Self, ModuleError> {
        let digits = s.strip_prefix("0x").unwrap_or(s);
        if digits.len() != 40 {
            return Err(ModuleError::InvalidAddress(format!(
                "expected 40 hex digits, got {}: {}",
                digits.len(),
                s
            )));
        }
        let mut bytes = [0u8; 20];
        hex::decode_to_slice(digits, &mut bytes)
            .map_err(|e| ModuleError::InvalidAddress(format!("{}: {}", s, e)))?;
        Ok(Self(bytes))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self)
    }
}

impl FromStr for Address {
    type Err = ModuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Address {
    type Error = ModuleError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Address> for String {
    fn from(address: Address) -> Self {
        address.to_string()
    }
}

/// A fee rate in basis points (1/10000).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BasisPoints(pub u16);

impl BasisPoints {
    pub const ZERO: BasisPoints = BasisPoints(0);

    pub fn value(&self) -> u16 {
        self.0
    }
}

impl From<u16> for BasisPoints {
    fn from(value: u16) -> Self {
        Self(value)
    }
}

impl fmt::Display for BasisPoints {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} bps", self.0)
    }
}

/// Identifier of the network the module executes on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChainId(pub u64);

impl ChainId {
    /// Local development chain.
    pub const DEVNET: ChainId = ChainId(31337);
    pub const SEPOLIA: ChainId = ChainId(11_155_111);
    pub const MAINNET: ChainId = ChainId(1);

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
