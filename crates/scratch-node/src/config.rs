//! Node configuration loading and management.

use anyhow::Context;
use scratch_core::{Address, BasisPoints, ChainConfig, ChainId, ModuleConfig, Wei, ETHER};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;

/// Full configuration for a Scratch node.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ScratchConfig {
    /// Network the ledger reports.
    #[serde(default)]
    pub chain: ChainConfig,

    /// Settlement module deployment.
    #[serde(default)]
    pub module: ModuleSection,

    /// Genesis balances of the in-memory ledger.
    #[serde(default)]
    pub ledger: LedgerConfig,

    /// API server settings.
    #[serde(default)]
    pub api: ApiConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleSection {
    /// Initial administrator and fee recipient.
    #[serde(default = "default_administrator")]
    pub administrator: Address,
    /// Initial fee rate in basis points.
    #[serde(default)]
    pub fee_rate_bps: u16,
    /// Refuse administrator transfers to the zero address.
    #[serde(default)]
    pub harden_admin_transfer: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerConfig {
    #[serde(default = "default_accounts")]
    pub accounts: Vec<GenesisAccount>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenesisAccount {
    pub address: Address,
    /// Balance in wei. Kept as a string so TOML can hold values above i64.
    #[serde(with = "wei_string")]
    pub balance: Wei,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// API listen address.
    #[serde(default = "default_api_addr")]
    pub listen_addr: String,
    /// API port.
    #[serde(default = "default_api_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (text, json).
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default value functions
fn default_administrator() -> Address {
    Address::dev("admin")
}
fn default_accounts() -> Vec<GenesisAccount> {
    ["alice", "bob", "carol"]
        .into_iter()
        .map(|name| GenesisAccount {
            address: Address::dev(name),
            balance: 100 * ETHER,
        })
        .collect()
}
fn default_api_addr() -> String {
    "127.0.0.1".into()
}
fn default_api_port() -> u16 {
    9001
}
fn default_log_level() -> String {
    "info".into()
}
fn default_log_format() -> String {
    "text".into()
}

impl Default for ModuleSection {
    fn default() -> Self {
        Self {
            administrator: default_administrator(),
            fee_rate_bps: 0,
            harden_admin_transfer: false,
        }
    }
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            accounts: default_accounts(),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_api_addr(),
            port: default_api_port(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl ScratchConfig {
    /// Load config from a TOML file, falling back to defaults for missing fields.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            let config: ScratchConfig = toml::from_str(&contents)
                .with_context(|| format!("parsing {}", path.display()))?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save the current config to a TOML file.
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let contents = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Module-level settings, validated.
    pub fn module_config(&self) -> anyhow::Result<ModuleConfig> {
        let config = ModuleConfig::new(self.module.administrator)
            .with_fee_rate(BasisPoints(self.module.fee_rate_bps))
            .with_hardening(self.module.harden_admin_transfer);
        config.validate()?;
        Ok(config)
    }

    pub fn chain_id(&self) -> ChainId {
        self.chain.chain_id
    }

    pub fn api_addr(&self) -> anyhow::Result<SocketAddr> {
        let addr = format!("{}:{}", self.api.listen_addr, self.api.port);
        addr.parse()
            .with_context(|| format!("invalid API address {addr}"))
    }
}

mod wei_string {
    use scratch_core::Wei;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Wei, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Wei, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.trim().parse().map_err(serde::de::Error::custom)
    }
}
