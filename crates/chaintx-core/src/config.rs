//! Platform endpoint configuration.
//!
//! ```json
//! {
//!   "ethereum": { "rpc_url": "https://mainnet.infura.io/v3/KEY", "scale": { "precision": 18 } },
//!   "tron":     { "endpoint": "https://apilist.tronscan.org" }
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::contract::Platform;
use crate::error::ServiceError;
use crate::scale::{parse_rounding, ScalePolicy};

/// How human-scale values are rounded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScaleConfig {
    /// Significant digits to keep; `0` keeps the exact value.
    #[serde(default)]
    pub precision: u64,
    /// `up`, `down`, `ceiling`, `floor`, `half_up`, `half_down` or `half_even`.
    #[serde(default = "default_rounding")]
    pub rounding: String,
}

fn default_rounding() -> String { "half_up".into() }
fn default_timeout_ms() -> u64 { 30_000 }
fn default_tronscan_endpoint() -> String { "https://apilist.tronscan.org".into() }

impl Default for ScaleConfig {
    fn default() -> Self {
        Self {
            precision: 0,
            rounding: default_rounding(),
        }
    }
}

impl ScaleConfig {
    pub fn policy(&self) -> Result<ScalePolicy, ServiceError> {
        let rounding = parse_rounding(&self.rounding)
            .ok_or_else(|| ServiceError::Config(format!("unknown rounding mode '{}'", self.rounding)))?;
        Ok(ScalePolicy::significant(self.precision, rounding))
    }
}

/// An Ethereum-compatible JSON-RPC endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvmConfig {
    pub rpc_url: String,
    #[serde(default = "default_timeout_ms")]
    pub request_timeout_ms: u64,
    #[serde(default)]
    pub scale: ScaleConfig,
}

impl EvmConfig {
    pub fn new(rpc_url: impl Into<String>) -> Self {
        Self {
            rpc_url: rpc_url.into(),
            request_timeout_ms: default_timeout_ms(),
            scale: ScaleConfig::default(),
        }
    }

    /// Endpoint for an Infura project on the given chain.
    pub fn infura(project_id: &str, chain_id: u64) -> Self {
        Self::new(infura_url(project_id, chain_id))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

/// The Tronscan explorer REST API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TronscanConfig {
    #[serde(default = "default_tronscan_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_timeout_ms")]
    pub request_timeout_ms: u64,
    #[serde(default)]
    pub scale: ScaleConfig,
}

impl Default for TronscanConfig {
    fn default() -> Self {
        Self {
            endpoint: default_tronscan_endpoint(),
            request_timeout_ms: default_timeout_ms(),
            scale: ScaleConfig::default(),
        }
    }
}

impl TronscanConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

/// Top-level configuration: one optional section per platform.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ethereum: Option<EvmConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tron: Option<TronscanConfig>,
}

impl Config {
    pub fn from_json_str(json: &str) -> Result<Self, ServiceError> {
        let config: Config =
            serde_json::from_str(json).map_err(|e| ServiceError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ServiceError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| ServiceError::Config(format!("{}: {e}", path.display())))?;
        Self::from_json_str(&json)
    }

    /// Returns `true` if a section for `platform` is present.
    pub fn has(&self, platform: Platform) -> bool {
        match platform {
            Platform::Ethereum => self.ethereum.is_some(),
            Platform::Tron => self.tron.is_some(),
        }
    }

    fn validate(&self) -> Result<(), ServiceError> {
        if let Some(evm) = &self.ethereum {
            if evm.rpc_url.trim().is_empty() {
                return Err(ServiceError::Config("ethereum.rpc_url is empty".into()));
            }
            evm.scale.policy()?;
        }
        if let Some(tron) = &self.tron {
            tron.scale.policy()?;
        }
        Ok(())
    }
}

/// Infura HTTPS URL for `project_id` on `chain_id`.
pub fn infura_url(project_id: &str, chain_id: u64) -> String {
    let network = match chain_id {
        1 => "mainnet",
        11155111 => "sepolia",
        17000 => "holesky",
        137 => "polygon-mainnet",
        42161 => "arbitrum-mainnet",
        10 => "optimism-mainnet",
        8453 => "base-mainnet",
        _ => "mainnet",
    };
    format!("https://{network}.infura.io/v3/{project_id}")
}
