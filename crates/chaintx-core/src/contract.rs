//! Platforms and the closed registry of known contracts.
//!
//! Every known coin or token is a [`Contract`] variant bound to one canonical
//! address on one [`Platform`]. New tokens are added by extending
//! [`REGISTRY`], never by implementing a trait.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Reserved address of the EVM native coin.
pub const EVM_NATIVE_ADDRESS: &str = "0x0000000000000000000000000000000000000000";

/// Reserved token id Tronscan uses for TRX.
pub const TRON_NATIVE_ADDRESS: &str = "_";

/// A supported blockchain platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// Ethereum-compatible chain reached through JSON-RPC.
    Ethereum,
    /// Tron, reached through the Tronscan explorer REST API.
    Tron,
}

impl Platform {
    /// Canonical form of `address` used as a lookup and cache key.
    ///
    /// EVM addresses are hex and compared case-insensitively; Tron base58
    /// addresses are case-sensitive and only trimmed.
    pub fn normalize_address(self, address: &str) -> String {
        let trimmed = address.trim();
        match self {
            Platform::Ethereum => {
                let lower = trimmed.to_ascii_lowercase();
                if lower.is_empty() || lower.starts_with("0x") {
                    lower
                } else {
                    format!("0x{lower}")
                }
            }
            Platform::Tron => trimmed.to_string(),
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Platform::Ethereum => write!(f, "ethereum"),
            Platform::Tron => write!(f, "tron"),
        }
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ethereum" | "eth" | "etherscan" | "infura" => Ok(Platform::Ethereum),
            "tron" | "trx" | "tronscan" => Ok(Platform::Tron),
            other => Err(format!("unknown platform: {other}")),
        }
    }
}

/// A known coin or token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Contract {
    /// Ether, the Ethereum native coin.
    Eth = 0,
    /// Tether USD (ERC-20).
    Usdt = 1,
    /// USD Coin (ERC-20).
    Usdc = 2,
    /// Dai stablecoin (ERC-20).
    Dai = 3,
    /// Wrapped Bitcoin (ERC-20).
    Wbtc = 4,
    /// Wrapped Ether (ERC-20).
    Weth = 5,
    /// TRX, the Tron native coin.
    Trx = 6,
    /// Tether USD (TRC-20).
    TronUsdt = 7,
}

/// One row of the contract registry.
#[derive(Debug, Clone, Copy)]
pub struct ContractEntry {
    pub contract: Contract,
    pub platform: Platform,
    /// Canonical address (lowercase hex for EVM).
    pub address: &'static str,
    pub symbol: &'static str,
    /// Fixed precision, only known up front for native coins.
    pub native_decimals: Option<u32>,
}

/// The registry table.
pub const REGISTRY: &[ContractEntry] = &[
    ContractEntry {
        contract: Contract::Eth,
        platform: Platform::Ethereum,
        address: EVM_NATIVE_ADDRESS,
        symbol: "ETH",
        native_decimals: Some(18),
    },
    ContractEntry {
        contract: Contract::Usdt,
        platform: Platform::Ethereum,
        address: "0xdac17f958d2ee523a2206206994597c13d831ec7",
        symbol: "USDT",
        native_decimals: None,
    },
    ContractEntry {
        contract: Contract::Usdc,
        platform: Platform::Ethereum,
        address: "0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48",
        symbol: "USDC",
        native_decimals: None,
    },
    ContractEntry {
        contract: Contract::Dai,
        platform: Platform::Ethereum,
        address: "0x6b175474e89094c44da98b954eedeac495271d0f",
        symbol: "DAI",
        native_decimals: None,
    },
    ContractEntry {
        contract: Contract::Wbtc,
        platform: Platform::Ethereum,
        address: "0x2260fac5e5542a773aa44fbcfedf7c193bc2c599",
        symbol: "WBTC",
        native_decimals: None,
    },
    ContractEntry {
        contract: Contract::Weth,
        platform: Platform::Ethereum,
        address: "0xc02aaa39b223fe8d0a0e5c4f27ead9083c756cc2",
        symbol: "WETH",
        native_decimals: None,
    },
    ContractEntry {
        contract: Contract::Trx,
        platform: Platform::Tron,
        address: TRON_NATIVE_ADDRESS,
        symbol: "TRX",
        native_decimals: Some(6),
    },
    ContractEntry {
        contract: Contract::TronUsdt,
        platform: Platform::Tron,
        address: "TR7NHqjeKQxGTCi8q8ZY4pL8otSzgjLj6t",
        symbol: "USDT",
        native_decimals: None,
    },
];

impl Contract {
    fn entry(self) -> &'static ContractEntry {
        // Discriminants index REGISTRY.
        &REGISTRY[self as usize]
    }

    /// Look up the contract deployed at `address` on `platform`.
    ///
    /// Empty and unregistered addresses resolve to `None`.
    pub fn lookup(platform: Platform, address: &str) -> Option<Contract> {
        let key = platform.normalize_address(address);
        if key.is_empty() {
            return None;
        }
        REGISTRY
            .iter()
            .find(|e| e.platform == platform && e.address == key)
            .map(|e| e.contract)
    }

    /// Look up a contract by its display symbol (case-insensitive) on `platform`.
    pub fn from_symbol(platform: Platform, symbol: &str) -> Option<Contract> {
        REGISTRY
            .iter()
            .find(|e| e.platform == platform && e.symbol.eq_ignore_ascii_case(symbol))
            .map(|e| e.contract)
    }

    /// The native coin of `platform`.
    pub fn native(platform: Platform) -> Contract {
        match platform {
            Platform::Ethereum => Contract::Eth,
            Platform::Tron => Contract::Trx,
        }
    }

    /// All registered contracts of `platform`, in table order.
    pub fn all(platform: Platform) -> impl Iterator<Item = Contract> {
        REGISTRY
            .iter()
            .filter(move |e| e.platform == platform)
            .map(|e| e.contract)
    }

    pub fn platform(self) -> Platform {
        self.entry().platform
    }

    pub fn address(self) -> &'static str {
        self.entry().address
    }

    pub fn symbol(self) -> &'static str {
        self.entry().symbol
    }

    pub fn is_native(self) -> bool {
        self.entry().native_decimals.is_some()
    }

    /// Fixed precision of a native coin; `None` for tokens.
    pub fn native_decimals(self) -> Option<u32> {
        self.entry().native_decimals
    }
}

impl fmt::Display for Contract {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}
