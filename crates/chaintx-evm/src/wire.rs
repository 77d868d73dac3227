//! JSON-RPC response shapes for transactions, receipts and blocks.
//!
//! Only the fields the resolver reads are mapped. Quantities stay as the
//! node's hex strings and are parsed on access.

use alloy_primitives::U256;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Receipt `status` value of a successful transaction (EIP-658).
pub const RECEIPT_STATUS_SUCCESS: u64 = 1;

/// Call data of a plain value transfer.
pub const EMPTY_INPUT: &str = "0x";

/// A transaction as returned by `eth_getTransactionByHash`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcTransaction {
    pub hash: String,
    /// `null` while pending.
    pub block_hash: Option<String>,
    pub block_number: Option<String>,
    pub from: String,
    /// `null` for contract creation.
    pub to: Option<String>,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub input: String,
}

impl RpcTransaction {
    pub fn block_number_u64(&self) -> Option<u64> {
        self.block_number.as_deref().and_then(parse_hex_u64)
    }

    /// Native value in wei; malformed or missing values read as zero.
    pub fn value_u256(&self) -> U256 {
        parse_hex_u256(&self.value).unwrap_or(U256::ZERO)
    }
}

/// A receipt as returned by `eth_getTransactionReceipt`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcReceipt {
    pub transaction_hash: String,
    pub block_hash: Option<String>,
    /// Absent on pre-Byzantium receipts.
    pub status: Option<String>,
}

impl RpcReceipt {
    pub fn is_success(&self) -> bool {
        self.status.as_deref().and_then(parse_hex_u64) == Some(RECEIPT_STATUS_SUCCESS)
    }
}

/// A block header as returned by `eth_getBlockByHash(hash, false)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcBlock {
    pub hash: Option<String>,
    pub number: Option<String>,
    pub timestamp: String,
}

impl RpcBlock {
    /// Block time; the node reports UTC epoch seconds.
    pub fn time(&self) -> Option<DateTime<Utc>> {
        let secs = i64::try_from(parse_hex_u64(&self.timestamp)?).ok()?;
        DateTime::from_timestamp(secs, 0)
    }
}

/// Block reference for read-only calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlockTag {
    #[default]
    Latest,
    Pending,
    Earliest,
    Number(u64),
}

impl BlockTag {
    pub fn to_param(self) -> Value {
        match self {
            BlockTag::Latest => Value::from("latest"),
            BlockTag::Pending => Value::from("pending"),
            BlockTag::Earliest => Value::from("earliest"),
            BlockTag::Number(n) => Value::from(format!("{n:#x}")),
        }
    }
}

/// Parse a hex quantity (with or without `0x`) to u64.
pub fn parse_hex_u64(s: &str) -> Option<u64> {
    let s = s.strip_prefix("0x").unwrap_or(s);
    u64::from_str_radix(s, 16).ok()
}

/// Parse a hex quantity (with or without `0x`) to U256. `"0x"` is zero.
pub fn parse_hex_u256(s: &str) -> Option<U256> {
    let s = s.strip_prefix("0x").unwrap_or(s);
    if s.is_empty() {
        return Some(U256::ZERO);
    }
    U256::from_str_radix(s, 16).ok()
}
