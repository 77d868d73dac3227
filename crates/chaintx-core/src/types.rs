//! The normalized transaction record returned by every platform service.
//!
//! Whatever the originating chain's native representation, a lookup by hash
//! ends in one [`CurrencyTransaction`]. It is assembled once per lookup and
//! handed to the caller by value; nothing in this crate mutates or stores it.

use alloy_primitives::U256;
use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::contract::{Contract, Platform};

/// Outcome of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Success,
    Fail,
    /// Seen but not yet confirmed, or outcome unknown.
    Wait,
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::Fail => write!(f, "fail"),
            Self::Wait => write!(f, "wait"),
        }
    }
}

/// What a transaction's call data says moved, and to whom.
///
/// With `contract` set, `value` is in that contract's smallest unit;
/// without it, `value` is in the chain's native smallest unit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodedInput {
    /// Destination of the transfer. Empty when the call was not recognized.
    pub to: String,
    /// Raw amount in smallest units.
    pub value: U256,
    pub contract: Option<Contract>,
}

impl DecodedInput {
    /// A plain native-coin transfer.
    pub fn native(to: impl Into<String>, value: U256, native: Contract) -> Self {
        Self {
            to: to.into(),
            value,
            contract: Some(native),
        }
    }

    /// A recognized token call; the token itself is resolved by the caller.
    pub fn token(to: impl Into<String>, value: U256) -> Self {
        Self {
            to: to.into(),
            value,
            contract: None,
        }
    }

    /// Returns `true` if nothing was extracted from the call data.
    pub fn is_unrecognized(&self) -> bool {
        self.to.is_empty() && self.value.is_zero() && self.contract.is_none()
    }
}

/// A normalized transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrencyTransaction {
    pub platform: Platform,
    /// Block height; `None` while pending.
    pub block: Option<u64>,
    pub hash: String,
    pub from: String,
    /// Final recipient (decoded from the call data for token transfers).
    pub to: String,
    pub contract: Option<Contract>,
    /// Contract address, empty when no contract was identified.
    pub contract_address: String,
    /// Human-scale amount.
    pub value: BigDecimal,
    pub status: TransactionStatus,
    /// Block time in UTC; `None` when the block could not be fetched.
    pub time: Option<DateTime<Utc>>,
    pub input: DecodedInput,
}
