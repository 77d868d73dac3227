//! Tronscan response shapes.
//!
//! Only the fields the service reads are mapped; everything else in the
//! explorer's payload is ignored. Missing fields fall back to defaults since
//! Tronscan omits most of them for unknown hashes.

use alloy_primitives::U256;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use chaintx_core::TransactionStatus;

/// `contractRet` of an executed transaction.
pub const CONTRACT_RET_SUCCESS: &str = "SUCCESS";

/// `GET /api/transaction-info?hash=…`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionInfo {
    #[serde(default)]
    pub hash: String,
    #[serde(default)]
    pub block: Option<u64>,
    /// Epoch milliseconds.
    #[serde(default)]
    pub timestamp: Option<i64>,
    #[serde(default)]
    pub owner_address: String,
    #[serde(default)]
    pub to_address: String,
    #[serde(default)]
    pub confirmed: bool,
    #[serde(default)]
    pub contract_ret: Option<String>,
    #[serde(default)]
    pub contract_data: ContractData,
    #[serde(default, rename = "trc20TransferInfo")]
    pub trc20_transfer_info: Vec<Trc20Transfer>,
}

/// Native transfer details.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContractData {
    #[serde(default, deserialize_with = "u256_lenient")]
    pub amount: U256,
    #[serde(default)]
    pub owner_address: String,
    #[serde(default)]
    pub to_address: String,
}

/// One decoded TRC-20 transfer event.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Trc20Transfer {
    #[serde(default)]
    pub contract_address: String,
    #[serde(default)]
    pub from_address: String,
    #[serde(default)]
    pub to_address: String,
    #[serde(default, deserialize_with = "u256_lenient")]
    pub amount_str: U256,
    #[serde(default)]
    pub decimals: Option<u32>,
    #[serde(default)]
    pub symbol: Option<String>,
}

/// Who received what, as reported by the explorer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transfer {
    pub to: String,
    pub amount: U256,
    /// Empty for a native TRX transfer.
    pub contract_address: String,
    /// Token precision, when the explorer includes it.
    pub decimals: Option<u32>,
}

impl TransactionInfo {
    /// An unknown hash comes back as `{}`.
    pub fn is_found(&self) -> bool {
        !self.hash.is_empty()
    }

    pub fn status(&self) -> TransactionStatus {
        match self.contract_ret.as_deref() {
            Some(CONTRACT_RET_SUCCESS) if self.confirmed => TransactionStatus::Success,
            Some(CONTRACT_RET_SUCCESS) => TransactionStatus::Wait,
            _ => TransactionStatus::Fail,
        }
    }

    pub fn time(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.timestamp?)
    }

    /// The first TRC-20 transfer if there is one, else the native transfer.
    pub fn transfer(&self) -> Transfer {
        match self.trc20_transfer_info.first() {
            Some(t) => Transfer {
                to: t.to_address.clone(),
                amount: t.amount_str,
                contract_address: t.contract_address.clone(),
                decimals: t.decimals,
            },
            None => Transfer {
                to: if self.contract_data.to_address.is_empty() {
                    self.to_address.clone()
                } else {
                    self.contract_data.to_address.clone()
                },
                amount: self.contract_data.amount,
                contract_address: String::new(),
                decimals: None,
            },
        }
    }
}

/// `GET /api/account?address=…`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccountInfo {
    /// TRX balance in sun.
    #[serde(default, deserialize_with = "u256_lenient")]
    pub balance: U256,
    #[serde(default)]
    pub trc20token_balances: Vec<TokenBalance>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenBalance {
    #[serde(default)]
    pub token_id: String,
    #[serde(default, deserialize_with = "u256_lenient")]
    pub balance: U256,
    #[serde(default)]
    pub token_decimal: Option<u32>,
}

impl AccountInfo {
    /// Raw balance of the TRC-20 token at `contract_address`; 0 if not held.
    pub fn token_balance(&self, contract_address: &str) -> U256 {
        self.trc20token_balances
            .iter()
            .find(|t| t.token_id == contract_address)
            .map(|t| t.balance)
            .unwrap_or(U256::ZERO)
    }
}

/// `GET /api/token_trc20?contract=…`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TokenInfo {
    #[serde(default)]
    pub trc20_tokens: Vec<TokenMeta>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TokenMeta {
    #[serde(default)]
    pub contract_address: String,
    #[serde(default)]
    pub decimals: Option<u32>,
}

impl TokenInfo {
    pub fn decimals(&self) -> Option<u32> {
        self.trc20_tokens.first().and_then(|t| t.decimals)
    }
}

/// Tronscan reports amounts as JSON numbers or decimal strings.
fn u256_lenient<'de, D: Deserializer<'de>>(d: D) -> Result<U256, D::Error> {
    let v = Value::deserialize(d)?;
    let parsed = match &v {
        Value::Null => Some(U256::ZERO),
        Value::Number(n) => n.as_u64().map(U256::from),
        Value::String(s) if s.is_empty() => Some(U256::ZERO),
        Value::String(s) => U256::from_str_radix(s, 10).ok(),
        _ => None,
    };
    parsed.ok_or_else(|| serde::de::Error::custom(format!("not an unsigned amount: {v}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unknown_hash_is_empty_object() {
        let info: TransactionInfo = serde_json::from_value(json!({})).unwrap();
        assert!(!info.is_found());
    }

    #[test]
    fn status_follows_result_and_confirmation() {
        let mut info = TransactionInfo {
            hash: "ab".into(),
            contract_ret: Some("SUCCESS".into()),
            confirmed: true,
            ..Default::default()
        };
        assert_eq!(info.status(), TransactionStatus::Success);
        info.confirmed = false;
        assert_eq!(info.status(), TransactionStatus::Wait);
        info.contract_ret = Some("REVERT".into());
        assert_eq!(info.status(), TransactionStatus::Fail);
        info.contract_ret = None;
        assert_eq!(info.status(), TransactionStatus::Fail);
    }

    #[test]
    fn trc20_transfer_wins_over_contract_data() {
        let info: TransactionInfo = serde_json::from_value(json!({
            "hash": "ab",
            "contractData": { "owner_address": "TA", "contract_address": "TR7NHqjeKQxGTCi8q8ZY4pL8otSzgjLj6t" },
            "trc20TransferInfo": [{
                "contract_address": "TR7NHqjeKQxGTCi8q8ZY4pL8otSzgjLj6t",
                "from_address": "TA",
                "to_address": "TB",
                "amount_str": "1500000",
                "decimals": 6,
                "symbol": "USDT"
            }]
        }))
        .unwrap();
        let t = info.transfer();
        assert_eq!(t.to, "TB");
        assert_eq!(t.amount, U256::from(1_500_000u64));
        assert_eq!(t.contract_address, "TR7NHqjeKQxGTCi8q8ZY4pL8otSzgjLj6t");
        assert_eq!(t.decimals, Some(6));
    }

    #[test]
    fn native_transfer_from_contract_data() {
        let info: TransactionInfo = serde_json::from_value(json!({
            "hash": "ab",
            "timestamp": 1600000000000i64,
            "contractData": { "amount": 2000000, "owner_address": "TA", "to_address": "TB" }
        }))
        .unwrap();
        let t = info.transfer();
        assert_eq!(t.to, "TB");
        assert_eq!(t.amount, U256::from(2_000_000u64));
        assert!(t.contract_address.is_empty());
        assert_eq!(info.time().unwrap().to_rfc3339(), "2020-09-13T12:26:40+00:00");
    }

    #[test]
    fn account_balances() {
        let acct: AccountInfo = serde_json::from_value(json!({
            "balance": 12345,
            "trc20token_balances": [
                { "tokenId": "TR7NHqjeKQxGTCi8q8ZY4pL8otSzgjLj6t", "balance": "990000", "tokenDecimal": 6 }
            ]
        }))
        .unwrap();
        assert_eq!(acct.balance, U256::from(12345u64));
        assert_eq!(acct.token_balance("TR7NHqjeKQxGTCi8q8ZY4pL8otSzgjLj6t"), U256::from(990_000u64));
        assert_eq!(acct.token_balance("TXYZ"), U256::ZERO);
    }

    #[test]
    fn rejects_non_numeric_amounts() {
        let bad = serde_json::from_value::<AccountInfo>(json!({ "balance": "lots" }));
        assert!(bad.is_err());
    }
}
