//! `TronscanService`: the Tron [`CurrencyService`].

use alloy_primitives::U256;
use async_trait::async_trait;
use std::sync::Arc;

use chaintx_core::service::ensure_platform;
use chaintx_core::{
    Contract, CurrencyService, CurrencyTransaction, DecimalCache, DecodedInput, Platform, ScalePolicy,
    ServiceError, TronscanConfig,
};

use crate::api::{ExplorerTransport, HttpExplorer, ACCOUNT_PATH, TOKEN_PATH, TRANSACTION_PATH};
use crate::types::{AccountInfo, TokenInfo, TransactionInfo};

/// Precision of registered TRC-20 tokens, known without a lookup.
const KNOWN_DECIMALS: &[(Contract, u32)] = &[(Contract::TronUsdt, 6)];

/// Tron lookups through the Tronscan explorer.
pub struct TronscanService {
    api: Arc<dyn ExplorerTransport>,
    decimals: Arc<DecimalCache>,
    policy: ScalePolicy,
}

impl TronscanService {
    pub fn new(api: Arc<dyn ExplorerTransport>) -> Self {
        let decimals = DecimalCache::new(Platform::Tron);
        for (contract, d) in KNOWN_DECIMALS {
            decimals.insert(contract.address(), *d);
        }
        Self::with_cache(api, Arc::new(decimals))
    }

    pub fn with_cache(api: Arc<dyn ExplorerTransport>, decimals: Arc<DecimalCache>) -> Self {
        Self {
            api,
            decimals,
            policy: ScalePolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: ScalePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn from_config(config: &TronscanConfig) -> Result<Self, ServiceError> {
        let api = HttpExplorer::from_config(config)?;
        Ok(Self::new(Arc::new(api)).with_policy(config.scale.policy()?))
    }

    pub fn decimal_cache(&self) -> &Arc<DecimalCache> {
        &self.decimals
    }

    pub fn policy(&self) -> &ScalePolicy {
        &self.policy
    }

    /// Precision of the TRC-20 token at `address`, registered or not.
    pub async fn decimals_of_address(&self, address: &str) -> Result<u32, ServiceError> {
        let result = self
            .decimals
            .get_or_fetch(address, || self.fetch_decimals(address))
            .await;
        match result {
            Ok(d) => Ok(d),
            Err(e) if e.is_transport() => {
                tracing::warn!(contract = address, error = %e, "decimals unavailable, using 0");
                Ok(0)
            }
            Err(e) => Err(e),
        }
    }

    async fn fetch_decimals(&self, address: &str) -> Result<u32, ServiceError> {
        let body = self.api.get_json(TOKEN_PATH, &[("contract", address)]).await?;
        let info: TokenInfo = serde_json::from_value(body)
            .map_err(|e| ServiceError::decode(format!("token_trc20 response: {e}")))?;
        Ok(info.decimals().unwrap_or(0))
    }

    async fn account(&self, address: &str) -> Result<AccountInfo, ServiceError> {
        let address = validate_address(address)?;
        let body = self.api.get_json(ACCOUNT_PATH, &[("address", address)]).await?;
        serde_json::from_value(body).map_err(|e| ServiceError::decode(format!("account response: {e}")))
    }
}

/// Bitcoin base58 alphabet: no `0`, `O`, `I` or `l`.
const BASE58_ALPHABET: &str = "123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

/// Base58check Tron addresses are 34 characters starting with `T`.
fn validate_address(address: &str) -> Result<&str, ServiceError> {
    let trimmed = address.trim();
    if trimmed.len() == 34 && trimmed.starts_with('T') && trimmed.chars().all(|c| BASE58_ALPHABET.contains(c)) {
        Ok(trimmed)
    } else {
        Err(ServiceError::InvalidAddress {
            address: address.to_string(),
            reason: "expected a 34-character base58 address starting with 'T'".into(),
        })
    }
}

#[async_trait]
impl CurrencyService for TronscanService {
    fn platform(&self) -> Platform {
        Platform::Tron
    }

    #[tracing::instrument(skip(self), fields(platform = "tron"))]
    async fn transaction_by_hash(
        &self,
        hash: &str,
    ) -> Result<Option<CurrencyTransaction>, ServiceError> {
        let body = self.api.get_json(TRANSACTION_PATH, &[("hash", hash)]).await?;
        let info: TransactionInfo = serde_json::from_value(body)
            .map_err(|e| ServiceError::decode(format!("transaction-info response: {e}")))?;
        if !info.is_found() {
            tracing::debug!("transaction not found");
            return Ok(None);
        }

        let transfer = info.transfer();
        let (contract, input) = if transfer.contract_address.is_empty() {
            let native = Contract::native(Platform::Tron);
            (Some(native), DecodedInput::native(transfer.to.clone(), transfer.amount, native))
        } else {
            if let Some(d) = transfer.decimals {
                if self.decimals.get(&transfer.contract_address).is_none() {
                    self.decimals.insert(&transfer.contract_address, d);
                }
            }
            (
                Contract::lookup(Platform::Tron, &transfer.contract_address),
                DecodedInput::token(transfer.to.clone(), transfer.amount),
            )
        };

        let value = self.to_display_value(transfer.amount, contract, &self.policy).await?;
        let contract_address = match contract {
            Some(c) if c.is_native() => String::new(),
            _ => transfer.contract_address.clone(),
        };

        Ok(Some(CurrencyTransaction {
            platform: Platform::Tron,
            block: info.block,
            hash: info.hash.clone(),
            from: info.owner_address.clone(),
            to: transfer.to,
            contract,
            contract_address,
            value,
            status: info.status(),
            time: info.time(),
            input,
        }))
    }

    async fn decimals_of(&self, contract: Option<Contract>) -> Result<u32, ServiceError> {
        match contract {
            None => Ok(0),
            Some(c) => {
                ensure_platform(Platform::Tron, c)?;
                self.decimals_of_address(c.address()).await
            }
        }
    }

    async fn balance_of(&self, address: &str, contract: Contract) -> Result<U256, ServiceError> {
        ensure_platform(Platform::Tron, contract)?;
        let account = self.account(address).await?;
        Ok(if contract.is_native() {
            account.balance
        } else {
            account.token_balance(contract.address())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chaintx_core::{BigDecimal, TransactionStatus};
    use serde_json::{json, Value};
    use std::collections::HashMap;
    use std::str::FromStr;
    use std::sync::Mutex;

    const HOLDER: &str = "TJRabPrwbZy45sbavfcjinPJC18kjpRTv8";
    const RECEIVER: &str = "TN3W4H6rK2ce4vX9YnFQHwKENnHjoxb3m9";
    const USDT: &str = "TR7NHqjeKQxGTCi8q8ZY4pL8otSzgjLj6t";

    /// Answers each path from a fixture; records every request.
    #[derive(Default)]
    struct FixtureExplorer {
        bodies: HashMap<&'static str, Value>,
        seen: Mutex<Vec<(String, Vec<(String, String)>)>>,
    }

    impl FixtureExplorer {
        fn with(mut self, path: &'static str, body: Value) -> Self {
            self.bodies.insert(path, body);
            self
        }

        fn hits(&self, path: &str) -> usize {
            self.seen.lock().unwrap().iter().filter(|(p, _)| p == path).count()
        }
    }

    #[async_trait]
    impl ExplorerTransport for FixtureExplorer {
        async fn get_json(&self, path: &str, query: &[(&str, &str)]) -> Result<Value, ServiceError> {
            self.seen.lock().unwrap().push((
                path.to_string(),
                query.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect(),
            ));
            self.bodies
                .get(path)
                .cloned()
                .ok_or_else(|| ServiceError::Transport(format!("HTTP 503 for {path}")))
        }

        fn endpoint(&self) -> &str {
            "fixture"
        }
    }

    fn service(api: FixtureExplorer) -> (TronscanService, Arc<FixtureExplorer>) {
        let api = Arc::new(api);
        (TronscanService::new(api.clone()), api)
    }

    #[tokio::test]
    async fn native_trx_transfer() {
        let (svc, api) = service(FixtureExplorer::default().with(
            TRANSACTION_PATH,
            json!({
                "hash": "f1e2",
                "block": 23456789,
                "timestamp": 1600000000000i64,
                "ownerAddress": HOLDER,
                "toAddress": RECEIVER,
                "confirmed": true,
                "contractRet": "SUCCESS",
                "contractType": 1,
                "contractData": { "amount": 2500000, "owner_address": HOLDER, "to_address": RECEIVER }
            }),
        ));
        let tx = svc.transaction_by_hash("f1e2").await.unwrap().unwrap();
        assert_eq!(tx.platform, Platform::Tron);
        assert_eq!(tx.block, Some(23456789));
        assert_eq!(tx.from, HOLDER);
        assert_eq!(tx.to, RECEIVER);
        assert_eq!(tx.contract, Some(Contract::Trx));
        assert_eq!(tx.contract_address, "");
        assert_eq!(tx.value, BigDecimal::from_str("2.5").unwrap());
        assert_eq!(tx.status, TransactionStatus::Success);
        assert_eq!(tx.time.unwrap().timestamp(), 1_600_000_000);
        assert_eq!(api.seen.lock().unwrap()[0].1, vec![("hash".to_string(), "f1e2".to_string())]);
    }

    #[tokio::test]
    async fn trc20_transfer_unconfirmed_is_waiting() {
        let (svc, api) = service(FixtureExplorer::default().with(
            TRANSACTION_PATH,
            json!({
                "hash": "a0b1",
                "ownerAddress": HOLDER,
                "confirmed": false,
                "contractRet": "SUCCESS",
                "contractType": 31,
                "trc20TransferInfo": [{
                    "contract_address": USDT,
                    "from_address": HOLDER,
                    "to_address": RECEIVER,
                    "amount_str": "1500000",
                    "decimals": 6
                }]
            }),
        ));
        let tx = svc.transaction_by_hash("a0b1").await.unwrap().unwrap();
        assert_eq!(tx.contract, Some(Contract::TronUsdt));
        assert_eq!(tx.contract_address, USDT);
        assert_eq!(tx.to, RECEIVER);
        assert_eq!(tx.value, BigDecimal::from_str("1.5").unwrap());
        assert_eq!(tx.status, TransactionStatus::Wait);
        assert_eq!(tx.input.contract, None);
        assert_eq!(api.hits(TOKEN_PATH), 0);
    }

    #[tokio::test]
    async fn unregistered_token_keeps_address_and_raw_value() {
        let (svc, _) = service(FixtureExplorer::default().with(
            TRANSACTION_PATH,
            json!({
                "hash": "c3",
                "contractRet": "REVERT",
                "confirmed": true,
                "trc20TransferInfo": [{ "contract_address": "TXLAQ63Xg1NAzckPwKHvzw7CSEmLMEqcdj", "to_address": RECEIVER, "amount_str": "42" }]
            }),
        ));
        let tx = svc.transaction_by_hash("c3").await.unwrap().unwrap();
        assert_eq!(tx.contract, None);
        assert_eq!(tx.contract_address, "TXLAQ63Xg1NAzckPwKHvzw7CSEmLMEqcdj");
        assert_eq!(tx.value, BigDecimal::from(42));
        assert_eq!(tx.status, TransactionStatus::Fail);
    }

    #[tokio::test]
    async fn transfer_decimals_seed_the_cache() {
        let addr = "TXLAQ63Xg1NAzckPwKHvzw7CSEmLMEqcdj";
        let (svc, api) = service(FixtureExplorer::default().with(
            TRANSACTION_PATH,
            json!({
                "hash": "d4",
                "contractRet": "SUCCESS",
                "confirmed": true,
                "trc20TransferInfo": [{
                    "contract_address": addr,
                    "to_address": RECEIVER,
                    "amount_str": "1500000000000000000",
                    "decimals": 18
                }]
            }),
        ));
        let tx = svc.transaction_by_hash("d4").await.unwrap().unwrap();
        assert_eq!(tx.contract, None);
        assert_eq!(tx.value, BigDecimal::from_str("1500000000000000000").unwrap());
        assert_eq!(svc.decimal_cache().get(addr), Some(18));
        assert_eq!(svc.decimals_of_address(addr).await.unwrap(), 18);
        assert_eq!(api.hits(TOKEN_PATH), 0);
    }

    #[tokio::test]
    async fn empty_object_is_not_found() {
        let (svc, _) = service(FixtureExplorer::default().with(TRANSACTION_PATH, json!({})));
        assert!(svc.transaction_by_hash("ffff").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn http_failure_propagates() {
        let (svc, _) = service(FixtureExplorer::default());
        assert!(svc.transaction_by_hash("ffff").await.unwrap_err().is_transport());
    }

    #[tokio::test]
    async fn known_decimals_need_no_lookup() {
        let (svc, api) = service(FixtureExplorer::default());
        assert_eq!(svc.decimals_of(Some(Contract::Trx)).await.unwrap(), 6);
        assert_eq!(svc.decimals_of(Some(Contract::TronUsdt)).await.unwrap(), 6);
        assert_eq!(svc.decimals_of(None).await.unwrap(), 0);
        assert!(api.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn token_decimals_are_looked_up_once() {
        let (svc, api) = service(
            FixtureExplorer::default()
                .with(TOKEN_PATH, json!({ "trc20_tokens": [{ "contract_address": "TX", "decimals": 18 }] })),
        );
        let addr = "TXLAQ63Xg1NAzckPwKHvzw7CSEmLMEqcdj";
        assert_eq!(svc.decimals_of_address(addr).await.unwrap(), 18);
        assert_eq!(svc.decimals_of_address(addr).await.unwrap(), 18);
        assert_eq!(api.hits(TOKEN_PATH), 1);
    }

    #[tokio::test]
    async fn unreachable_token_decimals_are_zero_and_uncached() {
        let (svc, _) = service(FixtureExplorer::default());
        let addr = "TXLAQ63Xg1NAzckPwKHvzw7CSEmLMEqcdj";
        assert_eq!(svc.decimals_of_address(addr).await.unwrap(), 0);
        assert_eq!(svc.decimal_cache().get(addr), None);
    }

    #[tokio::test]
    async fn balances_from_account() {
        let (svc, api) = service(FixtureExplorer::default().with(
            ACCOUNT_PATH,
            json!({
                "address": HOLDER,
                "balance": 7000000,
                "trc20token_balances": [{ "tokenId": USDT, "balance": "1250000", "tokenDecimal": 6 }]
            }),
        ));
        assert_eq!(svc.balance_of(HOLDER, Contract::Trx).await.unwrap(), U256::from(7_000_000u64));
        assert_eq!(svc.balance_of(HOLDER, Contract::TronUsdt).await.unwrap(), U256::from(1_250_000u64));
        assert_eq!(api.hits(ACCOUNT_PATH), 2);
    }

    #[tokio::test]
    async fn balance_rejects_bad_input() {
        let (svc, api) = service(FixtureExplorer::default());
        let err = svc.balance_of("0xd8da6bf26964af9d7eed9e03e53415d37aa96045", Contract::Trx).await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidAddress { .. }));
        let err = svc.balance_of(HOLDER, Contract::Usdt).await.unwrap_err();
        assert!(matches!(err, ServiceError::UnsupportedContract { .. }));
        assert!(api.seen.lock().unwrap().is_empty());
    }

    #[test]
    fn addresses_outside_base58_are_rejected() {
        assert_eq!(validate_address(HOLDER).unwrap(), HOLDER);
        for bad in [
            "TJRabPrwbZy45sbavfcjinPJC18kjpRTv0",
            "TJRabPrwbZy45sbavfcjinPJC18kjpRTvO",
            "TJRabPrwbZy45sbavfcjinPJC18kjpRTvI",
            "TJRabPrwbZy45sbavfcjinPJC18kjpRTvl",
        ] {
            assert_eq!(bad.len(), 34);
            assert!(matches!(validate_address(bad), Err(ServiceError::InvalidAddress { .. })), "{bad}");
        }
    }
}
