//! `EvmService`: transaction and balance resolution over Ethereum JSON-RPC.
//!
//! A lookup by hash runs `eth_getTransactionByHash`, classifies the call
//! data, resolves the token and its precision, then reads the receipt for
//! the outcome and the block for the timestamp. Node error envelopes are
//! absorbed into "not found" or a default wherever one exists; transport
//! failures are returned to the caller.

use alloy_dyn_abi::{DynSolType, DynSolValue};
use alloy_primitives::{Address, U256};
use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;

use chaintx_core::service::ensure_platform;
use chaintx_core::{
    Contract, CurrencyService, CurrencyTransaction, DecimalCache, EvmConfig, Platform, ScalePolicy,
    ServiceError, TransactionStatus, EVM_NATIVE_ADDRESS,
};
use chaintx_rpc::{HttpClientConfig, HttpRpcClient, RpcTransport, RpcTransportExt, TransportError};

use crate::abi::{ContractCaller, FunctionCall};
use crate::convert::service_error;
use crate::input::InputDecoder;
use crate::wire::{parse_hex_u256, BlockTag, RpcBlock, RpcReceipt, RpcTransaction};

/// Ethereum-compatible [`CurrencyService`].
pub struct EvmService {
    transport: Arc<dyn RpcTransport>,
    caller: ContractCaller,
    decoder: InputDecoder,
    decimals: Arc<DecimalCache>,
    policy: ScalePolicy,
}

impl EvmService {
    /// A service with its own decimal cache and exact scaling.
    pub fn new(transport: Arc<dyn RpcTransport>) -> Self {
        Self::with_cache(transport, Arc::new(DecimalCache::new(Platform::Ethereum)))
    }

    /// A service sharing `decimals` with other services of the same chain.
    pub fn with_cache(transport: Arc<dyn RpcTransport>, decimals: Arc<DecimalCache>) -> Self {
        Self {
            caller: ContractCaller::new(Arc::clone(&transport)),
            decoder: InputDecoder::new(Contract::native(Platform::Ethereum)),
            transport,
            decimals,
            policy: ScalePolicy::default(),
        }
    }

    /// Round human-scale transaction values with `policy`.
    pub fn with_policy(mut self, policy: ScalePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Connect to `config.rpc_url` over HTTP.
    pub fn from_config(config: &EvmConfig) -> Result<Self, ServiceError> {
        let client = HttpRpcClient::new(
            config.rpc_url.clone(),
            HttpClientConfig {
                request_timeout: config.request_timeout(),
            },
        )
        .map_err(service_error)?;
        let policy = config.scale.policy()?;
        Ok(Self::new(Arc::new(client)).with_policy(policy))
    }

    pub fn decimal_cache(&self) -> &Arc<DecimalCache> {
        &self.decimals
    }

    pub fn policy(&self) -> &ScalePolicy {
        &self.policy
    }

    /// Precision of the contract at `address`, registered or not.
    ///
    /// A contract that returns nothing for `decimals()` has precision 0 and
    /// that answer is cached. When the node cannot answer (error envelope or
    /// transport failure) 0 is returned for this call only.
    pub async fn decimals_of_address(&self, address: &str) -> Result<u32, ServiceError> {
        let result = self
            .decimals
            .get_or_fetch(address, || self.fetch_decimals(address))
            .await;
        match result {
            Ok(decimals) => Ok(decimals),
            Err(e) if e.is_remote() || e.is_transport() => {
                tracing::warn!(contract = address, error = %e, "decimals unavailable, using 0");
                Ok(0)
            }
            Err(e) => Err(e),
        }
    }

    async fn fetch_decimals(&self, address: &str) -> Result<u32, ServiceError> {
        // Read the full word; anything past `u8::MAX` is not a precision.
        let call = FunctionCall::new("decimals", vec![], vec![DynSolType::Uint(256)]);
        let out = self
            .caller
            .call(&call, EVM_NATIVE_ADDRESS, address, BlockTag::Latest)
            .await?;
        Ok(out
            .first()
            .and_then(DynSolValue::as_uint)
            .and_then(|(n, _)| u8::try_from(n).ok())
            .map_or(0, u32::from))
    }

    /// Raw `balanceOf(address)` of the token at `token_address`.
    pub async fn token_balance(&self, address: &str, token_address: &str) -> Result<U256, ServiceError> {
        let owner: Address = address.trim().parse().map_err(|e| ServiceError::InvalidAddress {
            address: address.to_string(),
            reason: format!("{e}"),
        })?;
        let call = FunctionCall::new(
            "balanceOf",
            vec![DynSolValue::Address(owner)],
            vec![DynSolType::Uint(256)],
        );
        let out = self
            .caller
            .call(&call, address, token_address, BlockTag::Latest)
            .await?;
        Ok(out
            .first()
            .and_then(DynSolValue::as_uint)
            .map(|(n, _)| n)
            .unwrap_or(U256::ZERO))
    }

    /// Native balance at the latest block.
    pub async fn native_balance(&self, address: &str) -> Result<U256, ServiceError> {
        let raw: String = self
            .transport
            .invoke("eth_getBalance", vec![json!(address), BlockTag::Latest.to_param()])
            .await
            .map_err(service_error)?;
        parse_hex_u256(&raw).ok_or_else(|| ServiceError::decode(format!("eth_getBalance returned '{raw}'")))
    }

    async fn fetch_transaction(&self, hash: &str) -> Result<Option<RpcTransaction>, ServiceError> {
        match self
            .transport
            .invoke::<Option<RpcTransaction>>("eth_getTransactionByHash", vec![json!(hash)])
            .await
        {
            Ok(tx) => Ok(tx),
            Err(TransportError::Rpc(e)) => {
                tracing::error!(hash, code = e.code, message = %e.message, "transaction lookup failed");
                Ok(None)
            }
            Err(e) => Err(service_error(e)),
        }
    }

    /// Receipt status; a missing receipt counts as failed.
    async fn fetch_status(&self, hash: &str) -> Result<TransactionStatus, ServiceError> {
        let receipt = match self
            .transport
            .invoke::<Option<RpcReceipt>>("eth_getTransactionReceipt", vec![json!(hash)])
            .await
        {
            Ok(receipt) => receipt,
            Err(TransportError::Rpc(e)) => {
                tracing::warn!(hash, code = e.code, message = %e.message, "receipt lookup failed");
                None
            }
            Err(e) => return Err(service_error(e)),
        };
        Ok(match receipt {
            Some(r) if r.is_success() => TransactionStatus::Success,
            _ => TransactionStatus::Fail,
        })
    }

    async fn fetch_block(&self, block_hash: &str) -> Result<Option<RpcBlock>, ServiceError> {
        match self
            .transport
            .invoke::<Option<RpcBlock>>("eth_getBlockByHash", vec![json!(block_hash), json!(false)])
            .await
        {
            Ok(block) => Ok(block),
            Err(TransportError::Rpc(e)) => {
                tracing::warn!(block_hash, code = e.code, message = %e.message, "block lookup failed");
                Ok(None)
            }
            Err(e) => Err(service_error(e)),
        }
    }
}

#[async_trait]
impl CurrencyService for EvmService {
    fn platform(&self) -> Platform {
        Platform::Ethereum
    }

    #[tracing::instrument(skip(self), fields(platform = "ethereum"))]
    async fn transaction_by_hash(
        &self,
        hash: &str,
    ) -> Result<Option<CurrencyTransaction>, ServiceError> {
        let Some(tx) = self.fetch_transaction(hash).await? else {
            tracing::debug!("transaction not found");
            return Ok(None);
        };

        let to = tx.to.clone().unwrap_or_default();
        let mut contract = Contract::lookup(Platform::Ethereum, &to);
        let input = self.decoder.decode(&tx.input, &to, tx.value_u256());
        if input.contract.is_some() {
            contract = input.contract;
        }
        let contract_address = match contract {
            Some(c) if !c.is_native() => c.address().to_string(),
            _ => String::new(),
        };

        let value = self.to_display_value(input.value, contract, &self.policy).await?;
        let status = self.fetch_status(hash).await?;

        // Pending transactions have no block yet.
        let time = match tx.block_hash.as_deref() {
            Some(block_hash) => self.fetch_block(block_hash).await?.and_then(|b| b.time()),
            None => None,
        };

        tracing::debug!(?contract, %value, %status, "transaction resolved");
        Ok(Some(CurrencyTransaction {
            platform: Platform::Ethereum,
            block: tx.block_number_u64(),
            hash: tx.hash,
            from: tx.from,
            to: input.to.clone(),
            contract,
            contract_address,
            value,
            status,
            time,
            input,
        }))
    }

    async fn decimals_of(&self, contract: Option<Contract>) -> Result<u32, ServiceError> {
        match contract {
            None => Ok(0),
            Some(c) => {
                ensure_platform(Platform::Ethereum, c)?;
                self.decimals_of_address(c.address()).await
            }
        }
    }

    async fn balance_of(&self, address: &str, contract: Contract) -> Result<U256, ServiceError> {
        ensure_platform(Platform::Ethereum, contract)?;
        if contract.is_native() {
            self.native_balance(address).await
        } else {
            self.token_balance(address, contract.address()).await
        }
    }
}
