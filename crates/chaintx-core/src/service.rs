//! The platform-neutral lookup interface.

use alloy_primitives::U256;
use async_trait::async_trait;
use bigdecimal::BigDecimal;

use crate::contract::{Contract, Platform};
use crate::error::ServiceError;
use crate::scale::{scale, to_decimal, ScalePolicy};
use crate::types::CurrencyTransaction;

/// Transaction and balance lookups for one platform.
///
/// Implementations must be `Send + Sync`; independent lookups may run
/// concurrently against one service instance.
#[async_trait]
pub trait CurrencyService: Send + Sync {
    fn platform(&self) -> Platform;

    /// Resolve a transaction by hash.
    ///
    /// `Ok(None)` means the transaction is not known to the data source
    /// (not yet mined or broadcast, or the source reported an error for it).
    async fn transaction_by_hash(
        &self,
        hash: &str,
    ) -> Result<Option<CurrencyTransaction>, ServiceError>;

    /// Decimal precision of `contract`; `None` resolves to `0`.
    async fn decimals_of(&self, contract: Option<Contract>) -> Result<u32, ServiceError>;

    /// Raw balance of `address` in `contract`'s smallest unit.
    async fn balance_of(&self, address: &str, contract: Contract) -> Result<U256, ServiceError>;

    /// `raw / 10^decimals_of(contract)` shaped by `policy`.
    ///
    /// Without a contract the raw amount passes through unscaled.
    async fn to_display_value(
        &self,
        raw: U256,
        contract: Option<Contract>,
        policy: &ScalePolicy,
    ) -> Result<BigDecimal, ServiceError> {
        match contract {
            None => Ok(to_decimal(raw)),
            Some(c) => {
                let decimals = self.decimals_of(Some(c)).await?;
                Ok(scale(raw, decimals, policy))
            }
        }
    }
}

/// Reject contracts that belong to another platform.
pub fn ensure_platform(platform: Platform, contract: Contract) -> Result<(), ServiceError> {
    if contract.platform() == platform {
        Ok(())
    } else {
        Err(ServiceError::UnsupportedContract {
            contract: contract.symbol().to_string(),
            platform,
        })
    }
}
