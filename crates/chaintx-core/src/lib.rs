//! chaintx-core: shared model for cross-chain transaction lookups.
//!
//! - [`Contract`] / [`Platform`]: the closed registry of known coins and tokens
//! - [`CurrencyTransaction`] / [`DecodedInput`]: the normalized record
//! - [`scale`]: raw integer amounts to human-scale decimals
//! - [`DecimalCache`]: lazily filled contract precision cache
//! - [`CurrencyService`]: the lookup interface every platform implements
//! - [`Config`]: endpoint configuration

pub mod cache;
pub mod config;
pub mod contract;
pub mod error;
pub mod scale;
pub mod service;
pub mod types;

pub use cache::DecimalCache;
pub use config::{Config, EvmConfig, ScaleConfig, TronscanConfig};
pub use contract::{Contract, Platform, EVM_NATIVE_ADDRESS, TRON_NATIVE_ADDRESS};
pub use error::ServiceError;
pub use scale::{scale, to_decimal, ScalePolicy};
pub use service::CurrencyService;
pub use types::{CurrencyTransaction, DecodedInput, TransactionStatus};

pub use alloy_primitives::U256;
pub use bigdecimal::{BigDecimal, RoundingMode};
