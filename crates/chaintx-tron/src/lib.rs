//! chaintx-tron: Tron lookups through the Tronscan explorer REST API.
//!
//! - [`ExplorerTransport`]: one `GET` returning JSON; [`HttpExplorer`] is the
//!   `reqwest` implementation
//! - [`TransactionInfo`] / [`AccountInfo`]: the response fields we read
//! - [`TronscanService`]: the [`chaintx_core::CurrencyService`] for Tron

pub mod api;
pub mod service;
pub mod types;

pub use api::{ExplorerTransport, HttpExplorer, ACCOUNT_PATH, TOKEN_PATH, TRANSACTION_PATH};
pub use service::TronscanService;
pub use types::{AccountInfo, ContractData, TokenBalance, TokenInfo, TransactionInfo, Trc20Transfer};
