//! # chaintx-evm
//!
//! Transaction and balance resolution for Ethereum-compatible chains.
//!
//! ## Implementation notes
//! - `abi` builds `selector ++ abi_encode(inputs)` call data with `alloy-dyn-abi`
//!   and decodes `eth_call` return data against declared output types
//! - `input` classifies transaction call data: empty → native transfer,
//!   `transfer` / `transferFrom` → token transfer, anything else → unrecognized
//! - `service` drives the lookup: transaction → input → decimals → receipt → block

pub mod abi;
mod convert;
pub mod input;
pub mod service;
pub mod wire;

pub use abi::{selector, ContractCaller, FunctionCall};
pub use input::{InputDecoder, TransferMethod, TRANSFER_METHODS};
pub use service::EvmService;
pub use wire::{BlockTag, RpcBlock, RpcReceipt, RpcTransaction, RECEIPT_STATUS_SUCCESS};
