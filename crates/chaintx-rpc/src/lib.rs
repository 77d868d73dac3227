//! chaintx-rpc: the request/response primitive every chaintx resolver sits on.
//!
//! # Overview
//!
//! - [`RpcTransport`]: the async trait a JSON-RPC endpoint implements
//! - [`RpcTransportExt::invoke`]: call a method and deserialize the typed result
//! - [`JsonRpcRequest`] / [`JsonRpcResponse`]: wire types
//! - [`TransportError`]: connectivity failures vs. remote error envelopes
//! - [`HttpRpcClient`]: `reqwest`-backed transport
//! - [`MockTransport`]: scripted transport for tests
//!
//! No retry policy is applied here. A failed call is reported once and the
//! caller decides whether to try again.

pub mod error;
pub mod http;
pub mod mock;
pub mod request;
pub mod transport;

pub use error::TransportError;
pub use http::{HttpClientConfig, HttpRpcClient};
pub use mock::MockTransport;
pub use request::{JsonRpcError, JsonRpcRequest, JsonRpcResponse, RpcId};
pub use transport::{RpcTransport, RpcTransportExt};
