//! Generic read-only contract calls.
//!
//! A [`FunctionCall`] pairs a method name and typed input values with the
//! expected output types. Call data is `selector ++ abi_encode(inputs)`, where
//! the selector is `keccak256(canonical_signature)[..4]`; return data is
//! decoded against the declared outputs, in declaration order.

use alloy_dyn_abi::{DynSolType, DynSolValue};
use alloy_primitives::keccak256;
use serde_json::json;
use std::sync::Arc;

use chaintx_core::ServiceError;
use chaintx_rpc::{RpcTransport, RpcTransportExt};

use crate::convert::service_error;
use crate::wire::BlockTag;

/// 4-byte selector of a canonical signature such as `transfer(address,uint256)`.
pub fn selector(signature: &str) -> [u8; 4] {
    let hash = keccak256(signature.as_bytes());
    let mut out = [0u8; 4];
    out.copy_from_slice(&hash[..4]);
    out
}

/// A contract method invocation with its declared output shape.
#[derive(Debug, Clone)]
pub struct FunctionCall {
    pub name: String,
    pub inputs: Vec<DynSolValue>,
    pub outputs: Vec<DynSolType>,
}

impl FunctionCall {
    pub fn new(name: impl Into<String>, inputs: Vec<DynSolValue>, outputs: Vec<DynSolType>) -> Self {
        Self {
            name: name.into(),
            inputs,
            outputs,
        }
    }

    /// Canonical signature, e.g. `balanceOf(address)`.
    pub fn signature(&self) -> Result<String, ServiceError> {
        let types = self
            .inputs
            .iter()
            .enumerate()
            .map(|(i, v)| {
                v.as_type()
                    .map(|t| t.sol_type_name().into_owned())
                    .ok_or_else(|| ServiceError::decode(format!("{}: input {i} has no ABI type", self.name)))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(format!("{}({})", self.name, types.join(",")))
    }

    pub fn selector(&self) -> Result<[u8; 4], ServiceError> {
        Ok(selector(&self.signature()?))
    }

    /// Call data: selector followed by the ABI-encoded inputs.
    pub fn encode(&self) -> Result<Vec<u8>, ServiceError> {
        let mut data = self.selector()?.to_vec();
        data.extend_from_slice(&DynSolValue::Tuple(self.inputs.clone()).abi_encode_params());
        Ok(data)
    }

    /// Decode return data into one value per declared output.
    ///
    /// Empty return data yields an empty list ("no data"). Data whose length
    /// does not fit the declared outputs is a [`ServiceError::Decode`].
    pub fn decode_output(&self, data: &[u8]) -> Result<Vec<DynSolValue>, ServiceError> {
        if data.is_empty() || self.outputs.is_empty() {
            return Ok(vec![]);
        }
        if data.len() % 32 != 0 {
            return Err(ServiceError::decode(format!(
                "{}: return data is {} bytes, not a multiple of 32",
                self.name,
                data.len()
            )));
        }

        let decoded = DynSolType::Tuple(self.outputs.clone())
            .abi_decode_params(data)
            .map_err(|e| ServiceError::decode(format!("{} output: {e}", self.name)))?;

        let values = match decoded {
            DynSolValue::Tuple(values) => values,
            other => vec![other],
        };
        if values.len() != self.outputs.len() {
            return Err(ServiceError::decode(format!(
                "{}: expected {} outputs, decoded {}",
                self.name,
                self.outputs.len(),
                values.len()
            )));
        }
        Ok(values)
    }
}

/// Executes [`FunctionCall`]s through `eth_call`.
#[derive(Clone)]
pub struct ContractCaller {
    transport: Arc<dyn RpcTransport>,
}

impl ContractCaller {
    pub fn new(transport: Arc<dyn RpcTransport>) -> Self {
        Self { transport }
    }

    /// Run `function` against the contract at `to` as a read-only call.
    pub async fn call(
        &self,
        function: &FunctionCall,
        from: &str,
        to: &str,
        block: BlockTag,
    ) -> Result<Vec<DynSolValue>, ServiceError> {
        let data = function.encode()?;
        let request = json!({
            "from": from,
            "to": to,
            "data": format!("0x{}", hex::encode(&data)),
        });

        let raw: String = self
            .transport
            .invoke("eth_call", vec![request, block.to_param()])
            .await
            .map_err(service_error)?;

        let bytes = hex::decode(raw.strip_prefix("0x").unwrap_or(&raw))
            .map_err(|e| ServiceError::decode(format!("{} return data is not hex: {e}", function.name)))?;
        tracing::trace!(method = %function.name, to, bytes = bytes.len(), "eth_call returned");
        function.decode_output(&bytes)
    }
}
