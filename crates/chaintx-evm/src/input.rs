//! Transaction call-data classification.
//!
//! Empty call data is a native-coin transfer. Otherwise the leading 4-byte
//! selector is matched against [`TRANSFER_METHODS`] in order; the first
//! match decodes destination and amount from the ABI-encoded arguments.
//! Anything else is left unrecognized rather than treated as an error.

use alloy_dyn_abi::{DynSolType, DynSolValue, Specifier};
use alloy_json_abi::Function;
use alloy_primitives::{Address, U256};

use chaintx_core::{Contract, DecodedInput};

use crate::wire::EMPTY_INPUT;

const SELECTOR_LEN: usize = 4;

/// Pulls `(destination, amount)` out of a method's decoded arguments.
pub type ExtractTransfer = fn(&[DynSolValue]) -> Option<(Address, U256)>;

/// A transfer-style method the decoder understands.
#[derive(Debug, Clone, Copy)]
pub struct TransferMethod {
    pub signature: &'static str,
    pub extract: ExtractTransfer,
}

/// Recognized methods, checked in order.
pub const TRANSFER_METHODS: &[TransferMethod] = &[
    TransferMethod {
        signature: "transfer(address,uint256)",
        extract: extract_transfer,
    },
    TransferMethod {
        signature: "transferFrom(address,address,uint256)",
        extract: extract_transfer_from,
    },
];

fn extract_transfer(args: &[DynSolValue]) -> Option<(Address, U256)> {
    Some((args.first()?.as_address()?, args.get(1)?.as_uint()?.0))
}

fn extract_transfer_from(args: &[DynSolValue]) -> Option<(Address, U256)> {
    Some((args.get(1)?.as_address()?, args.get(2)?.as_uint()?.0))
}

struct Compiled {
    selector: [u8; 4],
    name: String,
    args: DynSolType,
    extract: ExtractTransfer,
}

/// Classifies raw call data into a [`DecodedInput`].
pub struct InputDecoder {
    native: Contract,
    methods: Vec<Compiled>,
}

impl InputDecoder {
    /// A decoder for [`TRANSFER_METHODS`] on a chain whose native coin is `native`.
    pub fn new(native: Contract) -> Self {
        Self::with_methods(native, TRANSFER_METHODS)
    }

    pub fn with_methods(native: Contract, methods: &[TransferMethod]) -> Self {
        let methods = methods
            .iter()
            .filter_map(|m| match compile(m) {
                Ok(c) => Some(c),
                Err(reason) => {
                    tracing::error!(signature = m.signature, %reason, "skipping transfer method");
                    None
                }
            })
            .collect();
        Self { native, methods }
    }

    /// Classify `input` (hex call data) sent to `to` with native `value` attached.
    pub fn decode(&self, input: &str, to: &str, value: U256) -> DecodedInput {
        let trimmed = input.trim();
        if trimmed.is_empty() || trimmed == EMPTY_INPUT {
            return DecodedInput::native(to, value, self.native);
        }
        match hex::decode(trimmed.strip_prefix("0x").unwrap_or(trimmed)) {
            Ok(data) => self.decode_bytes(&data),
            Err(e) => {
                tracing::warn!(error = %e, "call data is not hex");
                DecodedInput::default()
            }
        }
    }

    /// Classify non-empty call data bytes.
    pub fn decode_bytes(&self, data: &[u8]) -> DecodedInput {
        if data.len() <= SELECTOR_LEN {
            return DecodedInput::default();
        }
        let (selector, args) = data.split_at(SELECTOR_LEN);

        let Some(method) = self.methods.iter().find(|m| m.selector == selector) else {
            tracing::debug!(selector = %hex::encode(selector), "unrecognized call selector");
            return DecodedInput::default();
        };

        let decoded = match method.args.abi_decode_params(args) {
            Ok(DynSolValue::Tuple(values)) => values,
            Ok(other) => vec![other],
            Err(e) => {
                tracing::warn!(method = %method.name, error = %e, "malformed transfer arguments");
                return DecodedInput::default();
            }
        };

        match (method.extract)(&decoded) {
            Some((to, amount)) => DecodedInput::token(format!("{to:#x}"), amount),
            None => DecodedInput::default(),
        }
    }
}

fn compile(method: &TransferMethod) -> Result<Compiled, String> {
    let func = Function::parse(method.signature).map_err(|e| e.to_string())?;
    let args = func
        .inputs
        .iter()
        .map(|p| p.resolve().map_err(|e| e.to_string()))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Compiled {
        selector: func.selector().0,
        name: func.name.clone(),
        args: DynSolType::Tuple(args),
        extract: method.extract,
    })
}
