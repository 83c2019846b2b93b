//! Outgoing World calls and their classification.

use std::sync::Arc;

use alloy_dyn_abi::{DynSolValue, JsonAbiExt};
use alloy_json_abi::{Function, JsonAbi};
use alloy_primitives::{Address, Bytes, B256};
use world_contracts::{IWorldCall::SystemCallData, BATCH_CALL, DELEGATION_PRIMITIVES};

use crate::{DelegationError, Result};

/// An outgoing contract write.
#[derive(Debug, Clone, PartialEq)]
pub struct WorldCall {
    /// The contract the call is sent to.
    pub address: Address,
    /// The name of the called function.
    pub function_name: String,
    /// The ABI the function is looked up in.
    pub abi: Arc<JsonAbi>,
    /// The call arguments.
    pub args: Vec<DynSolValue>,
}

impl WorldCall {
    /// Creates a new [`WorldCall`].
    pub fn new(
        address: Address,
        function_name: impl Into<String>,
        abi: Arc<JsonAbi>,
        args: Vec<DynSolValue>,
    ) -> Self {
        Self { address, function_name: function_name.into(), abi, args }
    }

    /// Returns the ABI function this call targets: the first overload named
    /// [`Self::function_name`] whose inputs accept [`Self::args`].
    pub fn function(&self) -> Result<&Function> {
        self.resolve_function().map(|(function, _)| function)
    }

    /// ABI-encodes the call, selector included.
    pub fn encode(&self) -> Result<Bytes> {
        self.resolve_function().map(|(_, calldata)| calldata)
    }

    fn resolve_function(&self) -> Result<(&Function, Bytes)> {
        let overloads = self
            .abi
            .function(&self.function_name)
            .filter(|overloads| !overloads.is_empty())
            .ok_or_else(|| DelegationError::UnknownFunction(self.function_name.clone()))?;

        let mut last_error = None;
        for function in overloads.iter().filter(|f| f.inputs.len() == self.args.len()) {
            match function.abi_encode_input(&self.args) {
                Ok(calldata) => return Ok((function, calldata.into())),
                Err(err) => last_error = Some(err),
            }
        }

        Err(match last_error {
            Some(source) => {
                DelegationError::Encode { function: self.function_name.clone(), source }
            }
            None => DelegationError::ArgumentCount {
                function: self.function_name.clone(),
                expected: overloads[0].inputs.len(),
                actual: self.args.len(),
            },
        })
    }
}

/// What the interceptor does with a call, decided once per call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallShape {
    /// The call is submitted unmodified: it does not target the World, or it already uses a
    /// delegation primitive.
    Passthrough,
    /// A delegator-less `batchCall`, rewrapped into `batchCallFrom`.
    Batch,
    /// Any other World function, rewritten into `callFrom`.
    Generic,
}

impl CallShape {
    /// Classifies `call` for the World at `world_address`. Only the target and the function name
    /// are looked at.
    pub fn classify(call: &WorldCall, world_address: Address) -> Self {
        if call.address != world_address
            || DELEGATION_PRIMITIVES.contains(&call.function_name.as_str())
        {
            Self::Passthrough
        } else if call.function_name == BATCH_CALL {
            Self::Batch
        } else {
            Self::Generic
        }
    }
}

/// Reads the system calls of a `batchCall` from its arguments, a single `(bytes32 systemId, bytes
/// callData)[]` array.
pub(crate) fn batch_system_calls(args: &[DynSolValue]) -> Result<Vec<SystemCallData>> {
    let [DynSolValue::Array(items) | DynSolValue::FixedArray(items)] = args else {
        return Err(DelegationError::InvalidBatchArguments);
    };
    items
        .iter()
        .map(|item| match item {
            DynSolValue::Tuple(fields) => match fields.as_slice() {
                [DynSolValue::FixedBytes(system_id, 32), DynSolValue::Bytes(call_data)] => {
                    Ok(SystemCallData {
                        systemId: *system_id,
                        callData: Bytes::copy_from_slice(call_data),
                    })
                }
                _ => Err(DelegationError::InvalidBatchArguments),
            },
            _ => Err(DelegationError::InvalidBatchArguments),
        })
        .collect()
}

/// Encodes a `batchCallFrom` system call argument: `(address from, bytes32 systemId, bytes
/// callData)`.
pub(crate) fn system_call_from_value(
    from: Address,
    system_id: B256,
    call_data: &[u8],
) -> DynSolValue {
    DynSolValue::Tuple(vec![
        DynSolValue::Address(from),
        DynSolValue::FixedBytes(system_id, 32),
        DynSolValue::Bytes(call_data.to_vec()),
    ])
}
