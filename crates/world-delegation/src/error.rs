use alloy_primitives::{Address, Selector};

use crate::StoreDecodeError;

/// A boxed error raised by a collaborator (reader, writer or selector mapper).
pub type BoxError = Box<dyn core::error::Error + Send + Sync>;

/// Error types for delegated World calls
#[derive(Debug, thiserror::Error)]
pub enum DelegationError {
    /// `batchCall` was invoked without any system call
    #[error("`batchCall` should have at least one system call")]
    EmptyBatch,

    /// `batchCall` arguments are not a single `(bytes32, bytes)[]` array
    #[error("`batchCall` expects a single `(bytes32 systemId, bytes callData)[]` argument")]
    InvalidBatchArguments,

    /// The function is not part of the call's ABI
    #[error("function `{0}` not found in ABI")]
    UnknownFunction(String),

    /// No overload of the function takes the given number of arguments
    #[error("function `{function}` takes {expected} arguments, {actual} given")]
    ArgumentCount {
        /// The function name
        function: String,
        /// Number of inputs of the first overload
        expected: usize,
        /// Number of arguments of the call
        actual: usize,
    },

    /// The arguments could not be ABI-encoded
    #[error("failed to encode call to `{function}`: {source}")]
    Encode {
        /// The function name
        function: String,
        /// The encoder error
        #[source]
        source: alloy_dyn_abi::Error,
    },

    /// Neither a selector mapper nor a contract reader is configured
    #[error("no selector mapper or contract reader to resolve selector {0}")]
    NoResolver(Selector),

    /// The injected selector mapping failed
    #[error("selector mapping failed: {0}")]
    Mapping(#[source] BoxError),

    /// The contract read failed
    #[error("contract read failed: {0}")]
    Read(#[source] BoxError),

    /// The `getRecord` output could not be decoded
    #[error("invalid getRecord output: {0}")]
    Decode(#[from] alloy_sol_types::Error),

    /// The function selector record is malformed
    #[error("malformed store record: {0}")]
    Record(#[from] StoreDecodeError),

    /// The World has no System registered for the selector
    #[error("no system registered for selector {selector} on world {world}")]
    UnregisteredSelector {
        /// The World address
        world: Address,
        /// The World function selector
        selector: Selector,
    },

    /// The underlying write failed
    #[error("write failed: {0}")]
    Write(#[source] BoxError),
}

/// Result type for delegated World calls
pub type Result<T, E = DelegationError> = core::result::Result<T, E>;
