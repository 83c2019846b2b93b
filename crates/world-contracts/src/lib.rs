//! Solidity bindings for the World contract.
//!
//! This crate provides the delegation entry points of the World (`call`, `callFrom`,
//! `batchCall`, `batchCallFrom`, `callWithSignature`), the store read surface used to look up
//! registered function selectors, and the events emitted when a World is deployed.

#![warn(missing_docs)]
#![warn(unused_crate_dependencies)]
#![deny(unused_must_use)]

use std::sync::Arc;

use alloy_json_abi::JsonAbi;
use once_cell::sync::Lazy;

pub use alloy_primitives;
pub use alloy_sol_types;

alloy_sol_types::sol! {
    /// Delegation entry points exposed by the World.
    ///
    /// These signatures are the wire contract of the delegation layer: a rewritten call must
    /// match them exactly or the World reverts.
    #[derive(Debug, PartialEq, Eq)]
    interface IWorldCall {
        /// A single system call inside a `batchCall`.
        struct SystemCallData {
            bytes32 systemId;
            bytes callData;
        }

        /// A single system call inside a `batchCallFrom`, made on behalf of `from`.
        struct SystemCallFromData {
            address from;
            bytes32 systemId;
            bytes callData;
        }

        function call(bytes32 systemId, bytes memory callData) external payable returns (bytes memory);

        function callFrom(address delegator, bytes32 systemId, bytes memory callData) external payable returns (bytes memory);

        function batchCall(SystemCallData[] calldata systemCalls) external payable returns (bytes[] memory returnDatas);

        function batchCallFrom(SystemCallFromData[] calldata systemCalls) external payable returns (bytes[] memory returnDatas);

        function callWithSignature(address signer, bytes32 systemId, bytes memory callData, bytes memory signature) external payable returns (bytes memory);
    }
}

alloy_sol_types::sol! {
    /// Read access to the World's store tables.
    #[derive(Debug, PartialEq, Eq)]
    interface IStoreRead {
        function getRecord(bytes32 tableId, bytes32[] memory keyTuple) external view returns (bytes memory staticData, bytes32 encodedLengths, bytes memory dynamicData);
    }
}

alloy_sol_types::sol! {
    /// Events emitted once by the World and its store when the World is deployed.
    #[derive(Debug, PartialEq, Eq)]
    interface IWorldEvents {
        event HelloWorld(bytes32 indexed worldVersion);

        event HelloStore(bytes32 indexed storeVersion);
    }
}

/// Names of the World functions that already carry delegation semantics.
///
/// Calls to these functions are submitted as they are.
pub const DELEGATION_PRIMITIVES: &[&str] =
    &["call", "callFrom", "batchCallFrom", "callWithSignature"];

/// Name of the delegator-less batch entry point.
pub const BATCH_CALL: &str = "batchCall";

/// Name of the delegated batch entry point.
pub const BATCH_CALL_FROM: &str = "batchCallFrom";

/// Name of the delegated single call entry point.
pub const CALL_FROM: &str = "callFrom";

/// Human readable signatures of the delegation entry points.
pub const WORLD_CALL_SIGNATURES: &[&str] = &[
    "function call(bytes32 systemId, bytes callData) payable returns (bytes)",
    "function callFrom(address delegator, bytes32 systemId, bytes callData) payable returns (bytes)",
    "function batchCall((bytes32,bytes)[] systemCalls) payable returns (bytes[] returnDatas)",
    "function batchCallFrom((address,bytes32,bytes)[] systemCalls) payable returns (bytes[] returnDatas)",
    "function callWithSignature(address signer, bytes32 systemId, bytes callData, bytes signature) payable returns (bytes)",
];

/// The JSON ABI of the delegation entry points, parsed from [`WORLD_CALL_SIGNATURES`].
pub static WORLD_CALL_ABI: Lazy<Arc<JsonAbi>> = Lazy::new(|| {
    Arc::new(
        JsonAbi::parse(WORLD_CALL_SIGNATURES.iter().copied())
            .expect("delegation signatures are valid human readable ABI"),
    )
});

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_sol_types::{SolCall, SolEvent};

    #[test]
    fn test_world_call_abi_matches_bindings() {
        let abi = &*WORLD_CALL_ABI;
        let selector_of =
            |name: &str| abi.function(name).and_then(|f| f.first()).map(|f| f.selector());

        assert_eq!(selector_of("call"), Some(IWorldCall::callCall::SELECTOR.into()));
        assert_eq!(selector_of("callFrom"), Some(IWorldCall::callFromCall::SELECTOR.into()));
        assert_eq!(selector_of("batchCall"), Some(IWorldCall::batchCallCall::SELECTOR.into()));
        assert_eq!(
            selector_of("batchCallFrom"),
            Some(IWorldCall::batchCallFromCall::SELECTOR.into())
        );
        assert_eq!(
            selector_of("callWithSignature"),
            Some(IWorldCall::callWithSignatureCall::SELECTOR.into())
        );
    }

    #[test]
    fn test_event_signatures() {
        assert_eq!(IWorldEvents::HelloWorld::SIGNATURE, "HelloWorld(bytes32)");
        assert_eq!(IWorldEvents::HelloStore::SIGNATURE, "HelloStore(bytes32)");
    }

    #[test]
    fn test_call_from_signature() {
        assert_eq!(IWorldCall::callFromCall::SIGNATURE, "callFrom(address,bytes32,bytes)");
        assert_eq!(
            IWorldCall::batchCallFromCall::SIGNATURE,
            "batchCallFrom((address,bytes32,bytes)[])"
        );
    }
}
