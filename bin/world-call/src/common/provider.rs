//! JSON-RPC backed capabilities for the delegation layer.

use alloy_primitives::{Address, Bytes};
use alloy_provider::{Provider, ProviderBuilder};
use alloy_rpc_types_eth::{TransactionInput, TransactionRequest};
use alloy_transport::TransportError;
use clap::Args;
use serde::Serialize;
use tracing::debug;
use world_delegation::{ContractReader, DelegationError, WorldCall, WorldWriter};

use super::{CliError, Result};

/// Connection to a World over JSON-RPC.
#[derive(Args, Debug, Clone)]
pub struct WorldArgs {
    /// RPC URL of the chain the World is deployed on
    #[arg(long = "rpc", env = "WORLD_RPC_URL", default_value = "http://localhost:8545")]
    pub rpc: String,

    /// Address of the World
    #[arg(long = "world", env = "WORLD_ADDRESS")]
    pub world: Address,
}

impl WorldArgs {
    /// Connects to the configured RPC endpoint.
    pub fn connect(&self) -> Result<impl Provider + Clone> {
        let url = self
            .rpc
            .parse()
            .map_err(|e| CliError::InvalidInput(format!("Invalid RPC URL '{}': {}", self.rpc, e)))?;
        debug!(rpc = %self.rpc, "Connecting to RPC");
        Ok(ProviderBuilder::new().disable_recommended_fillers().on_http(url))
    }
}

/// A [`ContractReader`] executing `eth_call` against the latest block.
#[derive(Debug, Clone)]
pub struct RpcReader<P> {
    provider: P,
}

impl<P> RpcReader<P> {
    /// Creates a reader on top of `provider`.
    pub const fn new(provider: P) -> Self {
        Self { provider }
    }
}

impl<P: Provider> ContractReader for RpcReader<P> {
    type Error = TransportError;

    async fn call(&self, to: Address, input: Bytes) -> std::result::Result<Bytes, Self::Error> {
        let tx = TransactionRequest::default().to(to).input(TransactionInput::new(input));
        self.provider.call(tx).await
    }
}

/// A write that was prepared but not submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DryRun {
    /// The contract the write targets.
    pub to: Address,
    /// The called function.
    pub function: String,
    /// The encoded calldata.
    pub calldata: Bytes,
}

/// A [`WorldWriter`] that encodes writes instead of submitting them.
#[derive(Debug, Clone, Copy, Default)]
pub struct DryRunWriter;

impl WorldWriter for DryRunWriter {
    type Output = DryRun;
    type Error = DelegationError;

    async fn write_contract(&self, call: WorldCall) -> std::result::Result<DryRun, Self::Error> {
        let calldata = call.encode()?;
        Ok(DryRun { to: call.address, function: call.function()?.signature(), calldata })
    }
}
