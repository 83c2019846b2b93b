use alloy_primitives::{hex, Address, Bytes, Selector, B256};
use alloy_sol_types::SolCall;
use clap::Parser;
use tracing::debug;
use world_delegation::{
    arguments, rewrite, selector, world_contracts::IWorldCall::callFromCall, SELECTOR_LEN,
};

use crate::common::{load_hex, CliError, Result};

/// Rewrite World calldata into `callFrom` calldata, without touching the chain
#[derive(Parser, Debug)]
pub struct Cmd {
    /// World calldata as hex string (positional argument)
    #[arg(value_name = "CALLDATA")]
    pub calldata: Option<String>,

    /// File containing the World calldata. If '-' is specified, it is read from stdin
    #[arg(long = "calldata.file", visible_aliases = ["calldata-file"])]
    pub calldata_file: Option<String>,

    /// Function selector of the System function implementing the World function
    #[arg(long = "system-selector")]
    pub system_selector: Selector,

    /// Resource id of the System
    #[arg(long = "system-id")]
    pub system_id: B256,

    /// The account the call is made on behalf of
    #[arg(long = "delegator", env = "WORLD_DELEGATOR")]
    pub delegator: Address,
}

impl Cmd {
    /// Execute the rewrite command
    pub fn run(&self) -> Result<()> {
        let calldata = load_hex(self.calldata.as_deref(), self.calldata_file.as_deref())?
            .ok_or_else(|| CliError::InvalidInput("No calldata provided".to_string()))?;
        println!("{}", hex::encode_prefixed(self.call_from_calldata(&calldata)?));
        Ok(())
    }

    fn call_from_calldata(&self, world_calldata: &[u8]) -> Result<Bytes> {
        if world_calldata.len() < SELECTOR_LEN {
            return Err(CliError::InvalidInput(format!(
                "Calldata of {} bytes has no function selector",
                world_calldata.len()
            )));
        }
        debug!(
            world_selector = %selector(world_calldata),
            system_selector = %self.system_selector,
            "Rewriting calldata"
        );

        let call = callFromCall {
            delegator: self.delegator,
            systemId: self.system_id,
            callData: rewrite(self.system_selector, arguments(world_calldata)),
        };
        Ok(call.abi_encode().into())
    }
}
