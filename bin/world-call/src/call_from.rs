use std::sync::Arc;

use alloy_dyn_abi::{DynSolValue, Specifier};
use alloy_json_abi::{Function, JsonAbi};
use alloy_primitives::Address;
use clap::Parser;
use world_delegation::{CallFrom, CallFromConfig, WorldCall};

use crate::common::{CliError, DryRunWriter, Result, RpcReader, WorldArgs};

/// Preview the delegated form of a World write. Nothing is submitted; the call that would be sent
/// is printed as JSON
#[derive(Parser, Debug)]
pub struct Cmd {
    /// Signature of the called function, e.g. `setValue(uint256)`
    #[arg(value_name = "SIGNATURE")]
    pub signature: String,

    /// Arguments of the call
    #[arg(value_name = "ARGS")]
    pub args: Vec<String>,

    /// The account the write is made on behalf of
    #[arg(long = "delegator", env = "WORLD_DELEGATOR")]
    pub delegator: Address,

    /// Contract the write targets. Defaults to the World
    #[arg(long = "to")]
    pub to: Option<Address>,

    /// World connection
    #[command(flatten)]
    pub world_args: WorldArgs,
}

impl Cmd {
    /// Execute the call-from command
    pub async fn run(&self) -> Result<()> {
        let call = self.world_call()?;
        let reader = RpcReader::new(self.world_args.connect()?);
        let config = CallFromConfig::new(self.world_args.world, self.delegator);
        let interceptor = CallFrom::writer_only(DryRunWriter, config).with_reader(reader);

        let dry_run = interceptor.write_contract(call).await?;
        println!("{}", serde_json::to_string_pretty(&dry_run)?);
        Ok(())
    }

    /// Builds the call described by the signature and arguments.
    fn world_call(&self) -> Result<WorldCall> {
        let function = Function::parse(&self.signature).map_err(|e| {
            CliError::InvalidInput(format!("Invalid signature '{}': {e}", self.signature))
        })?;
        if function.inputs.len() != self.args.len() {
            return Err(CliError::InvalidInput(format!(
                "{} takes {} arguments, got {}",
                function.signature(),
                function.inputs.len(),
                self.args.len()
            )));
        }
        let args = function
            .inputs
            .iter()
            .zip(&self.args)
            .map(|(param, arg)| -> Result<DynSolValue> { Ok(param.resolve()?.coerce_str(arg)?) })
            .collect::<Result<Vec<_>>>()?;

        let name = function.name.clone();
        let mut abi = JsonAbi::new();
        abi.functions.entry(name.clone()).or_default().push(function);

        Ok(WorldCall::new(self.to.unwrap_or(self.world_args.world), name, Arc::new(abi), args))
    }
}
