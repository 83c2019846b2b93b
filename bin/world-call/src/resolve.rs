use alloy_json_abi::Function;
use alloy_primitives::Selector;
use clap::Parser;
use world_delegation::{NoMapper, ResolutionStrategy, SelectorResolver};

use crate::common::{CliError, Result, RpcReader, WorldArgs};

/// Resolve a World function selector to the System function registered for it
#[derive(Parser, Debug)]
pub struct Cmd {
    /// World function selector (`0xd09de08a`) or signature (`increment()`)
    #[arg(value_name = "FUNCTION")]
    pub function: String,

    /// World connection
    #[command(flatten)]
    pub world_args: WorldArgs,
}

impl Cmd {
    /// Execute the resolve command
    pub async fn run(&self) -> Result<()> {
        let world_function_selector = parse_selector(&self.function)?;
        let reader = RpcReader::new(self.world_args.connect()?);

        let system_function = SelectorResolver::default()
            .resolve(
                self.world_args.world,
                world_function_selector,
                ResolutionStrategy::<NoMapper, _>::OnChain(&reader),
            )
            .await?;

        println!("{}", serde_json::to_string_pretty(&system_function)?);
        Ok(())
    }
}

/// Parses a function selector, or computes it from a function signature.
fn parse_selector(function: &str) -> Result<Selector> {
    if function.starts_with("0x") {
        return function
            .parse()
            .map_err(|e| CliError::InvalidInput(format!("Invalid selector '{function}': {e}")));
    }
    Function::parse(function)
        .map(|function| function.selector())
        .map_err(|e| CliError::InvalidInput(format!("Invalid signature '{function}': {e}")))
}
