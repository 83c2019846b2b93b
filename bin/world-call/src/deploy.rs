use alloy_provider::Provider;
use alloy_rpc_types_eth::{BlockNumberOrTag, Filter};
use alloy_sol_types::SolEvent;
use clap::Parser;
use world_delegation::{
    logs_to_world_deploy,
    world_contracts::IWorldEvents::{HelloStore, HelloWorld},
};

use crate::common::{Result, WorldArgs};

/// Find the deployment of a World from its `HelloWorld` and `HelloStore` logs
#[derive(Parser, Debug)]
pub struct Cmd {
    /// First block to search for deployment logs
    #[arg(long = "from-block", default_value = "0")]
    pub from_block: u64,

    /// Last block to search for deployment logs. Defaults to the latest block
    #[arg(long = "to-block")]
    pub to_block: Option<u64>,

    /// World connection
    #[command(flatten)]
    pub world_args: WorldArgs,
}

impl Cmd {
    /// Execute the deploy command
    pub async fn run(&self) -> Result<()> {
        let provider = self.world_args.connect()?;

        eprintln!("Fetching deployment logs of World {}", self.world_args.world);
        let logs = provider.get_logs(&self.deploy_filter()).await?;
        eprintln!("Found {} deployment logs", logs.len());

        let deploy = logs_to_world_deploy(&logs)?;
        println!("{}", serde_json::to_string_pretty(&deploy)?);
        Ok(())
    }

    /// Matches the `HelloWorld` and `HelloStore` logs of the World in the searched block range.
    fn deploy_filter(&self) -> Filter {
        Filter::new()
            .address(self.world_args.world)
            .event_signature(vec![HelloWorld::SIGNATURE_HASH, HelloStore::SIGNATURE_HASH])
            .from_block(self.from_block)
            .to_block(self.to_block.map_or(BlockNumberOrTag::Latest, BlockNumberOrTag::Number))
    }
}
