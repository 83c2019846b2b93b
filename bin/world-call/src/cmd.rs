use clap::{Parser, Subcommand};

use crate::common::{LogArgs, Result};

/// Delegated World calls from the command line
#[derive(Parser, Debug)]
#[command(infer_subcommands = true, version)]
pub struct Cli {
    /// The command to run
    #[command(subcommand)]
    pub cmd: MainCmd,

    /// Logging configuration
    #[command(flatten)]
    pub log_args: LogArgs,
}

/// Main command enumeration for the world-call CLI tool
#[derive(Subcommand, Debug)]
pub enum MainCmd {
    /// Rewrite World calldata into `callFrom` calldata
    Rewrite(crate::rewrite::Cmd),
    /// Resolve a World function selector to its System function
    Resolve(crate::resolve::Cmd),
    /// Find the deployment of a World from its deployment logs
    Deploy(crate::deploy::Cmd),
    /// Preview the delegated form of a World write
    CallFrom(crate::call_from::Cmd),
}

impl Cli {
    /// Execute the selected command
    pub async fn run(&self) -> Result<()> {
        self.log_args.init()?;
        match &self.cmd {
            MainCmd::Rewrite(cmd) => cmd.run(),
            MainCmd::Resolve(cmd) => cmd.run().await,
            MainCmd::Deploy(cmd) => cmd.run().await,
            MainCmd::CallFrom(cmd) => cmd.run().await,
        }
    }
}
