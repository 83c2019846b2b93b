//! Command line tool for delegated World calls.
//!
//! Rewrites World calldata into `callFrom` calldata, resolves World function selectors against a
//! deployed World and previews the delegated form of a World write.

use clap::Parser;

mod call_from;
mod cmd;
mod common;
mod deploy;
mod resolve;
mod rewrite;

use cmd::Cli;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), common::CliError> {
    set_thread_panic_hook();
    Cli::parse().run().await.inspect_err(|e| eprintln!("{e}"))
}

/// Sets thread panic hook, useful for having tests that panic.
fn set_thread_panic_hook() {
    use std::{
        backtrace::Backtrace,
        panic::{set_hook, take_hook},
        process::exit,
    };
    let orig_hook = take_hook();
    set_hook(Box::new(move |panic_info| {
        eprintln!("Custom backtrace: {}", Backtrace::capture());
        orig_hook(panic_info);
        exit(1);
    }));
}
