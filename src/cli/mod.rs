//! Command-line interface wiring for the `fixcol` binary.
//!
//! This module owns the clap definitions and delegates execution to
//! specialized submodules that encapsulate each command family.

use anyhow::Result;
use clap::{Parser, Subcommand};

pub mod common;
pub mod decode;
pub mod encode;
pub mod layout;
pub mod utils;
pub mod verify;

/// Parsed CLI entrypoint for the `fixcol` binary.
#[derive(Parser, Debug)]
#[command(name = "fixcol", version, about = "Fixed-width record file toolkit")]
pub struct Cli {
    /// Top-level command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// High-level command families made available to end users.
#[derive(Subcommand, Debug)]
pub enum Command {
    #[command(subcommand)]
    Layout(layout::LayoutCommand),
    #[command(subcommand)]
    Decode(decode::DecodeCommand),
    #[command(subcommand)]
    Encode(encode::EncodeCommand),
    #[command(subcommand)]
    Verify(verify::VerifyCommand),
}

/// Execute the requested command.
pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Layout(cmd) => layout::handle(cmd),
        Command::Decode(cmd) => decode::handle(cmd),
        Command::Encode(cmd) => encode::handle(cmd),
        Command::Verify(cmd) => verify::handle(cmd),
    }
}
