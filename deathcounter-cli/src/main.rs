//! ## deathcounter-cli
//! **Operator interface**
//! Drives the death counter without a game server: an interactive console
//! that stands in for one, scripted scenario replays, and a read-only view
//! of the data file.

use clap::Parser;

mod commands;
mod console;
mod error;
mod scenario;

use commands::Cli;

fn main() -> anyhow::Result<()> {
    commands::run_command(Cli::parse())
}
