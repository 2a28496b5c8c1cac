//! CLI argument parsing structures.

use clap::Parser;

use super::commands::Commands;

/// Main CLI structure for nova.
#[derive(Parser, Debug)]
#[command(name = "nova")]
#[command(version, about = "Personal project toolbox: reusable configs and encrypted secrets", long_about = None)]
pub struct Cli {
    /// Show debug logging (overridden by NOVA_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}
