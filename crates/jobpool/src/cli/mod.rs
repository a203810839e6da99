mod init;
mod run;

pub use init::InitCommand;
pub use run::RunCommand;

use anyhow::Result;
use clap::{Parser, Subcommand};

/// jobpool - bounded worker pool
#[derive(Parser)]
#[command(name = "jobpool")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Write a default configuration file.
    Init(InitCommand),

    /// Run the demo workload through a pool.
    Run(RunCommand),
}

impl Cli {
    /// Execute the CLI command.
    pub async fn execute(self) -> Result<()> {
        match self.command {
            Commands::Init(cmd) => cmd.execute(),
            Commands::Run(cmd) => cmd.execute().await,
        }
    }
}
