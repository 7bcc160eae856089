use crate::commands::train::TrainArgs;

pub mod train;

/// Subcommands for bytemill-cli
#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Train a pair-merge vocabulary over a byte corpus.
    Train(TrainArgs),
}

impl Commands {
    /// Run the subcommand.
    pub fn run(&self) -> Result<(), Box<dyn std::error::Error>> {
        match self {
            Commands::Train(cmd) => cmd.run(),
        }
    }
}
