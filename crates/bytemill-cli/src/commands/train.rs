use std::io::Write;

use bytemill::{PairMergeTrainer, PairMergeTrainerOptions};

use crate::{logging::LogArgs, output::OutputArgs};

/// Args for the train command.
#[derive(clap::Args, Debug)]
pub struct TrainArgs {
    /// Input corpus file.
    file: String,

    #[clap(flatten)]
    pub logging: LogArgs,

    /// Total vocab size, the byte alphabet included.
    #[arg(long, default_value = "512")]
    vocab_size: usize,

    /// Skip-field width of the working sequence (1..=16).
    #[arg(long, default_value = "8")]
    skip_bits: u32,

    /// First token id issued for a merge.
    #[arg(long, default_value = "256")]
    first_emit_id: usize,

    #[command(flatten)]
    output: OutputArgs,
}

impl TrainArgs {
    /// Run the train command.
    pub fn run(&self) -> Result<(), Box<dyn std::error::Error>> {
        self.logging.setup_logging()?;

        log::info!("Reading corpus: {}", self.file);
        let bytes = std::fs::read(&self.file)?;
        log::info!("Corpus: {} bytes", bytes.len());

        let tokens: Vec<u32> = bytes.iter().map(|&b| b as u32).collect();
        drop(bytes);

        let options = PairMergeTrainerOptions::new(self.vocab_size)
            .with_first_emit_id(self.first_emit_id)
            .with_skip_bits(self.skip_bits);

        let trainer: PairMergeTrainer<u32, u64> = options.init(&tokens)?;
        let results = trainer.train()?;

        log::info!(
            "Learned {} merges; encoded corpus is {} tokens",
            results.merges.len(),
            results.tokens.len(),
        );

        let mut writer = self.output.open_writer()?;
        for &((left, right), token) in &results.merges {
            writeln!(writer, "{left} {right} -> {token}")?;
        }
        writer.flush()?;

        Ok(())
    }
}
