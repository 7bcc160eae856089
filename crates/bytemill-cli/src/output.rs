use std::{
    fs::File,
    io::{BufWriter, Write},
};

/// Output argument group.
#[derive(clap::Args, Debug)]
pub struct OutputArgs {
    /// Optional output file; "-" or omitted means stdout.
    #[clap(long, default_value = None)]
    pub output: Option<String>,
}

impl OutputArgs {
    /// Open a buffered writer for the output.
    pub fn open_writer(&self) -> Result<Box<dyn Write>, Box<dyn std::error::Error>> {
        Ok(match self.output.as_deref() {
            Some(path) if path != "-" => Box::new(BufWriter::new(File::create(path)?)),
            _ => Box::new(BufWriter::new(std::io::stdout().lock())),
        })
    }
}
