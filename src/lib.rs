use std::io::Write;
use std::path::PathBuf;

use batch::{default_asset_directory, run_batch, BatchConfig, BatchReport, OutputMode};
pub use cli::CLIParser;
pub use error::Error;

pub mod batch;
mod cli;
mod error;
mod logger;
pub mod stripper;

pub type Result<T> = std::result::Result<T, error::Error>;

pub struct Arguments {
    files: Vec<PathBuf>,
    directory: Option<PathBuf>,
    threshold: u8,
    output_mode: OutputMode,
}

impl TryFrom<&Arguments> for BatchConfig {
    type Error = Error;

    fn try_from(arguments: &Arguments) -> Result<Self> {
        let directory = match &arguments.directory {
            Some(directory) => directory.clone(),
            None => default_asset_directory()?,
        };
        let config = if arguments.files.is_empty() {
            BatchConfig::mascot_set(&directory, arguments.threshold, arguments.output_mode)
        } else {
            BatchConfig::new(
                &directory,
                &arguments.files,
                arguments.threshold,
                arguments.output_mode,
            )
        };
        Ok(config)
    }
}

pub fn strip_backgrounds<W: Write>(arguments: &Arguments, status: &mut W) -> Result<BatchReport> {
    let config = BatchConfig::try_from(arguments)?;
    writeln!(status, "Removing white background from mascot images...\n")
        .map_err(Error::UnableToWriteStatus)?;
    log::info!(
        "Stripping {} file(s) with threshold {}",
        config.jobs.len(),
        config.threshold
    );
    run_batch(&config, status)
}
