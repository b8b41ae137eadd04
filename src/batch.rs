use std::env;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::Error;
use crate::stripper::{strip_background, StripSummary};

pub const DEFAULT_MASCOT_FILES: [&str; 6] = [
    "zeni-mascot.png",
    "zeni-happy.png",
    "zeni-thinking.png",
    "zeni-worried.png",
    "zeni-waving.png",
    "zeni-icon.png",
];

const KEPT_ORIGINAL_SUFFIX: &str = "-transparent";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputMode {
    #[default]
    InPlace,
    /// Writes `<stem>-transparent.png` next to the input.
    Suffixed,
}

impl OutputMode {
    pub fn output_path_for(&self, input: &Path) -> PathBuf {
        match self {
            Self::InPlace => input.to_path_buf(),
            Self::Suffixed => {
                let stem = input
                    .file_stem()
                    .map(|stem| stem.to_string_lossy().into_owned())
                    .unwrap_or_default();
                input.with_file_name(format!("{}{}.png", stem, KEPT_ORIGINAL_SUFFIX))
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StripJob {
    pub input: PathBuf,
    pub output: PathBuf,
}

impl StripJob {
    fn input_name(&self) -> String {
        file_name_of(&self.input)
    }

    fn output_name(&self) -> String {
        file_name_of(&self.output)
    }
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .unwrap_or(path.as_os_str())
        .to_string_lossy()
        .into_owned()
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BatchConfig {
    pub jobs: Vec<StripJob>,
    pub threshold: u8,
}

impl BatchConfig {
    pub fn new<I, S>(directory: &Path, file_names: I, threshold: u8, mode: OutputMode) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<Path>,
    {
        let directory = absolute_directory(directory);
        let jobs = file_names
            .into_iter()
            .map(|file_name| {
                let input = directory.join(file_name);
                let output = mode.output_path_for(&input);
                StripJob { input, output }
            })
            .collect();
        Self { jobs, threshold }
    }

    pub fn mascot_set(directory: &Path, threshold: u8, mode: OutputMode) -> Self {
        Self::new(directory, DEFAULT_MASCOT_FILES, threshold, mode)
    }
}

fn absolute_directory(directory: &Path) -> PathBuf {
    if directory.is_absolute() {
        return directory.to_path_buf();
    }
    match env::current_dir() {
        Ok(working_directory) => working_directory.join(directory),
        Err(_) => directory.to_path_buf(),
    }
}

/// Directory holding the running executable, where the assets are expected.
pub fn default_asset_directory() -> crate::Result<PathBuf> {
    let executable = env::current_exe().map_err(Error::UnableToResolveAssetDirectory)?;
    executable.parent().map(Path::to_path_buf).ok_or_else(|| {
        Error::UnableToResolveAssetDirectory(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "executable path has no parent directory",
        ))
    })
}

#[derive(Debug)]
pub enum FileOutcome {
    Processed(StripSummary),
    Skipped,
    Failed(Error),
}

#[derive(Debug)]
pub struct BatchReport {
    outcomes: Vec<(PathBuf, FileOutcome)>,
}

impl BatchReport {
    pub fn outcomes(&self) -> &[(PathBuf, FileOutcome)] {
        &self.outcomes
    }

    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    pub fn processed(&self) -> usize {
        self.count(|outcome| matches!(outcome, FileOutcome::Processed(_)))
    }

    pub fn skipped(&self) -> usize {
        self.count(|outcome| matches!(outcome, FileOutcome::Skipped))
    }

    pub fn failed(&self) -> usize {
        self.count(|outcome| matches!(outcome, FileOutcome::Failed(_)))
    }

    fn count(&self, predicate: impl Fn(&FileOutcome) -> bool) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, outcome)| predicate(outcome))
            .count()
    }
}

/// Processes every job in order, writing one status line per file and a
/// closing summary to `status`. Missing inputs and per-file failures are
/// recorded in the report; only a failing `status` sink aborts the run.
pub fn run_batch<W: Write>(config: &BatchConfig, status: &mut W) -> crate::Result<BatchReport> {
    let mut outcomes = Vec::with_capacity(config.jobs.len());
    for job in &config.jobs {
        let outcome = process_job(job, config.threshold);
        write_status_line(status, job, &outcome)?;
        outcomes.push((job.input.clone(), outcome));
    }
    let report = BatchReport { outcomes };
    write_summary(status, &report)?;
    Ok(report)
}

fn process_job(job: &StripJob, threshold: u8) -> FileOutcome {
    if !job.input.exists() {
        log::warn!("{}", Error::InputFileNotFound(job.input.display().to_string()));
        return FileOutcome::Skipped;
    }
    match strip_background(&job.input, &job.output, threshold) {
        Ok(summary) => {
            log::info!(
                "Stripped {} ({}x{}) into {}",
                job.input.display(),
                summary.width,
                summary.height,
                job.output.display()
            );
            FileOutcome::Processed(summary)
        }
        Err(e) => {
            log::warn!("{}", e);
            FileOutcome::Failed(e)
        }
    }
}

fn write_status_line<W: Write>(
    status: &mut W,
    job: &StripJob,
    outcome: &FileOutcome,
) -> crate::Result<()> {
    let name = job.input_name();
    match outcome {
        FileOutcome::Processed(_) => writeln!(status, "[ok] {}", job.output_name()),
        FileOutcome::Skipped => writeln!(status, "[skip] File not found: {}", name),
        FileOutcome::Failed(error) => {
            writeln!(status, "[fail] Error processing {}: {}", name, error)
        }
    }
    .map_err(Error::UnableToWriteStatus)
}

fn write_summary<W: Write>(status: &mut W, report: &BatchReport) -> crate::Result<()> {
    writeln!(
        status,
        "\nDone! {}/{} images processed.",
        report.processed(),
        report.total()
    )
    .map_err(Error::UnableToWriteStatus)?;
    writeln!(
        status,
        "Hint: if some images still show a background, adjust --threshold."
    )
    .map_err(Error::UnableToWriteStatus)
}
