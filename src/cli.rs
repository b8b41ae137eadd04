use crate::batch::OutputMode;
use crate::stripper::DEFAULT_THRESHOLD;
use crate::Arguments;
use clap::{
    arg, crate_authors, crate_description, crate_name, crate_version, value_parser, Arg,
    ArgAction, ArgMatches, Command,
};
use std::ffi::OsString;
use std::path::PathBuf;

pub struct CLIParser {
    command: Command,
}

impl CLIParser {
    pub fn new() -> Self {
        let command = Self::create_base_command();
        let command = Self::register_arguments(command);
        CLIParser { command }
    }

    pub fn parse<I, T>(&mut self, itr: I) -> Arguments
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = self
            .command
            .try_get_matches_from_mut(itr)
            .unwrap_or_else(|e| e.exit());
        Self::extract_arguments(&matches)
    }

    fn register_arguments(command: Command) -> Command {
        let command = Self::register_files_argument(command);
        let command = Self::register_directory_argument(command);
        let command = Self::register_threshold_argument(command);
        Self::register_keep_originals_argument(command)
    }

    fn register_files_argument(command: Command) -> Command {
        command.arg(Self::create_files_argument())
    }

    fn register_directory_argument(command: Command) -> Command {
        command.arg(Self::create_directory_argument())
    }

    fn register_threshold_argument(command: Command) -> Command {
        command.arg(Self::create_threshold_argument())
    }

    fn register_keep_originals_argument(command: Command) -> Command {
        command.arg(Self::create_keep_originals_argument())
    }

    fn create_base_command() -> Command {
        Command::new(crate_name!())
            .version(crate_version!())
            .author(crate_authors!())
            .about(crate_description!())
    }

    fn create_files_argument() -> Arg {
        Arg::new("files")
            .help("PNG files to process, relative to the asset directory [default: the mascot set]")
            .value_parser(value_parser!(PathBuf))
            .num_args(0..)
            .required(false)
    }

    fn create_directory_argument() -> Arg {
        arg!(-d --directory <DIR> "Asset directory [default: directory of this executable]")
            .required(false)
            .value_parser(value_parser!(PathBuf))
    }

    fn create_threshold_argument() -> Arg {
        arg!(-t --threshold <THRESHOLD> "Channel value all of red, green and blue must exceed to be cleared")
            .default_value(DEFAULT_THRESHOLD.to_string())
            .value_parser(value_parser!(u8))
    }

    fn create_keep_originals_argument() -> Arg {
        arg!(keep_originals: -k --keep_originals "Write <name>-transparent.png instead of overwriting")
            .action(ArgAction::SetTrue)
    }

    fn extract_arguments(matches: &ArgMatches) -> Arguments {
        Arguments {
            files: Self::extract_files_argument(matches),
            directory: Self::extract_directory_argument(matches),
            threshold: Self::extract_threshold_argument(matches),
            output_mode: Self::extract_keep_originals_argument(matches),
        }
    }

    fn extract_files_argument(matches: &ArgMatches) -> Vec<PathBuf> {
        matches
            .get_many::<PathBuf>("files")
            .map(|files| files.cloned().collect())
            .unwrap_or_default()
    }

    fn extract_directory_argument(matches: &ArgMatches) -> Option<PathBuf> {
        matches.get_one::<PathBuf>("directory").cloned()
    }

    fn extract_threshold_argument(matches: &ArgMatches) -> u8 {
        matches
            .get_one::<u8>("threshold")
            .expect("Threshold must be provided, but was unset.")
            .to_owned()
    }

    fn extract_keep_originals_argument(matches: &ArgMatches) -> OutputMode {
        if matches.get_flag("keep_originals") {
            OutputMode::Suffixed
        } else {
            OutputMode::InPlace
        }
    }
}

impl Default for CLIParser {
    fn default() -> Self {
        Self::new()
    }
}
