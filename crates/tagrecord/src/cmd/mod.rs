use clap::{Args, Subcommand};
use std::path::PathBuf;

use tagrecord_codec::{DecodeMode, RecordConfig};

use crate::exit::CliResult;
use crate::output::OutputFormat;

pub mod build;
pub mod check;
pub mod dump;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Decode a record file and print its fields.
    ///
    /// In JSON output, NaN and infinite doubles are printed as the strings
    /// "NaN", "inf" and "-inf".
    Dump(DumpArgs),
    /// Validate a record file and summarize its contents.
    Check(CheckArgs),
    /// Encode a record file from a JSON description.
    Build(BuildArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat, config: RecordConfig) -> CliResult<i32> {
    match command {
        Command::Dump(args) => dump::run(args, format, config),
        Command::Check(args) => check::run(args, format, config),
        Command::Build(args) => build::run(args, config),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct DumpArgs {
    /// Record file to read.
    pub path: PathBuf,
    /// Print the fields decoded before a format error instead of nothing.
    #[arg(long)]
    pub partial: bool,
}

impl DumpArgs {
    pub fn decode_mode(&self) -> DecodeMode {
        if self.partial {
            DecodeMode::Partial
        } else {
            DecodeMode::Atomic
        }
    }
}

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Record file to validate.
    pub path: PathBuf,
    /// Fail if bytes follow the record terminator.
    #[arg(long)]
    pub strict: bool,
}

#[derive(Args, Debug)]
pub struct BuildArgs {
    /// JSON description of the record (`-` for stdin).
    pub input: PathBuf,
    /// Record file to write.
    #[arg(long, short = 'o')]
    pub output: PathBuf,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build information.
    #[arg(long)]
    pub extended: bool,
}
