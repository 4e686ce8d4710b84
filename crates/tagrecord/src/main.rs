mod cmd;
mod exit;
mod logging;
mod output;

use clap::Parser;
use tagrecord_codec::{RecordConfig, DEFAULT_MAX_RECORD_SIZE};

use crate::cmd::Command;
use crate::logging::{init_logging, LogFormat, LogLevel};
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "tagrecord", version, about = "Tagged record save-file tool")]
struct Cli {
    /// Output format.
    #[arg(long, value_name = "FORMAT", global = true)]
    format: Option<OutputFormat>,

    /// Log output format (stderr).
    #[arg(long, value_name = "FORMAT", default_value = "text", global = true)]
    log_format: LogFormat,

    /// Minimum log level (stderr).
    #[arg(
        long,
        value_name = "LEVEL",
        default_value = "info",
        env = "TAGRECORD_LOG_LEVEL",
        global = true
    )]
    log_level: LogLevel,

    /// Largest record, in bytes, that will be read or written.
    #[arg(
        long,
        value_name = "BYTES",
        default_value_t = DEFAULT_MAX_RECORD_SIZE,
        env = "TAGRECORD_MAX_RECORD_SIZE",
        global = true
    )]
    max_record_size: usize,

    #[command(subcommand)]
    command: Command,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level);

    let format = cli.format.unwrap_or_else(OutputFormat::default_for_stdout);
    let config = RecordConfig {
        max_record_size: cli.max_record_size,
        ..RecordConfig::default()
    };
    let result = cmd::run(cli.command, format, config);

    match result {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(err.code);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_dump_subcommand() {
        let cli = Cli::try_parse_from(["tagrecord", "dump", "world.dat", "--partial"])
            .expect("dump args should parse");

        match cli.command {
            Command::Dump(args) => {
                assert!(args.partial);
                assert_eq!(args.decode_mode(), tagrecord_codec::DecodeMode::Partial);
            }
            other => panic!("unexpected command: {other:?}"),
        }
        assert_eq!(cli.max_record_size, DEFAULT_MAX_RECORD_SIZE);
    }

    #[test]
    fn parses_build_subcommand() {
        let cli = Cli::try_parse_from(["tagrecord", "build", "in.json", "-o", "out.dat"])
            .expect("build args should parse");
        assert!(matches!(cli.command, Command::Build(_)));
    }

    #[test]
    fn build_requires_output() {
        let err = Cli::try_parse_from(["tagrecord", "build", "in.json"])
            .expect_err("missing output should fail");
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn parses_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "tagrecord",
            "check",
            "world.dat",
            "--strict",
            "--format",
            "json",
            "--log-level",
            "error",
            "--max-record-size",
            "4096",
        ])
        .expect("check args should parse");

        assert!(matches!(cli.format, Some(OutputFormat::Json)));
        assert_eq!(cli.log_level, LogLevel::Error);
        assert_eq!(cli.max_record_size, 4096);
    }
}
