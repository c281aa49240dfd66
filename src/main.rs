use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use prepare_openapi::logging::{init_logging, LogLevel};

#[derive(Parser, Debug)]
#[command(
    name = "prepare-openapi",
    version,
    about = "Merge OpenAPI schema fragments into a single document"
)]
struct Cli {
    /// Path to the configuration file (JSON or YAML).
    config: PathBuf,

    /// Assemble and validate without writing the output file.
    #[arg(long)]
    check: bool,

    /// Minimum log level (stderr).
    #[arg(long, value_name = "LEVEL", default_value = "info")]
    log_level: LogLevel,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.log_level);

    match prepare_openapi::run(&cli.config, cli.check) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_config_path() {
        let cli = Cli::try_parse_from(["prepare-openapi", "prepare.yml"])
            .expect("config path should parse");

        assert_eq!(cli.config, PathBuf::from("prepare.yml"));
        assert!(!cli.check);
    }

    #[test]
    fn parses_check_flag() {
        let cli = Cli::try_parse_from(["prepare-openapi", "prepare.yml", "--check"])
            .expect("check flag should parse");

        assert!(cli.check);
    }

    #[test]
    fn rejects_missing_config_path() {
        let err = Cli::try_parse_from(["prepare-openapi"]).expect_err("missing arg should fail");
        assert_eq!(
            err.kind(),
            clap::error::ErrorKind::MissingRequiredArgument
        );
    }

    #[test]
    fn rejects_unknown_log_level() {
        let err = Cli::try_parse_from(["prepare-openapi", "prepare.yml", "--log-level", "loud"])
            .expect_err("unknown level should fail");
        assert_eq!(err.kind(), clap::error::ErrorKind::InvalidValue);
    }
}
