//! acme.sh operator CLI

mod commands;
mod config;
mod logging;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use commands::Commands;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{Level, debug, error};

#[derive(Parser)]
#[command(name = "acmesh-operator")]
#[command(about = "Resolve ACME servers, split certificate chains and build relation payloads")]
#[command(version)]
struct Cli {
    /// Set logging level
    #[arg(short = 'l', long, global = true, default_value = "warn")]
    log_level: LogLevel,

    /// Also append logs to this file
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// Operator configuration file (defaults to the platform config directory)
    #[arg(short = 'c', long, global = true, env = "ACMESH_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Logging first so config loading is traced
    logging::init_logging(cli.log_level.into(), cli.log_file.as_deref())?;

    // Output goes to stdout, diagnostics to stderr
    match cli.command.execute(cli.config.as_deref()) {
        Ok(output) => {
            println!("{}", output.stdout);
            debug!("Command finished with {:?}", output.outcome);
            Ok(ExitCode::from(output.outcome.exit_code()))
        }
        Err(e) => {
            error!("Command failed: {e:#}");
            eprintln!("error: {e:#}");
            Ok(ExitCode::from(commands::error_exit_code(&e)))
        }
    }
}

#[derive(Clone, Debug, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for Level {
    fn from(log_level: LogLevel) -> Self {
        match log_level {
            LogLevel::Error => Self::ERROR,
            LogLevel::Warn => Self::WARN,
            LogLevel::Info => Self::INFO,
            LogLevel::Debug => Self::DEBUG,
            LogLevel::Trace => Self::TRACE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_payload_arguments() {
        let cli = Cli::try_parse_from([
            "acmesh-operator",
            "--log-level",
            "debug",
            "payload",
            "--chain",
            "fullchain.cer",
            "--csr",
            "request.csr",
            "--unit-name",
            "acmesh-operator/0",
            "--ingress-address",
            "10.0.0.7",
        ])
        .unwrap();

        assert_eq!(Level::from(cli.log_level), Level::DEBUG);
        match cli.command {
            Commands::Payload {
                chain, unit_name, ..
            } => {
                assert_eq!(chain, PathBuf::from("fullchain.cer"));
                assert_eq!(unit_name, "acmesh-operator/0");
            }
            _ => panic!("expected payload command"),
        }
    }

    #[test]
    fn test_split_chain_reads_stdin_by_default() {
        let cli = Cli::try_parse_from(["acmesh-operator", "split-chain"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::SplitChain { input } if input == PathBuf::from("-")
        ));
    }
}
