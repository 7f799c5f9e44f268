//! CLI commands

use acmesh_core::{
    CertificateChain, CertificateCreatedResponse, CoreError, UnitForCertificateResponse,
    UnitStatus, resolve, split,
};
use anyhow::{Context, Result};
use clap::Subcommand;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::config;

/// Exit status for configuration the operator has to fix
pub const CONFIGURATION_EXIT_CODE: u8 = 2;

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve an ACME server keyword or validate a directory URL
    ResolveServer {
        /// Keyword such as "letsencrypt" or an https URL ending in /dir
        identifier: String,
    },

    /// Split a PEM bundle into individual certificates, printed as JSON
    SplitChain {
        /// Bundle file, or "-" for stdin
        #[arg(default_value = "-")]
        input: PathBuf,
    },

    /// Validate operator configuration and print the resulting status
    CheckConfig,

    /// Print the acme.sh account-info path for the configured server
    AccountPath,

    /// Build the relation payload for an issued certificate
    Payload {
        /// Full chain PEM file written by acme.sh
        #[arg(long)]
        chain: PathBuf,

        /// Certificate signing request file
        #[arg(long)]
        csr: PathBuf,

        /// Name of the issuing unit
        #[arg(long, env = "JUJU_UNIT_NAME")]
        unit_name: String,

        /// Ingress address of the issuing unit
        #[arg(long)]
        ingress_address: String,
    },
}

/// What a command wants the process to report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Blocked,
}

impl Outcome {
    pub const fn exit_code(self) -> u8 {
        match self {
            Self::Success => 0,
            Self::Blocked => 1,
        }
    }
}

/// Text a command prints on stdout and the outcome it reports
#[derive(Debug)]
pub struct CommandOutput {
    pub stdout: String,
    pub outcome: Outcome,
}

impl CommandOutput {
    fn success(stdout: impl Into<String>) -> Self {
        Self {
            stdout: stdout.into(),
            outcome: Outcome::Success,
        }
    }
}

impl Commands {
    pub fn execute(self, config_path: Option<&Path>) -> Result<CommandOutput> {
        match self {
            Self::ResolveServer { identifier } => {
                let server = resolve(&identifier)?;
                Ok(CommandOutput::success(server.into_string()))
            }
            Self::SplitChain { input } => {
                let bundle = read_input(&input)?;
                let certificates = split(&bundle)?;
                info!("Found {} certificate(s)", certificates.len());
                Ok(CommandOutput::success(serde_json::to_string_pretty(
                    &certificates,
                )?))
            }
            Self::CheckConfig => {
                let status = config::load_operator_config(config_path)?.status();
                let outcome = match status {
                    UnitStatus::Active => Outcome::Success,
                    UnitStatus::Blocked(_) => Outcome::Blocked,
                };
                Ok(CommandOutput {
                    stdout: status.to_string(),
                    outcome,
                })
            }
            Self::AccountPath => {
                let path = config::load_operator_config(config_path)?.account_info_path()?;
                Ok(CommandOutput::success(path.display().to_string()))
            }
            Self::Payload {
                chain,
                csr,
                unit_name,
                ingress_address,
            } => {
                let chain = CertificateChain::from_file(&chain)
                    .with_context(|| format!("Failed to load chain from {}", chain.display()))?;
                let csr = read_input(&csr)?;
                let issued_by = UnitForCertificateResponse {
                    name: unit_name,
                    ingress_address,
                };
                let response = CertificateCreatedResponse::from_chain(&chain, csr, issued_by);
                Ok(CommandOutput::success(response.to_json()?))
            }
        }
    }
}

/// Exit status for a failed command
///
/// Configuration errors anywhere in the chain exit with
/// [`CONFIGURATION_EXIT_CODE`], everything else with 1.
pub fn error_exit_code(error: &anyhow::Error) -> u8 {
    let configuration = error
        .chain()
        .filter_map(|cause| cause.downcast_ref::<CoreError>())
        .any(CoreError::is_configuration_error);

    if configuration {
        CONFIGURATION_EXIT_CODE
    } else {
        1
    }
}

fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut content = String::new();
        std::io::stdin()
            .read_to_string(&mut content)
            .context("Failed to read stdin")?;
        return Ok(content);
    }
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}
