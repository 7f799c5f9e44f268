//! Domain logic for the acme.sh operator
//!
//! - [`server`]: resolve ACME server keywords and validate directory URLs
//! - [`pem`]: split PEM bundles written by acme.sh into certificates
//! - [`relation`]: JSON payload published to related units
//! - [`config`]: operator options and the unit status they produce

pub mod account;
pub mod config;
pub mod error;
pub mod pem;
pub mod relation;
pub mod server;
pub mod validation;

pub use account::account_info_path;
pub use crate::config::{OperatorConfig, UnitStatus};
pub use error::{CoreError, Result};
pub use pem::{CertificateChain, PemCertificate, split};
pub use relation::{CertificateCreatedResponse, UnitForCertificateResponse};
pub use server::{AcmeDirectoryUrl, resolve};
pub use validation::ValidateConfig;
