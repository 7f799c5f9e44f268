//! Operator configuration and the unit status it reduces to

use crate::validation::{ValidateConfig, validators};
use crate::{AcmeDirectoryUrl, CoreError, Result, account_info_path, resolve};
use config::{Case, Config, ConfigError, Environment, File, Map};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Message shown when an email is required but missing
pub const EMPTY_EMAIL_MESSAGE: &str = "Email cannot be empty when use-email is true";

/// Environment variable prefix for configuration overrides
pub const ENV_PREFIX: &str = "ACMESH";

/// Configuration options of the acme.sh operator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct OperatorConfig {
    /// Contact email registered with the ACME account
    #[serde(default)]
    pub email: String,
    /// Whether the ACME account is registered with an email
    #[serde(default = "default_true")]
    pub use_email: bool,
    /// ACME server keyword or directory URL
    #[serde(default = "default_server")]
    pub server: String,
    /// Directory acme.sh is installed under
    #[serde(default = "default_install_dir")]
    pub install_dir: PathBuf,
}

fn default_true() -> bool {
    true
}

fn default_server() -> String {
    "letsencrypt".to_string()
}

fn default_install_dir() -> PathBuf {
    PathBuf::from("/root")
}

impl Default for OperatorConfig {
    fn default() -> Self {
        Self {
            email: String::new(),
            use_email: default_true(),
            server: default_server(),
            install_dir: default_install_dir(),
        }
    }
}

/// Workload status derived from configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "status", content = "message")]
pub enum UnitStatus {
    Active,
    Blocked(String),
}

impl UnitStatus {
    pub const fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }
}

impl fmt::Display for UnitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => f.write_str("active"),
            Self::Blocked(message) => write!(f, "blocked: {message}"),
        }
    }
}

impl ValidateConfig for OperatorConfig {
    fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.use_email {
            if self.email.trim().is_empty() {
                return Err(ConfigError::Message(EMPTY_EMAIL_MESSAGE.to_string()));
            }
            validators::validate_email(&self.email)?;
        }
        validators::validate_acme_server(&self.server)?;
        validators::validate_not_empty(&self.install_dir.to_string_lossy(), "install-dir")?;
        Ok(())
    }
}

impl OperatorConfig {
    /// Load configuration from an optional file, then `ACMESH_*` environment variables
    ///
    /// Environment variables override the file. `ACMESH_USE_EMAIL` sets
    /// `use-email`, `ACMESH_INSTALL_DIR` sets `install-dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or values cannot be parsed.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_env(path, None)
    }

    /// Load configuration with an explicit set of environment variables
    ///
    /// `None` reads the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or values cannot be parsed.
    pub fn load_with_env(path: Option<&Path>, env: Option<Map<String, String>>) -> Result<Self> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            debug!("Loading configuration from {}", path.display());
            builder = builder.add_source(File::from(path));
        }
        // Env keys arrive as `use_email`; options are spelled `use-email`
        let environment = Environment::with_prefix(ENV_PREFIX)
            .convert_case(Case::Kebab)
            .source(env);
        let settings = builder.add_source(environment).build()?;
        Ok(settings.try_deserialize()?)
    }

    /// Validate, reporting failures as [`CoreError::InvalidConfig`]
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidConfig`] with the message the unit would be
    /// blocked with.
    pub fn validated(&self) -> Result<()> {
        self.validate()
            .map_err(|e| CoreError::InvalidConfig(config_error_message(e)))
    }

    /// Reduce validation to the status the unit should report
    pub fn status(&self) -> UnitStatus {
        match self.validate() {
            Ok(()) => UnitStatus::Active,
            Err(e) => {
                let message = config_error_message(e);
                warn!("Configuration blocks the unit: {}", message);
                UnitStatus::Blocked(message)
            }
        }
    }

    /// Apply a single option change and report the resulting status
    ///
    /// A valid change replaces the configuration. An invalid one leaves it
    /// untouched and reports the blocked status.
    pub fn update(&mut self, option: &str, value: serde_json::Value) -> UnitStatus {
        match self.validate_update(option, &value) {
            Ok(updated) => {
                debug!("Applied configuration change to {}", option);
                *self = updated;
                UnitStatus::Active
            }
            Err(e) => {
                let message = config_error_message(e);
                warn!("Rejected change to {}: {}", option, message);
                UnitStatus::Blocked(message)
            }
        }
    }

    /// Canonical ACME directory URL of the configured server
    ///
    /// # Errors
    ///
    /// Returns [`crate::CoreError::InvalidServer`] if the server is invalid.
    pub fn resolved_server(&self) -> Result<AcmeDirectoryUrl> {
        resolve(&self.server)
    }

    /// Account-info path acme.sh uses for the configured server
    ///
    /// # Errors
    ///
    /// Returns [`crate::CoreError::InvalidServer`] if the server is invalid.
    pub fn account_info_path(&self) -> Result<PathBuf> {
        account_info_path(&self.install_dir, &self.resolved_server()?)
    }
}

fn config_error_message(error: ConfigError) -> String {
    match error {
        ConfigError::Message(message) => message,
        other => other.to_string(),
    }
}
