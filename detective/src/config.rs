//! Command-line and environment configuration.

use detective_core::{CaseError, CaseFile};
use std::path::PathBuf;
use thiserror::Error;

/// Environment variable naming a case file to load.
pub const CASE_ENV_VAR: &str = "DETECTIVE_CASE";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("--case precisa de um caminho")]
    MissingCasePath,

    #[error("Argumento desconhecido: {0}")]
    UnknownArgument(String),
}

/// Settings for one console run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConsoleConfig {
    /// Case file to load; the built-in mansion when `None`.
    pub case_path: Option<PathBuf>,
    /// Log at debug level instead of warnings only.
    pub verbose: bool,
    pub show_help: bool,
}

impl ConsoleConfig {
    /// Parse `args` (program name first), falling back to `DETECTIVE_CASE`.
    pub fn from_args(args: &[String]) -> Result<Self, ConfigError> {
        Self::parse(args, std::env::var(CASE_ENV_VAR).ok())
    }

    fn parse(args: &[String], env_case: Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let mut iter = args.iter().skip(1);
        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--case" | "-c" => {
                    let path = iter.next().ok_or(ConfigError::MissingCasePath)?;
                    config.case_path = Some(PathBuf::from(path));
                }
                "--verbose" | "-v" => config.verbose = true,
                "--help" | "-h" => config.show_help = true,
                other => return Err(ConfigError::UnknownArgument(other.to_string())),
            }
        }
        if config.case_path.is_none() {
            config.case_path = env_case.filter(|p| !p.is_empty()).map(PathBuf::from);
        }
        Ok(config)
    }

    pub fn load_case(&self) -> Result<CaseFile, CaseError> {
        match &self.case_path {
            Some(path) => CaseFile::load(path),
            None => Ok(CaseFile::mansion_default()),
        }
    }
}
