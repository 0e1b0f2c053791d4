//! Error types and handling for sitestager
//!
//! Uses `thiserror` for error definitions and `miette` for pretty diagnostics.
//!
//! This module is organized into sub-modules by error domain:
//! - [`request`]: Request validation errors (the only errors a caller sees synchronously)
//! - [`job`]: Pipeline step failures recorded in the job log
//! - [`host`]: Host command failures
//! - [`settings`]: Settings file errors

pub mod host;
pub mod job;
pub mod request;
pub mod settings;

use miette::Diagnostic;
use thiserror::Error;

/// Main error type for sitestager operations
#[derive(Error, Diagnostic, Debug)]
pub enum StagerError {
    // Request errors
    #[error("Invalid provisioning request: {message}")]
    #[diagnostic(
        code(sitestager::request::invalid),
        help("Nothing was created. Fix the request and submit it again")
    )]
    Validation { message: String },

    #[error("Failed to generate staging credential: {reason}")]
    #[diagnostic(code(sitestager::credential::generation_failed))]
    CredentialGeneration { reason: String },

    // Job step errors
    #[error("Failed to clone domain '{domain}' to '{staging_domain}': {reason}")]
    #[diagnostic(code(sitestager::job::domain_clone_failed))]
    DomainClone {
        domain: String,
        staging_domain: String,
        reason: String,
    },

    #[error("Failed to clone database '{database}' to '{staging_database}': {reason}")]
    #[diagnostic(
        code(sitestager::job::database_clone_failed),
        help("The staging domain was already created and has been left in place")
    )]
    DatabaseClone {
        database: String,
        staging_database: String,
        reason: String,
    },

    #[error("Failed to rewrite configuration file '{path}': {reason}")]
    #[diagnostic(
        code(sitestager::job::config_rewrite_failed),
        help(
            "The staging domain and database exist; update the application configuration by hand"
        )
    )]
    ConfigRewrite { path: String, reason: String },

    #[error("Failed to launch background job: {reason}")]
    #[diagnostic(code(sitestager::job::launch_failed))]
    JobLaunch { reason: String },

    // Host errors
    #[error("Host command '{command}' failed: {reason}")]
    #[diagnostic(code(sitestager::host::command_failed))]
    HostCommandFailed { command: String, reason: String },

    #[error("Host command template '{name}' is empty")]
    #[diagnostic(
        code(sitestager::host::empty_template),
        help("Every command template needs at least a program name")
    )]
    EmptyCommandTemplate { name: String },

    // Settings errors
    #[error("Failed to read settings file {path}: {reason}")]
    #[diagnostic(code(sitestager::settings::read_failed))]
    SettingsReadFailed { path: String, reason: String },

    #[error("Failed to parse settings file {path}: {reason}")]
    #[diagnostic(
        code(sitestager::settings::parse_failed),
        help("Check the YAML syntax and the field names of the settings file")
    )]
    SettingsParseFailed { path: String, reason: String },

    // CLI errors
    #[error("Unknown shell: {shell}")]
    #[diagnostic(
        code(sitestager::cli::unknown_shell),
        help("Supported shells: bash, elvish, fish, powershell, zsh")
    )]
    UnknownShell { shell: String },

    // IO errors
    #[error("IO error: {message}")]
    #[diagnostic(code(sitestager::io_error))]
    IoError { message: String },
}

impl From<std::io::Error> for StagerError {
    fn from(err: std::io::Error) -> Self {
        StagerError::IoError {
            message: err.to_string(),
        }
    }
}

impl From<serde_yaml::Error> for StagerError {
    fn from(err: serde_yaml::Error) -> Self {
        StagerError::SettingsParseFailed {
            path: "unknown".to_string(),
            reason: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for StagerError {
    fn from(err: serde_json::Error) -> Self {
        StagerError::HostCommandFailed {
            command: "unknown".to_string(),
            reason: format!("unexpected output: {err}"),
        }
    }
}

/// Result type alias using miette for error handling
pub type Result<T> = miette::Result<T, StagerError>;
