//! Command implementations
//!
//! Each submodule implements one CLI command:
//! - create: Validate a request and launch its staging job
//! - invoke: Dispatch a control panel plugin action
//! - run_job: Run a staging job in the foreground (the launched process)
//! - databases: List the databases of a user
//! - log_path: Print where a job writes its log
//! - completions: Generate shell completions

use std::path::PathBuf;

use console::Style;

use crate::error::Result;
use crate::job::ProcessLauncher;
use crate::plugin::{StagingProvisioner, Submission};
use crate::settings::Settings;

pub mod completions;
pub mod create;
pub mod databases;
pub mod invoke;
pub mod log_path;
pub mod run_job;

/// Options shared by every command
#[derive(Debug, Clone, Default)]
pub struct GlobalOptions {
    pub config: Option<PathBuf>,
    pub verbose: bool,
}

impl GlobalOptions {
    pub fn settings(&self) -> Result<Settings> {
        Settings::load(self.config.as_deref())
    }

    /// Global options to repeat on the launched job's command line
    fn job_args(&self) -> Vec<std::ffi::OsString> {
        let mut args = Vec::new();
        if let Some(config) = &self.config {
            args.push("--config".into());
            args.push(config.clone().into_os_string());
        }
        if self.verbose {
            args.push("--verbose".into());
        }
        args
    }

    /// Provisioner that launches jobs as detached copies of this executable
    fn provisioner(&self) -> Result<StagingProvisioner<ProcessLauncher>> {
        let settings = self.settings()?;
        let launcher = ProcessLauncher::current_exe()?.with_args(self.job_args());
        Ok(StagingProvisioner::new(launcher, settings.log_dir))
    }
}

fn print_submission(submission: &Submission) {
    println!(
        "{} {}",
        Style::new().bold().green().apply_to("Staging job started for"),
        Style::new().bold().yellow().apply_to(&submission.staging_domain)
    );
    println!(
        "  {} {}",
        Style::new().bold().apply_to("Log:"),
        submission.log_path.display()
    );
}
