//! Control panel plugin surface
//!
//! The panel hands every plugin action to each installed plugin in turn. A plugin
//! claims the actions it knows and passes on the rest. [`StagingProvisioner`] claims
//! `sitestager_create`: it validates the request, generates the credential and
//! launches the job, returning as soon as the job has started.

use std::path::{Path, PathBuf};

use crate::credential::StagingCredential;
use crate::error::Result;
use crate::job::{JobLauncher, JobSpec, log_path};
use crate::request::{RawRequest, validate};

/// Action name handled by [`StagingProvisioner`]
pub const CREATE_ACTION: &str = "sitestager_create";

/// What a submitted job can be found by; not a handle to the running job
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub staging_domain: String,
    pub log_path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    Handled(Submission),
    Ignored,
}

pub trait PanelPlugin {
    /// Offer a panel action to the plugin
    fn handle_invocation(&self, action: &str, args: &[String]) -> Result<Invocation>;
}

pub struct StagingProvisioner<L> {
    launcher: L,
    log_dir: PathBuf,
}

impl<L: JobLauncher> StagingProvisioner<L> {
    pub fn new(launcher: L, log_dir: impl Into<PathBuf>) -> Self {
        Self {
            launcher,
            log_dir: log_dir.into(),
        }
    }

    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }

    /// Validate `raw` and start its job.
    ///
    /// Validation errors come back before anything is created, including the log file.
    /// Once this returns `Ok`, the job's outcome is only visible in its log.
    pub fn submit(&self, raw: &RawRequest) -> Result<Submission> {
        let request = validate(raw)?;
        let credential = StagingCredential::generate()?;

        let submission = Submission {
            staging_domain: request.staging_domain(),
            log_path: log_path(
                &self.log_dir,
                request.staging_prefix(),
                request.source_domain(),
            ),
        };

        self.launcher
            .launch(JobSpec::new(request, credential), &submission.log_path)?;
        Ok(submission)
    }
}

impl<L: JobLauncher> PanelPlugin for StagingProvisioner<L> {
    fn handle_invocation(&self, action: &str, args: &[String]) -> Result<Invocation> {
        if action != CREATE_ACTION {
            tracing::debug!(action, "ignoring plugin action");
            return Ok(Invocation::Ignored);
        }
        let raw = RawRequest::from_fields(args)?;
        self.submit(&raw).map(Invocation::Handled)
    }
}
