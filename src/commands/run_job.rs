//! Run-job command implementation
//!
//! This is the process started by the launcher. Its stdout and stderr already point at
//! the job log; the pipeline appends its step banners and host command output there too.

use crate::cli::RunJobArgs;
use crate::error::Result;
use crate::host::CommandHost;
use crate::job::{self, JobLog, JobSpec, PASSWORD_ENV};

use super::GlobalOptions;

/// Run the staging job described by `args`
pub fn run(options: &GlobalOptions, args: RunJobArgs) -> Result<()> {
    let handoff = std::env::var(PASSWORD_ENV).ok();
    let spec = JobSpec::from_fields(&args.fields, handoff)?;
    let settings = options.settings()?;

    let request = spec.request();
    let path = job::log_path(
        &settings.log_dir,
        request.staging_prefix(),
        request.source_domain(),
    );
    let log = JobLog::open(&path)?;
    let host = CommandHost::new(settings);

    let outcome = job::run(&spec, &host, &log);
    match outcome.error {
        Some(error) => Err(error),
        None => Ok(()),
    }
}
