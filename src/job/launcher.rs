//! Fire-and-forget job launchers
//!
//! Launching returns as soon as the job has started. No handle, status or completion
//! signal comes back; the job's log file is the only record of what happened.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::Arc;
use std::thread;

use crate::error::{Result, job};
use crate::host::HostPanel;

use super::{JobLog, JobSpec, PASSWORD_ENV, pipeline};

pub trait JobLauncher: Send + Sync {
    /// Start `spec` detached, with its output going to `log_path`
    fn launch(&self, spec: JobSpec, log_path: &Path) -> Result<()>;
}

/// Runs each job in a detached child process (`<program> [args] run-job <fields>`).
///
/// The password slot carries the hand-off marker and the real password travels in
/// [`PASSWORD_ENV`], so it does not show up in process listings. The child's stdout and
/// stderr are the log file, its stdin is closed, and on Unix it gets its own process
/// group so it outlives the caller's terminal session.
#[derive(Debug, Clone)]
pub struct ProcessLauncher {
    program: PathBuf,
    args: Vec<OsString>,
}

impl ProcessLauncher {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Re-run the current executable
    pub fn current_exe() -> Result<Self> {
        let program = std::env::current_exe()
            .map_err(|e| job::launch_failed(format!("cannot locate executable: {e}")))?;
        Ok(Self::new(program))
    }

    /// Arguments placed before `run-job`, e.g. global options
    #[must_use]
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    fn command(&self, spec: &JobSpec, log: &JobLog) -> Result<Command> {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .arg("run-job")
            .args(spec.to_fields())
            .env(PASSWORD_ENV, spec.credential().expose())
            .stdin(Stdio::null())
            .stdout(log.stdio()?)
            .stderr(log.stdio()?);

        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            cmd.process_group(0);
        }

        Ok(cmd)
    }
}

impl ProcessLauncher {
    /// Spawn the job process and return its pid.
    ///
    /// A detached thread waits on the child so a long-running caller does not collect
    /// zombies; nothing else observes the exit status.
    fn spawn(&self, spec: &JobSpec, log_path: &Path) -> Result<u32> {
        let log = JobLog::open(log_path)
            .map_err(|e| job::launch_failed(format!("cannot open {}: {e}", log_path.display())))?;

        let mut child = self
            .command(spec, &log)?
            .spawn()
            .map_err(|e| job::launch_failed(format!("{}: {e}", self.program.display())))?;
        let pid = child.id();

        let reaper = thread::Builder::new()
            .name(format!("sitestager-reap-{pid}"))
            .spawn(move || {
                if let Ok(status) = child.wait() {
                    tracing::debug!(pid, %status, "staging job process exited");
                }
            });
        if let Err(e) = reaper {
            tracing::warn!(pid, error = %e, "could not start reaper thread");
        }

        Ok(pid)
    }
}

impl JobLauncher for ProcessLauncher {
    fn launch(&self, spec: JobSpec, log_path: &Path) -> Result<()> {
        let pid = self.spawn(&spec, log_path)?;
        tracing::info!(
            pid,
            log = %log_path.display(),
            staging = %spec.request().staging_domain(),
            "staging job started"
        );
        Ok(())
    }
}

/// Runs each job on a detached thread of the current process.
///
/// Meant for long-running hosts that embed the provisioner; the job dies with the
/// process, so short-lived callers should use [`ProcessLauncher`].
#[derive(Clone)]
pub struct ThreadLauncher {
    host: Arc<dyn HostPanel>,
}

impl ThreadLauncher {
    pub fn new(host: Arc<dyn HostPanel>) -> Self {
        Self { host }
    }
}

impl JobLauncher for ThreadLauncher {
    fn launch(&self, spec: JobSpec, log_path: &Path) -> Result<()> {
        let log = JobLog::open(log_path)
            .map_err(|e| job::launch_failed(format!("cannot open {}: {e}", log_path.display())))?;
        let host = Arc::clone(&self.host);

        let name = format!("sitestager-{}", spec.request().staging_domain());
        thread::Builder::new()
            .name(name)
            .spawn(move || {
                let outcome = pipeline::run(&spec, host.as_ref(), &log);
                tracing::debug!(state = ?outcome.state, "job thread finished");
            })
            .map_err(|e| job::launch_failed(e.to_string()))?;

        Ok(())
    }
}
