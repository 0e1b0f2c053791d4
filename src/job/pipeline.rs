//! Job pipeline
//!
//! ```text
//! Pending -> CloningDomain -> CloningDatabase -> RewritingConfig -> Done
//!                 |                 |                  |
//!                 +-----------------+------------------+--> Failed(step)
//! ```
//!
//! A failed step stops the pipeline. Steps that already completed are left in place.

use std::fmt;

use crate::clone::{clone_database, clone_domain};
use crate::credential::StagingCredential;
use crate::error::{Result, StagerError};
use crate::host::HostPanel;
use crate::naming::StagingDatabase;
use crate::request::ProvisioningRequest;
use crate::rewriter::{ConnectionValues, resolve_config_path, rewrite_file, rewriter_for};

use super::{JobLog, JobSpec};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    CloneDomain,
    CloneDatabase,
    RewriteConfig,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Step::CloneDomain => "clone domain",
            Step::CloneDatabase => "clone database",
            Step::RewriteConfig => "rewrite config",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    Pending,
    CloningDomain,
    CloningDatabase,
    RewritingConfig,
    Done,
    Failed(Step),
}

impl JobState {
    pub fn is_terminal(self) -> bool {
        matches!(self, JobState::Done | JobState::Failed(_))
    }
}

/// How a job ended
#[derive(Debug)]
pub struct JobOutcome {
    /// Final state, always terminal
    pub state: JobState,
    /// Every state the job passed through, starting with `Pending`
    pub history: Vec<JobState>,
    pub error: Option<StagerError>,
    /// Non-fatal findings of the config rewrite
    pub warnings: Vec<String>,
}

impl JobOutcome {
    pub fn succeeded(&self) -> bool {
        self.state == JobState::Done
    }
}

struct Tracker<'a> {
    log: &'a JobLog,
    history: Vec<JobState>,
}

impl<'a> Tracker<'a> {
    fn new(log: &'a JobLog) -> Self {
        Self {
            log,
            history: vec![JobState::Pending],
        }
    }

    fn enter(&mut self, state: JobState, banner: &str) {
        tracing::debug!(?state, "job state");
        self.history.push(state);
        self.log.banner(banner);
    }

    fn fail(mut self, step: Step, error: StagerError) -> JobOutcome {
        tracing::error!(%step, error = %error, "staging job failed");
        self.log.banner(&format!("Failed at step '{step}': {error}"));
        self.history.push(JobState::Failed(step));
        JobOutcome {
            state: JobState::Failed(step),
            history: self.history,
            error: Some(error),
            warnings: Vec::new(),
        }
    }

    fn done(mut self, staging_domain: &str, warnings: Vec<String>) -> JobOutcome {
        tracing::info!(staging = staging_domain, "staging job finished");
        self.log
            .banner(&format!("Done: staging site {staging_domain} is ready"));
        self.history.push(JobState::Done);
        JobOutcome {
            state: JobState::Done,
            history: self.history,
            error: None,
            warnings,
        }
    }
}

/// Run every step of `spec` in order, writing progress to `log`
pub fn run(spec: &JobSpec, host: &dyn HostPanel, log: &JobLog) -> JobOutcome {
    let request = spec.request();
    let staging_domain = request.staging_domain();
    let mut job = Tracker::new(log);

    log.banner(&format!(
        "Creating staging site {staging_domain} from {} for user {}",
        request.source_domain(),
        request.requesting_user()
    ));

    job.enter(
        JobState::CloningDomain,
        &format!(
            "Cloning domain {} to {staging_domain}",
            request.source_domain()
        ),
    );
    if let Err(e) = clone_domain(host, request, log) {
        return job.fail(Step::CloneDomain, e);
    }

    job.enter(
        JobState::CloningDatabase,
        &format!("Cloning database {}", request.source_database()),
    );
    let names = match clone_database(host, request, spec.credential(), log) {
        Ok(names) => names,
        Err(e) => return job.fail(Step::CloneDatabase, e),
    };
    log.line(&format!(
        "staging database {} with user {}",
        names.database, names.user
    ));

    job.enter(
        JobState::RewritingConfig,
        &format!("Rewriting {} configuration", request.config().config_type()),
    );
    match rewrite_config(host, request, &names, spec.credential(), log) {
        Ok(warnings) => job.done(&staging_domain, warnings),
        Err(e) => job.fail(Step::RewriteConfig, e),
    }
}

fn rewrite_config(
    host: &dyn HostPanel,
    request: &ProvisioningRequest,
    names: &StagingDatabase,
    credential: &StagingCredential,
    log: &JobLog,
) -> Result<Vec<String>> {
    let target = request.config();
    let (Some(rewriter), Some(relative)) = (rewriter_for(target), target.path()) else {
        log.line("manual configuration: application config left unchanged");
        return Ok(Vec::new());
    };

    let root = host.domain_root(request.requesting_user(), &request.staging_domain());
    let path = resolve_config_path(&root, relative)?;
    let values = ConnectionValues {
        database: &names.database,
        user: &names.user,
        password: credential.expose(),
    };

    let report = rewrite_file(rewriter.as_ref(), &path, &values)?;
    for warning in &report.warnings {
        tracing::warn!(path = %report.path.display(), "{warning}");
        log.line(&format!("warning: {warning}"));
    }
    if report.changed {
        log.line(&format!("updated {}", report.path.display()));
    } else {
        log.line(&format!("{} already up to date", report.path.display()));
    }
    Ok(report.warnings)
}
