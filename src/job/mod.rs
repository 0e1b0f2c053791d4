//! Staging jobs
//!
//! A job carries one validated request and its credential through the pipeline
//! (domain clone, database clone, config rewrite). Jobs are launched detached and
//! report only through their log file.
//!
//! - [`log`]: per-job log file and its deterministic path
//! - [`pipeline`]: the step sequence and its state machine
//! - [`launcher`]: fire-and-forget launchers (child process or thread)

use crate::credential::StagingCredential;
use crate::error::{Result, request};
use crate::request::{ConfigTarget, ProvisioningRequest, RawRequest, validate};

pub mod launcher;
pub mod log;
pub mod pipeline;

#[cfg(test)]
pub(crate) mod testing;

pub use launcher::{JobLauncher, ProcessLauncher, ThreadLauncher};
pub use log::{JobLog, log_path};
pub use pipeline::{JobOutcome, JobState, Step, run};

/// Environment variable carrying the staging password into a job process
pub const PASSWORD_ENV: &str = "SITESTAGER_STAGING_PASSWORD";

/// Password slot value meaning "read it from [`PASSWORD_ENV`]"
pub const HANDOFF_MARKER: &str = "-";

/// Number of positional fields of a job invocation
pub const JOB_FIELD_COUNT: usize = 10;

/// Index of the password among the job fields
const PASSWORD_FIELD: usize = 4;

/// Everything one job needs: the request and the credential generated for it
#[derive(Debug)]
pub struct JobSpec {
    request: ProvisioningRequest,
    credential: StagingCredential,
}

impl JobSpec {
    pub fn new(request: ProvisioningRequest, credential: StagingCredential) -> Self {
        Self {
            request,
            credential,
        }
    }

    pub fn request(&self) -> &ProvisioningRequest {
        &self.request
    }

    pub fn credential(&self) -> &StagingCredential {
        &self.credential
    }

    /// The ten positional job fields with [`HANDOFF_MARKER`] in the password slot.
    ///
    /// Order: user, source domain, staging prefix, source database, password, config
    /// type, config path, dotenv name key, dotenv user key, dotenv password key.
    pub fn to_fields(&self) -> Vec<String> {
        let request = &self.request;
        let config = request.config();
        let path = config
            .path()
            .map(|p| p.to_string_lossy().into_owned())
            .unwrap_or_default();
        let (name_key, user_key, pass_key) = match config {
            ConfigTarget::Env { keys, .. } => (
                keys.db_name_key.clone(),
                keys.db_user_key.clone(),
                keys.db_pass_key.clone(),
            ),
            _ => Default::default(),
        };

        vec![
            request.requesting_user().to_string(),
            request.source_domain().to_string(),
            request.staging_prefix().to_string(),
            request.source_database().to_string(),
            HANDOFF_MARKER.to_string(),
            config.config_type().as_str().to_string(),
            path,
            name_key,
            user_key,
            pass_key,
        ]
    }

    /// Rebuild a job from its positional fields.
    ///
    /// A [`HANDOFF_MARKER`] password takes the value from `handoff`; any other value is
    /// used as the password itself. The request is validated again.
    pub fn from_fields(fields: &[String], handoff: Option<String>) -> Result<Self> {
        if fields.len() != JOB_FIELD_COUNT {
            return Err(request::invalid(format!(
                "expected {JOB_FIELD_COUNT} job fields, got {}",
                fields.len()
            )));
        }

        let password = if fields[PASSWORD_FIELD] == HANDOFF_MARKER {
            handoff.ok_or_else(|| {
                request::credential_failed(format!(
                    "password slot is '{HANDOFF_MARKER}' but {PASSWORD_ENV} is not set"
                ))
            })?
        } else {
            fields[PASSWORD_FIELD].clone()
        };
        let credential = StagingCredential::from_handoff(password)?;

        let request_fields: Vec<String> = fields
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != PASSWORD_FIELD)
            .map(|(_, f)| f.clone())
            .collect();
        let request = validate(&RawRequest::from_fields(&request_fields)?)?;

        Ok(Self::new(request, credential))
    }
}
