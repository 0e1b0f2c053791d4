//! Pipeline step errors

use super::StagerError;

/// Creates a domain clone error
pub fn domain_clone_failed(
    domain: impl Into<String>,
    staging_domain: impl Into<String>,
    reason: impl Into<String>,
) -> StagerError {
    StagerError::DomainClone {
        domain: domain.into(),
        staging_domain: staging_domain.into(),
        reason: reason.into(),
    }
}

/// Creates a database clone error
pub fn database_clone_failed(
    database: impl Into<String>,
    staging_database: impl Into<String>,
    reason: impl Into<String>,
) -> StagerError {
    StagerError::DatabaseClone {
        database: database.into(),
        staging_database: staging_database.into(),
        reason: reason.into(),
    }
}

/// Creates a config rewrite error
pub fn config_rewrite_failed(path: impl Into<String>, reason: impl Into<String>) -> StagerError {
    StagerError::ConfigRewrite {
        path: path.into(),
        reason: reason.into(),
    }
}

/// Creates a job launch error
pub fn launch_failed(reason: impl Into<String>) -> StagerError {
    StagerError::JobLaunch {
        reason: reason.into(),
    }
}
