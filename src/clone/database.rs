use crate::credential::StagingCredential;
use crate::error::{Result, job};
use crate::host::HostPanel;
use crate::job::JobLog;
use crate::naming::StagingDatabase;
use crate::request::ProvisioningRequest;

/// Create the staging database and user under `credential` and copy the source data
///
/// Returns the names that were created, for the config rewrite that follows.
pub fn clone_database(
    host: &dyn HostPanel,
    request: &ProvisioningRequest,
    credential: &StagingCredential,
    log: &JobLog,
) -> Result<StagingDatabase> {
    let target = StagingDatabase::for_request(request);
    tracing::info!(
        source = request.source_database(),
        staging = %target.database,
        "cloning database"
    );

    host.clone_database(
        request.requesting_user(),
        request.source_database(),
        &target,
        credential,
        log,
    )
    .map_err(|e| job::database_clone_failed(request.source_database(), &target.database, e.to_string()))?;

    Ok(target)
}
