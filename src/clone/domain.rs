use crate::error::{Result, job};
use crate::host::HostPanel;
use crate::job::JobLog;
use crate::request::ProvisioningRequest;

/// Create the staging domain and copy the source web root into it
pub fn clone_domain(host: &dyn HostPanel, request: &ProvisioningRequest, log: &JobLog) -> Result<()> {
    let staging_domain = request.staging_domain();
    tracing::info!(
        source = request.source_domain(),
        staging = %staging_domain,
        "cloning domain"
    );

    host.clone_domain(
        request.requesting_user(),
        request.source_domain(),
        &staging_domain,
        log,
    )
    .map_err(|e| job::domain_clone_failed(request.source_domain(), &staging_domain, e.to_string()))
}
