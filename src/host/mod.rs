//! Hosting panel primitives
//!
//! The provisioner does not create domains or databases itself; it sequences the
//! panel's own primitives. [`HostPanel`] is the seam: [`CommandHost`] drives the
//! panel through configurable command lines, and tests substitute an in-memory host.

use std::path::PathBuf;

use crate::credential::StagingCredential;
use crate::error::Result;
use crate::job::JobLog;
use crate::naming::StagingDatabase;

pub mod command;

pub use command::CommandHost;

pub trait HostPanel: Send + Sync {
    /// Names of the databases owned by `user`, sorted
    fn list_databases(&self, user: &str) -> Result<Vec<String>>;

    /// Root directory of a hosted domain, where relative config paths are resolved
    fn domain_root(&self, user: &str, domain: &str) -> PathBuf;

    /// Create `staging_domain` and copy the web root of `source_domain` into it.
    ///
    /// Output of the underlying commands goes to `log`.
    fn clone_domain(
        &self,
        user: &str,
        source_domain: &str,
        staging_domain: &str,
        log: &JobLog,
    ) -> Result<()>;

    /// Create the staging database and user, then copy `source_database` into it
    fn clone_database(
        &self,
        user: &str,
        source_database: &str,
        target: &StagingDatabase,
        password: &StagingCredential,
        log: &JobLog,
    ) -> Result<()>;
}
