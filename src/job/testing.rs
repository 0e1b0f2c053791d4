//! In-memory host for pipeline tests

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::credential::StagingCredential;
use crate::error::{Result, host};
use crate::host::HostPanel;
use crate::job::JobLog;
use crate::naming::StagingDatabase;
use crate::request::{ProvisioningRequest, RawRequest, validate};

/// Valid request for `admin` / `example.com` / `staging` / `admin_wp`
pub fn request(config_type: &str, config_path: &str) -> ProvisioningRequest {
    validate(&RawRequest {
        user: "admin".to_string(),
        source_domain: "example.com".to_string(),
        staging_prefix: "staging".to_string(),
        source_database: "admin_wp".to_string(),
        config_type: config_type.to_string(),
        config_path: config_path.to_string(),
        ..RawRequest::default()
    })
    .unwrap()
}

/// Records calls and materializes seeded files under `<root>/<staging domain>` on clone
#[derive(Debug)]
pub struct FakeHost {
    root: PathBuf,
    files: BTreeMap<PathBuf, String>,
    links: BTreeMap<PathBuf, PathBuf>,
    fail_domain: bool,
    fail_database: bool,
    calls: Mutex<Vec<String>>,
}

impl FakeHost {
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            files: BTreeMap::new(),
            links: BTreeMap::new(),
            fail_domain: false,
            fail_database: false,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// A file the domain clone will place in the staging root
    pub fn with_file(mut self, relative: &str, content: &str) -> Self {
        self.files.insert(PathBuf::from(relative), content.to_string());
        self
    }

    /// A symlink the domain clone will recreate in the staging root
    pub fn with_symlink(mut self, relative: &str, target: &Path) -> Self {
        self.links.insert(PathBuf::from(relative), target.to_path_buf());
        self
    }

    pub fn failing_domain(mut self) -> Self {
        self.fail_domain = true;
        self
    }

    pub fn failing_database(mut self) -> Self {
        self.fail_database = true;
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

impl HostPanel for FakeHost {
    fn list_databases(&self, user: &str) -> Result<Vec<String>> {
        self.record(format!("list_databases {user}"));
        Ok(vec![format!("{user}_wp")])
    }

    fn domain_root(&self, _user: &str, domain: &str) -> PathBuf {
        self.root.join(domain)
    }

    fn clone_domain(
        &self,
        user: &str,
        source_domain: &str,
        staging_domain: &str,
        log: &JobLog,
    ) -> Result<()> {
        self.record(format!("clone_domain {user} {source_domain} {staging_domain}"));
        if self.fail_domain {
            log.line("domain already exists");
            return Err(host::command_failed("v-add-web-domain", "exited with status 4"));
        }
        let staging_root = self.domain_root(user, staging_domain);
        for (relative, content) in &self.files {
            let path = staging_root.join(relative);
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
            std::fs::write(path, content).unwrap();
        }
        #[cfg(unix)]
        for (relative, target) in &self.links {
            let path = staging_root.join(relative);
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
            std::os::unix::fs::symlink(target, path).unwrap();
        }
        std::fs::create_dir_all(staging_root).unwrap();
        Ok(())
    }

    fn clone_database(
        &self,
        user: &str,
        source_database: &str,
        target: &StagingDatabase,
        _password: &StagingCredential,
        _log: &JobLog,
    ) -> Result<()> {
        self.record(format!(
            "clone_database {user} {source_database} {}",
            target.database
        ));
        if self.fail_database {
            return Err(host::command_failed("mysqldump", "exited with status 2"));
        }
        Ok(())
    }
}
