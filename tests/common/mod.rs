//! Common test utilities for sitestager integration tests
//!
//! [`TestHost`] lays out a throw-away hosting tree and a settings file whose host
//! commands are plain shell tools, so whole jobs run without a control panel.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use assert_cmd::Command;
use sitestager::settings::{HostCommands, Settings};
use tempfile::TempDir;

/// A fake hosting environment for integration tests
#[allow(dead_code)]
pub struct TestHost {
    /// Temporary directory
    pub temp: TempDir,
    /// Root of the fake hosting tree
    pub root: PathBuf,
    /// Settings file pointing into `root`
    pub config: PathBuf,
}

#[allow(dead_code)]
impl TestHost {
    /// Create a host whose commands all succeed
    pub fn new() -> Self {
        Self::with_commands(|_| {})
    }

    /// Create a host, letting the caller adjust the command templates
    pub fn with_commands(adjust: impl FnOnce(&mut HostCommands)) -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let root = temp.path().to_path_buf();
        let r = root.display().to_string();

        let mut commands = HostCommands {
            create_domain: argv(&[
                "mkdir",
                "-p",
                &format!("{r}/home/{{user}}/web/{{staging_domain}}/public_html"),
            ]),
            create_database: argv(&[
                "sh",
                "-c",
                &format!("echo \"$1 $2\" >> {r}/databases.log"),
                "sh",
                "{staging_database}",
                "{staging_database_user}",
            ]),
            dump_database: argv(&["echo", "-- dump of {source_database}"]),
            import_database: argv(&[
                "sh",
                "-c",
                &format!("cat > {r}/import_$1.sql"),
                "sh",
                "{staging_database}",
            ]),
            list_databases: argv(&["printf", r#"{"{user}_wp": {}, "{user}_app": {}}"#]),
        };
        adjust(&mut commands);

        let settings = Settings {
            log_dir: root.join("logs"),
            domain_root: format!("{r}/home/{{user}}/web/{{domain}}"),
            web_root: format!("{r}/home/{{user}}/web/{{domain}}/public_html"),
            commands,
        };
        let config = root.join("config.yaml");
        std::fs::write(
            &config,
            serde_yaml::to_string(&settings).expect("Failed to serialize settings"),
        )
        .expect("Failed to write settings");

        Self { temp, root, config }
    }

    /// Write a file into a domain root
    pub fn write_site_file(&self, user: &str, domain: &str, relative: &str, content: &str) {
        let path = self.domain_root(user, domain).join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        std::fs::write(&path, content).expect("Failed to write file");
    }

    /// Read a file from a domain root
    pub fn read_site_file(&self, user: &str, domain: &str, relative: &str) -> String {
        std::fs::read_to_string(self.domain_root(user, domain).join(relative))
            .expect("Failed to read file")
    }

    pub fn domain_root(&self, user: &str, domain: &str) -> PathBuf {
        self.root.join("home").join(user).join("web").join(domain)
    }

    pub fn log_path(&self, prefix: &str, domain: &str) -> PathBuf {
        self.root
            .join("logs")
            .join(format!("staging_{prefix}.{domain}.log"))
    }

    /// sitestager command bound to this host's settings
    #[allow(deprecated)]
    pub fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("sitestager").expect("binary is built");
        cmd.env_remove("SITESTAGER_CONFIG")
            .env_remove("SITESTAGER_LOG")
            .env_remove("SITESTAGER_STAGING_PASSWORD")
            .arg("--config")
            .arg(&self.config);
        cmd
    }
}

pub fn argv(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|p| (*p).to_string()).collect()
}

/// Poll `path` until it contains `needle` or a timeout passes; returns the last content
#[allow(dead_code)]
pub fn wait_for_log(path: &Path, needle: &str) -> String {
    let deadline = Instant::now() + Duration::from_secs(30);
    loop {
        let content = std::fs::read_to_string(path).unwrap_or_default();
        if content.contains(needle) || Instant::now() > deadline {
            return content;
        }
        std::thread::sleep(Duration::from_millis(50));
    }
}
