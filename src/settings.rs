//! Hosting environment settings (`config.yaml`)
//!
//! Describes where sites live on disk and which host commands create domains and
//! databases. Every field has a default matching a stock HestiaCP install, so the file
//! is optional and a partial file only overrides what it names.
//!
//! Lookup order:
//! 1. `--config <path>` / `SITESTAGER_CONFIG` (must exist)
//! 2. `<config dir>/sitestager/config.yaml`
//! 3. `/etc/sitestager/config.yaml`
//! 4. Built-in defaults

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

use crate::error::{Result, host, settings};

/// Settings file name inside a config directory
pub const SETTINGS_FILE: &str = "config.yaml";

/// System-wide settings location
pub const SYSTEM_SETTINGS_PATH: &str = "/etc/sitestager/config.yaml";

const HESTIA_BIN: &str = "/usr/local/hestia/bin";

#[allow(clippy::expect_used)]
static PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([a-z_]+)\}").expect("placeholder pattern is valid"));

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Directory holding the per-job log files
    pub log_dir: PathBuf,

    /// Root of a hosted domain; config paths are resolved against it
    pub domain_root: String,

    /// Document root of a hosted domain; this is what gets copied
    pub web_root: String,

    pub commands: HostCommands,
}

/// Argv templates for the host primitives
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct HostCommands {
    pub create_domain: Vec<String>,
    pub create_database: Vec<String>,
    pub dump_database: Vec<String>,
    pub import_database: Vec<String>,
    pub list_databases: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_dir: std::env::temp_dir(),
            domain_root: "/home/{user}/web/{domain}".to_string(),
            web_root: "/home/{user}/web/{domain}/public_html".to_string(),
            commands: HostCommands::default(),
        }
    }
}

impl Default for HostCommands {
    fn default() -> Self {
        let hestia = |cmd: &str| format!("{HESTIA_BIN}/{cmd}");
        Self {
            create_domain: argv(&[&hestia("v-add-web-domain"), "{user}", "{staging_domain}"]),
            create_database: argv(&[
                &hestia("v-add-database"),
                "{user}",
                "{database_stem}",
                "{database_stem}",
                "{password}",
                "mysql",
            ]),
            dump_database: argv(&[
                "mysqldump",
                "--single-transaction",
                "--routines",
                "--triggers",
                "{source_database}",
            ]),
            import_database: argv(&["mysql", "{staging_database}"]),
            list_databases: argv(&[&hestia("v-list-databases"), "{user}", "json"]),
        }
    }
}

fn argv(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|p| (*p).to_string()).collect()
}

impl Settings {
    /// Load settings following the lookup order above
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            if !path.is_file() {
                return Err(settings::read_failed(
                    path.display().to_string(),
                    "file does not exist",
                ));
            }
            return Self::from_file(path);
        }

        for candidate in Self::candidate_paths() {
            if candidate.is_file() {
                tracing::debug!(path = %candidate.display(), "loading settings");
                return Self::from_file(&candidate);
            }
        }

        tracing::debug!("no settings file found, using defaults");
        Ok(Self::default())
    }

    /// Read and parse one settings file
    pub fn from_file(path: &Path) -> Result<Self> {
        let display = path.display().to_string();
        let content = std::fs::read_to_string(path)
            .map_err(|e| settings::read_failed(&display, e.to_string()))?;
        Self::from_yaml(&content).map_err(|e| match e {
            crate::error::StagerError::SettingsParseFailed { reason, .. } => {
                settings::parse_failed(display, reason)
            }
            other => other,
        })
    }

    /// Parse settings from YAML; an empty document yields the defaults
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let parsed: Self = serde_yaml::from_str(yaml)?;
        Ok(parsed)
    }

    fn candidate_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();
        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join("sitestager").join(SETTINGS_FILE));
        }
        paths.push(PathBuf::from(SYSTEM_SETTINGS_PATH));
        paths
    }

    /// Root directory of `domain` owned by `user`
    pub fn domain_root(&self, user: &str, domain: &str) -> PathBuf {
        PathBuf::from(render(
            &self.domain_root,
            &[("user", user), ("domain", domain)],
        ))
    }

    /// Document root of `domain` owned by `user`
    pub fn web_root(&self, user: &str, domain: &str) -> PathBuf {
        PathBuf::from(render(&self.web_root, &[("user", user), ("domain", domain)]))
    }
}

/// Substitute `{name}` placeholders in one template string.
///
/// Unknown placeholders and stray braces are left as written. Substituted values are
/// never scanned again.
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    PLACEHOLDER_RE
        .replace_all(template, |caps: &Captures<'_>| {
            let name = &caps[1];
            vars.iter()
                .find(|(key, _)| *key == name)
                .map_or_else(|| caps[0].to_string(), |(_, value)| (*value).to_string())
        })
        .into_owned()
}

/// Render an argv template; the program (first element) must not be empty
pub fn render_argv(name: &str, template: &[String], vars: &[(&str, &str)]) -> Result<Vec<String>> {
    let rendered: Vec<String> = template.iter().map(|part| render(part, vars)).collect();
    match rendered.first() {
        Some(program) if !program.trim().is_empty() => Ok(rendered),
        _ => Err(host::empty_template(name)),
    }
}
