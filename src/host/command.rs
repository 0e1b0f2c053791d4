//! Host primitives backed by external commands
//!
//! Each primitive is an argv template from [`Settings`]. Commands run without a
//! shell, so template values are never reinterpreted, and their stdout and stderr go
//! straight to the job log.

use std::path::PathBuf;
use std::process::{Command, ExitStatus, Stdio};

use crate::common::fs::copy_tree;
use crate::credential::StagingCredential;
use crate::error::{Result, host};
use crate::job::{JobLog, PASSWORD_ENV};
use crate::naming::StagingDatabase;
use crate::settings::{Settings, render_argv};

use super::HostPanel;

/// Stand-in for the password wherever a command line is displayed
const REDACTED: &str = "[REDACTED]";

#[derive(Debug, Clone)]
pub struct CommandHost {
    settings: Settings,
}

impl CommandHost {
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Run one command with output attached to the log
    fn run_logged(&self, argv: &[String], shown: &str, log: &JobLog) -> Result<()> {
        tracing::debug!(command = %shown, "running host command");
        let status = command(argv)
            .stdin(Stdio::null())
            .stdout(log.stdio()?)
            .stderr(log.stdio()?)
            .status()
            .map_err(|e| host::command_failed(shown, e.to_string()))?;
        check_status(shown, status)
    }

    /// Stream the dump command's stdout into the import command's stdin
    fn pipe_logged(
        &self,
        dump: &[String],
        import: &[String],
        shown: &str,
        log: &JobLog,
    ) -> Result<()> {
        tracing::debug!(command = %shown, "running host pipeline");

        let mut dump_child = command(dump)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(log.stdio()?)
            .spawn()
            .map_err(|e| host::command_failed(shown, format!("dump: {e}")))?;

        let Some(dump_out) = dump_child.stdout.take() else {
            let _ = dump_child.kill();
            let _ = dump_child.wait();
            return Err(host::command_failed(shown, "dump: no stdout pipe"));
        };

        let import_status = command(import)
            .stdin(Stdio::from(dump_out))
            .stdout(log.stdio()?)
            .stderr(log.stdio()?)
            .status();

        let import_status = match import_status {
            Ok(status) => status,
            Err(e) => {
                let _ = dump_child.kill();
                let _ = dump_child.wait();
                return Err(host::command_failed(shown, format!("import: {e}")));
            }
        };
        let dump_status = dump_child
            .wait()
            .map_err(|e| host::command_failed(shown, format!("dump: {e}")))?;

        if !dump_status.success() {
            return Err(host::command_failed(
                shown,
                format!("dump {}", describe(dump_status)),
            ));
        }
        if !import_status.success() {
            return Err(host::command_failed(
                shown,
                format!("import {}", describe(import_status)),
            ));
        }
        Ok(())
    }
}

impl HostPanel for CommandHost {
    fn list_databases(&self, user: &str) -> Result<Vec<String>> {
        let argv = render_argv(
            "list_databases",
            &self.settings.commands.list_databases,
            &[("user", user)],
        )?;
        let shown = argv.join(" ");
        tracing::debug!(command = %shown, "listing databases");

        let output = command(&argv)
            .stdin(Stdio::null())
            .stderr(Stdio::inherit())
            .output()
            .map_err(|e| host::command_failed(&shown, e.to_string()))?;
        check_status(&shown, output.status)?;

        parse_database_listing(&output.stdout)
            .map_err(|e| host::command_failed(&shown, format!("unexpected output: {e}")))
    }

    fn domain_root(&self, user: &str, domain: &str) -> PathBuf {
        self.settings.domain_root(user, domain)
    }

    fn clone_domain(
        &self,
        user: &str,
        source_domain: &str,
        staging_domain: &str,
        log: &JobLog,
    ) -> Result<()> {
        let vars = [
            ("user", user),
            ("domain", source_domain),
            ("staging_domain", staging_domain),
        ];
        let argv = render_argv("create_domain", &self.settings.commands.create_domain, &vars)?;
        let shown = argv.join(" ");
        log.line(&format!("$ {shown}"));
        self.run_logged(&argv, &shown, log)?;

        let source = self.settings.web_root(user, source_domain);
        let target = self.settings.web_root(user, staging_domain);
        log.line(&format!(
            "copying {} -> {}",
            source.display(),
            target.display()
        ));
        let stats = copy_tree(&source, &target).map_err(|e| {
            host::command_failed(
                format!("copy {} {}", source.display(), target.display()),
                e.to_string(),
            )
        })?;
        log.line(&format!(
            "copied {} files, {} directories, {} symlinks",
            stats.files, stats.dirs, stats.symlinks
        ));
        Ok(())
    }

    fn clone_database(
        &self,
        user: &str,
        source_database: &str,
        target: &StagingDatabase,
        password: &StagingCredential,
        log: &JobLog,
    ) -> Result<()> {
        let commands = &self.settings.commands;
        let real_vars = db_vars(user, source_database, target, password.expose());
        let shown_vars = db_vars(user, source_database, target, REDACTED);
        let render = |name: &str, template: &[String]| -> Result<(Vec<String>, String)> {
            let real = render_argv(name, template, &real_vars)?;
            let shown = render_argv(name, template, &shown_vars)?;
            Ok((real, shown.join(" ")))
        };

        let (create, create_shown) = render("create_database", &commands.create_database)?;
        log.line(&format!("$ {create_shown}"));
        self.run_logged(&create, &create_shown, log)?;

        let (dump, dump_shown) = render("dump_database", &commands.dump_database)?;
        let (import, import_shown) = render("import_database", &commands.import_database)?;
        let pipeline_shown = format!("{dump_shown} | {import_shown}");
        log.line(&format!("$ {pipeline_shown}"));
        self.pipe_logged(&dump, &import, &pipeline_shown, log)
    }
}

fn db_vars<'a>(
    user: &'a str,
    source_database: &'a str,
    target: &'a StagingDatabase,
    password: &'a str,
) -> [(&'static str, &'a str); 6] {
    [
        ("user", user),
        ("source_database", source_database),
        ("staging_database", &target.database),
        ("staging_database_user", &target.user),
        ("database_stem", &target.stem),
        ("password", password),
    ]
}

fn command(argv: &[String]) -> Command {
    let mut cmd = Command::new(&argv[0]);
    cmd.args(&argv[1..]).env_remove(PASSWORD_ENV);
    cmd
}

fn check_status(shown: &str, status: ExitStatus) -> Result<()> {
    if status.success() {
        Ok(())
    } else {
        Err(host::command_failed(shown, describe(status)))
    }
}

fn describe(status: ExitStatus) -> String {
    match status.code() {
        Some(code) => format!("exited with status {code}"),
        None => format!("terminated ({status})"),
    }
}

/// Parse a `{ "<name>": {...}, ... }` listing into sorted names
fn parse_database_listing(stdout: &[u8]) -> serde_json::Result<Vec<String>> {
    if stdout.iter().all(u8::is_ascii_whitespace) {
        return Ok(Vec::new());
    }
    let listing: serde_json::Map<String, serde_json::Value> = serde_json::from_slice(stdout)?;
    let mut names: Vec<String> = listing.into_iter().map(|(name, _)| name).collect();
    names.sort();
    Ok(names)
}
