//! Per-job log file
//!
//! One append-only file per staging job, named after the staging prefix and source
//! domain. Host command output is attached to it directly and the runner adds `==>`
//! step banners, so the file reads top to bottom as the job's history.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::Stdio;

/// Log location for a job: `<log_dir>/staging_<prefix>.<domain>.log`
pub fn log_path(log_dir: &Path, staging_prefix: &str, source_domain: &str) -> PathBuf {
    log_dir.join(format!("staging_{staging_prefix}.{source_domain}.log"))
}

#[derive(Debug)]
pub struct JobLog {
    path: PathBuf,
    file: File,
}

impl JobLog {
    /// Open (or create) the log in append mode
    pub fn open(path: &Path) -> io::Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            file,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write a `==> message` step banner
    pub fn banner(&self, message: &str) {
        self.write_line(&format!("==> {message}"));
    }

    /// Write a plain line
    pub fn line(&self, message: &str) {
        self.write_line(message);
    }

    fn write_line(&self, text: &str) {
        let mut file = &self.file;
        if let Err(e) = writeln!(file, "{text}").and_then(|()| file.flush()) {
            tracing::warn!(path = %self.path.display(), error = %e, "could not write job log");
        }
    }

    /// A handle to the log usable as a child process's stdout or stderr
    pub fn stdio(&self) -> io::Result<Stdio> {
        Ok(Stdio::from(self.file.try_clone()?))
    }
}
