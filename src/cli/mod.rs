//! CLI definitions using clap derive API
//!
//! This module is organized into submodules for each command's argument types:
//! - create: Create command arguments
//! - invoke: Plugin action dispatch arguments
//! - run_job: Background job arguments (hidden)
//! - databases: Database listing arguments
//! - log_path: Log path lookup arguments
//! - completions: Completions command arguments

use clap::builder::{Styles, styling::AnsiColor};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod completions;
pub mod create;
pub mod databases;
pub mod invoke;
pub mod log_path;
pub mod run_job;

pub use completions::CompletionsArgs;
pub use create::CreateArgs;
pub use databases::DatabasesArgs;
pub use invoke::InvokeArgs;
pub use log_path::LogPathArgs;
pub use run_job::RunJobArgs;

/// Sitestager - staging site provisioner
///
/// Clone a hosted website, its database and its configuration into a staging subdomain.
#[derive(Parser, Debug)]
#[command(
    name = "sitestager",
    author,
    version,
    color = clap::ColorChoice::Auto,
    styles = Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default().bold())
        .placeholder(AnsiColor::Cyan.on_default()),
    about = "Provision staging copies of hosted websites",
    long_about = "Sitestager clones a live site's web root into a new subdomain, copies its \
                  database under freshly generated credentials and points the copy's \
                  configuration at the new database. Each copy runs as a detached background \
                  job that reports only through its log file.",
    after_help = "\x1b[1m\x1b[32mExamples:\x1b[0m\n   \
                  sitestager create admin example.com staging admin_wp          \x1b[90m# Clone, leave config alone\x1b[0m\n   \
                  sitestager create admin example.com dev admin_wp wordpress public_html/wp-config.php\n   \
                  sitestager databases admin                                    \x1b[90m# List source databases\x1b[0m\n   \
                  sitestager log-path staging example.com                       \x1b[90m# Where the job writes\x1b[0m\n\n\
                  "
)]
pub struct Cli {
    /// Settings file (defaults to the user or system sitestager config)
    #[arg(long, short = 'c', global = true, env = "SITESTAGER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate a request and start a staging job
    Create(CreateArgs),

    /// Handle a control panel plugin action
    Invoke(InvokeArgs),

    /// Run a staging job in the foreground
    #[command(name = "run-job", hide = true)]
    RunJob(RunJobArgs),

    /// List the databases of a user
    Databases(DatabasesArgs),

    /// Print the log file path of a staging job
    #[command(name = "log-path")]
    LogPath(LogPathArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}
