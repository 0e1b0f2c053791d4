//! Sitestager - staging site provisioner
//!
//! Clones a hosted website into a staging subdomain: the web root is copied, the
//! database is cloned under a freshly generated password, and the application's
//! configuration is rewritten to use the new database. The work runs as a detached
//! background job whose log file is the only record of its outcome.
//!
//! The library entry point for control panels is [`plugin::StagingProvisioner`], which
//! implements [`plugin::PanelPlugin`].

pub mod cli;
pub mod clone;
pub mod commands;
pub mod common;
pub mod credential;
pub mod error;
pub mod host;
pub mod job;
pub mod logging;
pub mod naming;
pub mod plugin;
pub mod request;
pub mod rewriter;
pub mod settings;

pub use error::{Result, StagerError};
