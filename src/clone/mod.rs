//! Domain and database cloning steps
//!
//! Both steps delegate the work to a [`HostPanel`](crate::host::HostPanel) and only
//! decide what is cloned to where. Host failures are reported as the step's own error
//! so the job log names the step that broke.

pub mod database;
pub mod domain;

pub use database::clone_database;
pub use domain::clone_domain;
