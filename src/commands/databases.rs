//! Databases command implementation
//!
//! Prints one database name per line, sorted, for filling a selection list.

use crate::cli::DatabasesArgs;
use crate::error::Result;
use crate::host::{CommandHost, HostPanel};

use super::GlobalOptions;

/// Run databases command
pub fn run(options: &GlobalOptions, args: DatabasesArgs) -> Result<()> {
    let host = CommandHost::new(options.settings()?);
    for name in host.list_databases(&args.user)? {
        println!("{name}");
    }
    Ok(())
}
