//! Invoke command implementation
//!
//! Entry point for the control panel's plugin hook. Actions other than
//! `sitestager_create` belong to other plugins and are passed over silently.

use crate::cli::InvokeArgs;
use crate::error::Result;
use crate::plugin::{Invocation, PanelPlugin};

use super::{GlobalOptions, print_submission};

/// Run invoke command
pub fn run(options: &GlobalOptions, args: InvokeArgs) -> Result<()> {
    match options
        .provisioner()?
        .handle_invocation(&args.action, &args.args)?
    {
        Invocation::Handled(submission) => print_submission(&submission),
        Invocation::Ignored => {}
    }
    Ok(())
}
