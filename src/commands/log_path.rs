//! Log-path command implementation

use crate::cli::LogPathArgs;
use crate::error::Result;
use crate::job::log_path;
use crate::request::sanitize_prefix;

use super::GlobalOptions;

/// Print the log path a job for `prefix` and `domain` writes to
pub fn run(options: &GlobalOptions, args: LogPathArgs) -> Result<()> {
    let settings = options.settings()?;
    let path = log_path(
        &settings.log_dir,
        &sanitize_prefix(&args.prefix),
        args.domain.trim(),
    );
    println!("{}", path.display());
    Ok(())
}
