//! Create command implementation
//!
//! Validates the request, generates the staging credential and launches the
//! background job. Returns as soon as the job has started.

use crate::cli::CreateArgs;
use crate::error::Result;
use crate::request::RawRequest;

use super::{GlobalOptions, print_submission};

/// Run create command
pub fn run(options: &GlobalOptions, args: CreateArgs) -> Result<()> {
    let raw = raw_request(args);
    let submission = options.provisioner()?.submit(&raw)?;
    print_submission(&submission);
    Ok(())
}

fn raw_request(args: CreateArgs) -> RawRequest {
    RawRequest {
        user: args.user,
        source_domain: args.domain,
        staging_prefix: args.prefix,
        source_database: args.database,
        config_type: args.config_type,
        config_path: args.config_path,
        env_db_name_key: args.name_key,
        env_db_user_key: args.user_key,
        env_db_pass_key: args.pass_key,
    }
}
