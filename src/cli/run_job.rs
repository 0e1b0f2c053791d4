use clap::Parser;

/// Arguments for the background job
#[derive(Parser, Debug)]
pub struct RunJobArgs {
    /// user, domain, prefix, database, password ('-' reads SITESTAGER_STAGING_PASSWORD),
    /// config type, config path, name key, user key, pass key
    #[arg(num_args = 10, required = true, allow_hyphen_values = true)]
    pub fields: Vec<String>,
}
