use clap::Parser;

/// Arguments for databases command
#[derive(Parser, Debug)]
pub struct DatabasesArgs {
    /// Panel user whose databases are listed
    pub user: String,
}
