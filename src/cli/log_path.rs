use clap::Parser;

/// Arguments for log-path command
#[derive(Parser, Debug)]
pub struct LogPathArgs {
    /// Staging prefix as submitted
    pub prefix: String,

    /// Domain of the live site
    pub domain: String,
}
