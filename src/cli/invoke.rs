use clap::Parser;

/// Arguments for invoke command
#[derive(Parser, Debug)]
pub struct InvokeArgs {
    /// Plugin action name; only sitestager_create is handled
    pub action: String,

    /// Action arguments
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}
