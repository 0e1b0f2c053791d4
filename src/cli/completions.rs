use clap::Parser;

/// Arguments for completions command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Generate bash completions:\n    sitestager completions bash > ~/.bash_completion.d/sitestager\n\n\
                  Generate zsh completions:\n    sitestager completions zsh > ~/.zfunc/_sitestager\n\n\
                  Generate fish completions:\n    sitestager completions fish > ~/.config/fish/completions/sitestager.fish\n\n\
                  Generate PowerShell completions:\n    sitestager completions powershell")]
pub struct CompletionsArgs {
    /// Shell type (bash, elvish, fish, powershell, zsh)
    pub shell: String,
}
