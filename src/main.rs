//! Sitestager command line entry point

use clap::Parser;

use sitestager::cli::{Cli, Commands};
use sitestager::commands::{self, GlobalOptions};
use sitestager::logging;

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let options = GlobalOptions {
        config: cli.config,
        verbose: cli.verbose,
    };

    let result = match cli.command {
        Commands::Create(args) => commands::create::run(&options, args),
        Commands::Invoke(args) => commands::invoke::run(&options, args),
        Commands::RunJob(args) => commands::run_job::run(&options, args),
        Commands::Databases(args) => commands::databases::run(&options, args),
        Commands::LogPath(args) => commands::log_path::run(&options, args),
        Commands::Completions(args) => commands::completions::run(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
