mod adapters;
mod cli;
mod config;
mod core;

use clap::Parser;

use cli::{Cli, Commands};

fn main() {
    let args = Cli::parse();

    let result = match &args.command {
        Commands::Init => cli::commands::init::execute(&args.config),
        Commands::Generate { seed, from_env } => {
            cli::commands::generate::execute(&args.config, *seed, *from_env)
        }
        Commands::Check => cli::commands::check::execute(&args.config),
        Commands::Inspect => cli::commands::inspect::execute(&args.config),
    };

    if let Err(e) = result {
        cli::output::error(&format!("Error: {e}"));
        std::process::exit(1);
    }
}
