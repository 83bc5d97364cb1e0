pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};

/// Typed config structs from your env files. Obfuscated. Deterministic.
#[derive(Parser, Debug)]
#[command(name = "envigen", version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to the run configuration file
    #[arg(long, global = true, default_value = "envigen.json")]
    pub config: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a starter envigen.json with sample env files
    Init,

    /// Generate the merged configuration source file
    Generate {
        /// Override the configured obfuscation seed (0 = randomize)
        #[arg(long)]
        seed: Option<u64>,

        /// Overlay process environment variables onto file values
        #[arg(long)]
        from_env: bool,
    },

    /// Verify that all environments define the same variables
    Check,

    /// Show variables and inferred types per environment
    Inspect,
}
