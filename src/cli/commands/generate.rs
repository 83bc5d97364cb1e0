use std::path::Path;

use crate::cli::output;
use crate::config::app_config::AppConfig;
use crate::core::errors::Result;
use crate::core::services::generator::GenerationPipeline;

/// Execute the `envigen generate` command.
///
/// Loads the run configuration, drives the full pipeline, and writes
/// the artifact. Each output file is written in one shot so a failing
/// run never leaves a half-updated artifact behind.
pub fn execute(config_path: &str, seed: Option<u64>, from_env: bool) -> Result<()> {
    let mut config = AppConfig::load(Path::new(config_path))?;
    if let Some(seed) = seed {
        config.seed = seed;
    }

    output::header("🛠 envigen generate");

    let pipeline = GenerationPipeline { from_env };
    let result = pipeline.run(&config)?;

    if config.environments.len() >= 2 {
        output::success(&format!(
            "Consistency check passed — {} environments define the same variables",
            config.environments.len()
        ));
    }
    if config.seed == 0 {
        output::warning("Seed 0: obfuscation tables change on every run");
    }

    std::fs::create_dir_all(&config.output_dir)?;
    for path in &result.output_paths {
        std::fs::write(path, &result.artifact)?;
        output::success(&format!("Written to {}", path.display()));
    }

    Ok(())
}
