use std::path::Path;

use crate::cli::output;
use crate::config::app_config::AppConfig;
use crate::core::errors::Result;
use crate::core::services::consistency::ConsistencyChecker;
use crate::core::services::generator::GenerationPipeline;

/// Execute the `envigen check` command.
///
/// Loads every environment and runs the parity check, without emitting
/// anything.
pub fn execute(config_path: &str) -> Result<()> {
    let config = AppConfig::load(Path::new(config_path))?;
    let environments = GenerationPipeline::new().load_environments(&config)?;

    output::header("🔍 envigen check");

    if environments.len() < 2 {
        output::warning("Fewer than two environments — nothing to cross-check");
        return Ok(());
    }

    ConsistencyChecker.check(&environments)?;

    output::success(&format!(
        "{} environments define the same {} variable(s)",
        environments.len(),
        environments[0].fields.len()
    ));

    Ok(())
}
