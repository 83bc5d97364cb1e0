use std::path::Path;

use colored::Colorize;

use crate::cli::output;
use crate::config::app_config::AppConfig;
use crate::core::errors::{EnvigenError, Result};
use crate::core::services::consistency::ConsistencyChecker;
use crate::core::services::generator::GenerationPipeline;

/// Execute the `envigen inspect` command.
///
/// Prints every environment's variables with their inferred types,
/// then the consistency status. Inconsistency is reported as a
/// warning here, not a failure: inspect is for looking, check is for
/// gating.
pub fn execute(config_path: &str) -> Result<()> {
    let config = AppConfig::load(Path::new(config_path))?;
    let environments = GenerationPipeline::new().load_environments(&config)?;

    output::header("🧭 envigen inspect");

    for env in &environments {
        println!(
            "\n  {} → {} ({} variables)",
            env.name.bold(),
            env.struct_name,
            env.fields.len()
        );
        for field in &env.fields {
            println!("    {:<28} {}", field.name, field.field_type.rust_type());
        }
    }

    println!();
    match ConsistencyChecker.check(&environments) {
        Ok(()) if environments.len() >= 2 => {
            output::success("All environments define the same variables");
        }
        Ok(()) => {}
        Err(EnvigenError::InconsistentEnvironments {
            variable,
            environment,
        }) => {
            output::warning(&format!(
                "Variable '{variable}' is missing in environment '{environment}'"
            ));
        }
        Err(other) => return Err(other),
    }

    Ok(())
}
