use std::collections::BTreeMap;

use crate::adapters::parsers::env_file::load_env_file;
use crate::config::app_config::AppConfig;
use crate::core::errors::Result;
use crate::core::models::artifact::GenerationResult;
use crate::core::models::environment::EnvironmentDefinition;
use crate::core::services::consistency::ConsistencyChecker;
use crate::core::services::emitter::{
    CodeEmitter, EmitFormat, FieldData, PreparedEnvironment,
};
use crate::core::services::obfuscator::{obfuscate, xor_bytes, DEFAULT_MASK_KEY};
use crate::core::services::overlay::ProcessEnvOverlay;

/// File name of the merged artifact inside `output_dir`.
pub const OUTPUT_FILE_NAME: &str = "config_env.gen.rs";

/// The generation pipeline: load → consistency check → obfuscate →
/// emit.
///
/// One invocation is synchronous and fail-fast; no emission work
/// happens unless every environment loaded and the parity check passed.
pub struct GenerationPipeline {
    /// Overlay process environment variables onto loaded values, with
    /// the file value acting as the default.
    pub from_env: bool,
}

impl GenerationPipeline {
    pub fn new() -> Self {
        Self { from_env: false }
    }

    /// Run the full pipeline and return the rendered artifact.
    pub fn run(&self, config: &AppConfig) -> Result<GenerationResult> {
        let environments = self.load_environments(config)?;
        ConsistencyChecker.check(&environments)?;

        let prepared = prepare(environments, config.seed, config.format);
        let emitter = CodeEmitter {
            package: config.package.clone(),
            format: config.format,
        };

        Ok(GenerationResult {
            artifact: emitter.emit(&prepared),
            output_paths: vec![config.output_dir.join(OUTPUT_FILE_NAME)],
        })
    }

    /// Load every environment named by the config, in name order.
    ///
    /// # Errors
    ///
    /// `FileNotFound` for the first unreadable env file; overlay errors
    /// when `from_env` is set and a required variable is missing/empty.
    pub fn load_environments(&self, config: &AppConfig) -> Result<Vec<EnvironmentDefinition>> {
        let mut environments = Vec::new();
        for (name, entry) in &config.environments {
            let mut fields = load_env_file(&entry.file)?;

            if self.from_env {
                for field in &mut fields {
                    field.default_value = Some(field.raw_value.clone());
                }
                ProcessEnvOverlay.apply(&mut fields)?;
            }

            environments.push(EnvironmentDefinition {
                name: name.clone(),
                struct_name: entry.struct_name.clone(),
                fields,
            });
        }
        Ok(environments)
    }
}

impl Default for GenerationPipeline {
    fn default() -> Self {
        Self::new()
    }
}

/// Attach obfuscation data to every qualifying field: strings and
/// floats with non-empty values, per the chosen format. Ints and bools
/// are embedded as plain literals and get no entry.
pub fn prepare(
    environments: Vec<EnvironmentDefinition>,
    seed: u64,
    format: EmitFormat,
) -> Vec<PreparedEnvironment> {
    environments
        .into_iter()
        .map(|definition| {
            let mut data = BTreeMap::new();
            for field in &definition.fields {
                if !field.field_type.needs_obfuscation() || field.raw_value.is_empty() {
                    continue;
                }
                let entry = match format {
                    EmitFormat::Scalar => FieldData::Scalar(obfuscate(&field.raw_value, seed)),
                    EmitFormat::Packed => FieldData::Packed(xor_bytes(
                        field.raw_value.as_bytes(),
                        DEFAULT_MASK_KEY.as_bytes(),
                    )),
                };
                data.insert(field.name.clone(), entry);
            }
            PreparedEnvironment { definition, data }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::parsers::env_file::EnvFileParser;
    use crate::core::models::field::FieldType;
    use crate::core::services::obfuscator::{deobfuscate, unmask_with_key};
    use crate::core::traits::parser::DefinitionParser;
    use base64::engine::general_purpose::STANDARD as BASE64;
    use base64::Engine;

    const SEED: u64 = 12345;

    fn dev_definition() -> EnvironmentDefinition {
        let content = "# Dev environment\nTOKEN=dev_token_123\nPORT=8080\nDEBUG=true\nTIMEOUT=30.5\nEMPTY_VALUE=\n";
        EnvironmentDefinition {
            name: "dev".to_string(),
            struct_name: "DevConfig".to_string(),
            fields: EnvFileParser.parse(content),
        }
    }

    #[test]
    fn scalar_payloads_round_trip_through_deobfuscation() {
        let prepared = prepare(vec![dev_definition()], SEED, EmitFormat::Scalar);
        let env = &prepared[0];

        let FieldData::Scalar(token) = &env.data["TOKEN"] else {
            panic!("expected scalar data for TOKEN");
        };
        assert_eq!(deobfuscate(&token.keys, &token.cipher), "dev_token_123");

        let FieldData::Scalar(timeout) = &env.data["TIMEOUT"] else {
            panic!("expected scalar data for TIMEOUT");
        };
        assert_eq!(deobfuscate(&timeout.keys, &timeout.cipher), "30.5");
    }

    #[test]
    fn packed_payloads_round_trip_through_unmasking() {
        let prepared = prepare(vec![dev_definition()], SEED, EmitFormat::Packed);
        let env = &prepared[0];

        let FieldData::Packed(bytes) = &env.data["TOKEN"] else {
            panic!("expected packed data for TOKEN");
        };
        let encoded = BASE64.encode(bytes);
        assert_eq!(unmask_with_key(&encoded, DEFAULT_MASK_KEY), "dev_token_123");
    }

    #[test]
    fn ints_bools_and_empty_values_get_no_data() {
        let prepared = prepare(vec![dev_definition()], SEED, EmitFormat::Scalar);
        let env = &prepared[0];

        assert!(!env.data.contains_key("PORT"));
        assert!(!env.data.contains_key("DEBUG"));
        assert!(!env.data.contains_key("EMPTY_VALUE"));

        let def = &env.definition;
        assert_eq!(def.field("PORT").unwrap().field_type, FieldType::Int);
        assert_eq!(def.field("PORT").unwrap().raw_value.parse::<i64>().unwrap(), 8080);
        assert_eq!(def.field("DEBUG").unwrap().field_type, FieldType::Bool);
        assert_eq!(def.field("DEBUG").unwrap().raw_value, "true");
    }

    #[test]
    fn fixed_seed_prepares_identically_twice() {
        let a = prepare(vec![dev_definition()], SEED, EmitFormat::Scalar);
        let b = prepare(vec![dev_definition()], SEED, EmitFormat::Scalar);

        assert_eq!(a[0].data, b[0].data);
    }
}
