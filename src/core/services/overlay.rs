use crate::core::errors::{EnvigenError, Result};
use crate::core::models::field::Field;

/// Overrides field values from the calling process environment.
///
/// Used by `generate --from-env` so a CI secret store can supply real
/// values on top of the checked-in definition files. The inferred type
/// is not revisited: an override that no longer parses as the declared
/// type falls back to the zero value at construction time, like any
/// other unparsable literal.
pub struct ProcessEnvOverlay;

impl ProcessEnvOverlay {
    /// Apply process-environment overrides to the loaded fields.
    ///
    /// Per field, in order:
    /// - variable set and non-empty → value overrides `raw_value`
    /// - variable set but empty → `EmptyEnvVar`
    /// - variable unset → `default_value` if present, otherwise
    ///   `MissingEnvVar` unless the field is optional
    pub fn apply(&self, fields: &mut [Field]) -> Result<()> {
        for field in fields.iter_mut() {
            match std::env::var_os(&field.name) {
                Some(value) => {
                    let value = value.to_string_lossy();
                    if value.is_empty() {
                        return Err(EnvigenError::EmptyEnvVar {
                            name: field.name.clone(),
                        });
                    }
                    field.raw_value = value.into_owned();
                }
                None => match &field.default_value {
                    Some(default) => field.raw_value = default.clone(),
                    None if field.optional => {}
                    None => {
                        return Err(EnvigenError::MissingEnvVar {
                            name: field.name.clone(),
                        });
                    }
                },
            }
        }
        Ok(())
    }
}
