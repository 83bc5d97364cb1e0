use std::collections::BTreeSet;

use crate::core::errors::{EnvigenError, Result};
use crate::core::models::environment::EnvironmentDefinition;

/// Verifies that every environment defines the same variable set.
///
/// Generation only makes sense when each environment is fully specified:
/// a variable present in one file but absent in another would produce
/// structs that cannot satisfy the shared accessor trait.
pub struct ConsistencyChecker;

impl ConsistencyChecker {
    /// Check variable-name parity across all environments.
    ///
    /// Skipped entirely with fewer than two environments. Otherwise the
    /// union of all variable names is checked against every environment,
    /// in sorted order on both axes, and the first missing pair is
    /// reported.
    ///
    /// # Errors
    ///
    /// `InconsistentEnvironments` naming the missing variable and the
    /// environment it is missing from.
    pub fn check(&self, environments: &[EnvironmentDefinition]) -> Result<()> {
        if environments.len() < 2 {
            return Ok(());
        }

        let union: BTreeSet<&str> = environments
            .iter()
            .flat_map(|env| env.variable_names())
            .collect();

        let mut sorted: Vec<&EnvironmentDefinition> = environments.iter().collect();
        sorted.sort_by(|a, b| a.name.cmp(&b.name));

        for env in sorted {
            let names: BTreeSet<&str> = env.variable_names().into_iter().collect();
            for variable in &union {
                if !names.contains(variable) {
                    return Err(EnvigenError::InconsistentEnvironments {
                        variable: (*variable).to_string(),
                        environment: env.name.clone(),
                    });
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::field::{Field, FieldType};

    /// Helper: build an environment from variable names.
    fn make_env(name: &str, vars: &[&str]) -> EnvironmentDefinition {
        EnvironmentDefinition {
            name: name.to_string(),
            struct_name: format!("{name}Config"),
            fields: vars
                .iter()
                .map(|v| Field::new(*v, FieldType::Str, "x"))
                .collect(),
        }
    }

    #[test]
    fn single_environment_is_always_consistent() {
        let checker = ConsistencyChecker;
        let envs = vec![make_env("dev", &["ONLY_HERE"])];

        assert!(checker.check(&envs).is_ok());
    }

    #[test]
    fn no_environments_is_consistent() {
        assert!(ConsistencyChecker.check(&[]).is_ok());
    }

    #[test]
    fn matching_variable_sets_pass() {
        let checker = ConsistencyChecker;
        let envs = vec![
            make_env("dev", &["TOKEN", "PORT"]),
            make_env("prod", &["PORT", "TOKEN"]),
        ];

        assert!(checker.check(&envs).is_ok());
    }

    #[test]
    fn reports_the_exact_missing_pair() {
        let checker = ConsistencyChecker;
        let envs = vec![
            make_env("dev", &["TOKEN", "PORT"]),
            make_env("prod", &["TOKEN", "PORT", "EXTRA_VAR"]),
        ];

        let err = checker.check(&envs).unwrap_err();
        match err {
            EnvigenError::InconsistentEnvironments {
                variable,
                environment,
            } => {
                assert_eq!(variable, "EXTRA_VAR");
                assert_eq!(environment, "dev");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn three_environments_first_violation_in_sorted_order() {
        let checker = ConsistencyChecker;
        let envs = vec![
            make_env("staging", &["A", "B"]),
            make_env("dev", &["A"]),
            make_env("prod", &["A", "B"]),
        ];

        let err = checker.check(&envs).unwrap_err();
        match err {
            EnvigenError::InconsistentEnvironments {
                variable,
                environment,
            } => {
                assert_eq!(variable, "B");
                assert_eq!(environment, "dev");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
