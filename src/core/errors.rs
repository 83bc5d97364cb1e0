use std::path::PathBuf;

/// All domain errors for envigen.
///
/// Each variant provides enough context to diagnose the issue
/// without needing a debugger.
#[derive(Debug, thiserror::Error)]
pub enum EnvigenError {
    #[error(
        "Environment file not found: {path}\n\n  \
         Check that the path is correct and the file exists.\n  \
         Paths in envigen.json are resolved relative to the working directory."
    )]
    FileNotFound { path: PathBuf },

    #[error(
        "Variable '{variable}' is missing in environment '{environment}'\n\n  \
         Every environment must define the same set of variables.\n\n  \
         Solutions:\n    \
         → Add {variable}= to the '{environment}' env file\n    \
         → Or remove it from the other environments\n    \
         → Run 'envigen inspect' to compare variables across environments"
    )]
    InconsistentEnvironments {
        variable: String,
        environment: String,
    },

    #[error(
        "Invalid configuration: {detail}\n\n  \
         Expected an envigen.json with at least a package name, an output\n  \
         directory, and one environment entry.\n  \
         Run 'envigen init' to create a starter configuration."
    )]
    InvalidConfig { detail: String },

    #[error(
        "Required environment variable '{name}' not found\n\n  \
         The variable has no default value and is not marked optional.\n  \
         Export it in the shell before running with --from-env."
    )]
    MissingEnvVar { name: String },

    #[error("Environment variable '{name}' is set but empty")]
    EmptyEnvVar { name: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, EnvigenError>;
