use std::path::Path;

use crate::cli::output;
use crate::core::errors::Result;

const STARTER_CONFIG: &str = r#"{
  "package": "config",
  "output_dir": "src/generated",
  "seed": 12345,
  "format": "scalar",
  "environments": {
    "dev": { "file": ".env.dev", "struct_name": "DevConfig" },
    "prod": { "file": ".env.prod", "struct_name": "ProdConfig" }
  }
}
"#;

const SAMPLE_DEV: &str = "# Dev environment\nTOKEN=dev_token_123\nAPI_URL=https://dev-api.example.com\nPORT=8080\nDEBUG=true\nTIMEOUT=30.5\n";

const SAMPLE_PROD: &str = "# Prod environment\nTOKEN=prod_token_456\nAPI_URL=https://api.example.com\nPORT=80\nDEBUG=false\nTIMEOUT=60.0\n";

/// Execute the `envigen init` command.
///
/// Writes a starter configuration and sample env files. Existing files
/// are never overwritten.
pub fn execute(config_path: &str) -> Result<()> {
    output::header("🚀 envigen init");

    let config = Path::new(config_path);
    if config.exists() {
        output::warning(&format!("{config_path} already exists, leaving it untouched"));
    } else {
        std::fs::write(config, STARTER_CONFIG)?;
        output::success(&format!("Created {config_path}"));
    }

    for (path, content) in [(".env.dev", SAMPLE_DEV), (".env.prod", SAMPLE_PROD)] {
        if Path::new(path).exists() {
            output::warning(&format!("{path} already exists, leaving it untouched"));
        } else {
            std::fs::write(path, content)?;
            output::success(&format!("Created {path}"));
        }
    }

    println!();
    output::success("Run 'envigen generate' to produce src/generated/config_env.gen.rs");

    Ok(())
}
