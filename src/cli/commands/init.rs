//! Init command implementation
//!
//! Generates a sample configuration file.

use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "rollcall.toml")]
    pub output: String,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        if Path::new(&self.output).exists() && !self.force {
            println!("Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2);
        }

        match fs::write(&self.output, sample_config()) {
            Ok(_) => {
                println!("Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your install's endpoint", self.output);
                println!("  2. Set DEPUTY_ACCESS_TOKEN in the environment or a .env file");
                println!("  3. Validate configuration: rollcall validate-config");
                println!("  4. Run the report: rollcall report");
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("Failed to write configuration file");
                println!("   Error: {e}");
                Ok(5)
            }
        }
    }
}

fn sample_config() -> &'static str {
    r#"# rollcall configuration
# Deputy roster compliance reporting

[application]
log_level = "info"

[api]
# Install-specific endpoint: https://{install}.{geo}.deputy.com/api/v1/
endpoint = "https://example.au.deputy.com/api/v1/"
# Permanent OAuth access token
token = "${DEPUTY_ACCESS_TOKEN}"
timeout_seconds = 20

[report]
# Only count rosters at this location (operational unit company name).
# Remove to count every location.
location_name = "Main Campus"
# Inclusive reporting window. Remove either bound to leave it open.
start_date = "2025-01-01"
end_date = "2025-06-30"

[report.obligations]
# Required shifts per year level over the reporting window
year1 = 2
year2 = 4
year3 = 6

[roster]
# Enrolment roster CSV for the sync commands
# import_csv = "./roster.csv"

[logging]
local_enabled = false
local_path = "./logs"
local_rotation = "daily"
"#
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_config_parses_and_validates() {
        let substituted = sample_config().replace("${DEPUTY_ACCESS_TOKEN}", "test-token");
        let config: crate::config::RollcallConfig = toml::from_str(&substituted).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.report.obligations.year2, Some(4));
    }

    #[tokio::test]
    async fn test_init_refuses_overwrite_without_force() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rollcall.toml");
        fs::write(&path, "existing").unwrap();

        let args = InitArgs {
            output: path.to_string_lossy().to_string(),
            force: false,
        };
        let code = args.execute().await.unwrap();
        assert_eq!(code, 2);
        assert_eq!(fs::read_to_string(&path).unwrap(), "existing");
    }

    #[tokio::test]
    async fn test_init_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rollcall.toml");

        let args = InitArgs {
            output: path.to_string_lossy().to_string(),
            force: false,
        };
        let code = args.execute().await.unwrap();
        assert_eq!(code, 0);
        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains("[report.obligations]"));
    }
}
