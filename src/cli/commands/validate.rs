//! Validate config command implementation

use crate::config::load_config;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("Validating configuration file: {config_path}");
        println!();

        // load_config validates on the way through
        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("Configuration is invalid");
                println!("   Error: {e}");
                return Ok(2);
            }
        };

        println!("Configuration is valid");
        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        println!("  API Endpoint: {}", config.api.endpoint);
        println!("  Timeout: {}s", config.api.timeout_seconds);
        println!(
            "  Location Filter: {}",
            config.report.location_name.as_deref().unwrap_or("(none)")
        );
        println!(
            "  Report Window: {} .. {}",
            config.report.start_date.as_deref().unwrap_or("(open)"),
            config.report.end_date.as_deref().unwrap_or("(open)")
        );
        println!(
            "  Obligations: Year 1 = {}, Year 2 = {}, Year 3 = {}",
            format_obligation(config.report.obligations.year1),
            format_obligation(config.report.obligations.year2),
            format_obligation(config.report.obligations.year3),
        );
        if let Some(path) = &config.roster.import_csv {
            println!("  Roster CSV: {}", path.display());
        }
        println!();
        Ok(0)
    }
}

fn format_obligation(value: Option<i64>) -> String {
    value.map_or_else(|| "unset".to_string(), |v| v.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_obligation() {
        assert_eq!(format_obligation(Some(4)), "4");
        assert_eq!(format_obligation(None), "unset");
    }
}
