//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::RollcallConfig;
use crate::config::secret_string;
use crate::domain::errors::RollcallError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into RollcallConfig
/// 4. Applies environment variable overrides (ROLLCALL_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns an error if the file cannot be read, the TOML does not parse,
/// a referenced environment variable is unset, or validation fails.
///
/// # Examples
///
/// ```no_run
/// use rollcall::config::loader::load_config;
///
/// let config = load_config("rollcall.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<RollcallConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(RollcallError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        RollcallError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;

    let mut config: RollcallConfig = toml::from_str(&contents)
        .map_err(|e| RollcallError::Configuration(format!("Failed to parse TOML: {e}")))?;

    apply_env_overrides(&mut config);

    config.validate().map_err(|e| {
        RollcallError::Configuration(format!("Configuration validation failed: {e}"))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// # Errors
///
/// Returns an error if a referenced environment variable is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| RollcallError::Configuration(format!("Invalid substitution regex: {e}")))?;
    let mut result = String::new();
    let mut missing_vars = Vec::new();

    // Process line by line to skip comments
    for line in input.lines() {
        let trimmed = line.trim_start();

        if trimmed.starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{var_name}}}");
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.contains(&var_name.to_string()) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(RollcallError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides using the ROLLCALL_* prefix
///
/// Environment variables follow the pattern: ROLLCALL_<SECTION>_<KEY>
/// For example: ROLLCALL_API_ENDPOINT, ROLLCALL_REPORT_LOCATION_NAME
fn apply_env_overrides(config: &mut RollcallConfig) {
    if let Ok(val) = std::env::var("ROLLCALL_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    if let Ok(val) = std::env::var("ROLLCALL_API_ENDPOINT") {
        config.api.endpoint = val;
    }
    if let Ok(val) = std::env::var("ROLLCALL_API_TOKEN") {
        config.api.token = secret_string(val);
    }
    if let Ok(val) = std::env::var("ROLLCALL_API_TIMEOUT_SECONDS") {
        if let Ok(timeout) = val.parse() {
            config.api.timeout_seconds = timeout;
        }
    }

    if let Ok(val) = std::env::var("ROLLCALL_REPORT_LOCATION_NAME") {
        config.report.location_name = Some(val);
    }
    if let Ok(val) = std::env::var("ROLLCALL_REPORT_START_DATE") {
        config.report.start_date = Some(val);
    }
    if let Ok(val) = std::env::var("ROLLCALL_REPORT_END_DATE") {
        config.report.end_date = Some(val);
    }

    if let Ok(val) = std::env::var("ROLLCALL_ROSTER_IMPORT_CSV") {
        config.roster.import_csv = Some(val.into());
    }

    if let Ok(val) = std::env::var("ROLLCALL_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("ROLLCALL_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
    if let Ok(val) = std::env::var("ROLLCALL_LOGGING_LOCAL_ROTATION") {
        config.logging.local_rotation = val;
    }
}
