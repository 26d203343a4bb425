//! Configuration schema types
//!
//! The root structure maps directly onto the `rollcall.toml` file.

use crate::config::SecretString;
use crate::core::report::{DateWindow, ReportOptions, DATE_FORMAT};
use crate::domain::YearLevel;
use chrono::NaiveDate;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main rollcall configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RollcallConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Vendor API access
    pub api: ApiConfig,

    /// Report parameters
    #[serde(default)]
    pub report: ReportConfig,

    /// Enrolment roster import
    #[serde(default)]
    pub roster: RosterConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl RollcallConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.api.validate()?;
        self.report.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

/// Vendor API access configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Install-specific API endpoint, e.g. `https://acme.au.deputy.com/api/v1/`
    pub endpoint: String,

    /// Permanent OAuth access token
    pub token: SecretString,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl ApiConfig {
    fn validate(&self) -> Result<(), String> {
        if !self.endpoint.starts_with("http://") && !self.endpoint.starts_with("https://") {
            return Err(format!(
                "api.endpoint must be an http(s) URL, got '{}'",
                self.endpoint
            ));
        }
        if self.token.expose_secret().is_empty() {
            return Err("api.token must not be empty".to_string());
        }
        if self.timeout_seconds == 0 {
            return Err("api.timeout_seconds must be greater than 0".to_string());
        }
        Ok(())
    }
}

/// Shift obligations per year level
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ObligationConfig {
    pub year1: Option<i64>,
    pub year2: Option<i64>,
    pub year3: Option<i64>,
}

impl ObligationConfig {
    /// The configured obligation for a year level, if any
    pub fn for_year(&self, year: YearLevel) -> Option<i64> {
        match year {
            YearLevel::Year1 => self.year1,
            YearLevel::Year2 => self.year2,
            YearLevel::Year3 => self.year3,
        }
    }
}

/// Report parameters
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Only count rosters at this location (operational unit company name)
    pub location_name: Option<String>,

    /// Inclusive reporting window start, `YYYY-MM-DD`
    pub start_date: Option<String>,

    /// Inclusive reporting window end, `YYYY-MM-DD`
    pub end_date: Option<String>,

    /// Shift obligations per year level
    #[serde(default)]
    pub obligations: ObligationConfig,
}

impl ReportConfig {
    fn validate(&self) -> Result<(), String> {
        let start = parse_date("report.start_date", self.start_date.as_deref())?;
        let end = parse_date("report.end_date", self.end_date.as_deref())?;
        if let (Some(start), Some(end)) = (start, end) {
            if start > end {
                return Err(format!(
                    "report.start_date {start} is after report.end_date {end}"
                ));
            }
        }
        for (name, obligation) in [
            ("year1", self.obligations.year1),
            ("year2", self.obligations.year2),
            ("year3", self.obligations.year3),
        ] {
            if let Some(value) = obligation {
                if value <= 0 {
                    return Err(format!(
                        "report.obligations.{name} must be positive, got {value}"
                    ));
                }
            }
        }
        Ok(())
    }

    /// The configured date window
    ///
    /// # Errors
    ///
    /// Returns an error if a date does not parse as `YYYY-MM-DD`.
    pub fn window(&self) -> Result<DateWindow, String> {
        Ok(DateWindow {
            start: parse_date("report.start_date", self.start_date.as_deref())?,
            end: parse_date("report.end_date", self.end_date.as_deref())?,
        })
    }

    /// Report options from this section, with CLI overrides applied upstream
    pub fn to_options(&self) -> Result<ReportOptions, String> {
        Ok(ReportOptions {
            obligations: self.obligations.clone(),
            location: self.location_name.clone(),
            window: self.window()?,
        })
    }
}

fn parse_date(field: &str, value: Option<&str>) -> Result<Option<NaiveDate>, String> {
    match value {
        None => Ok(None),
        Some(raw) => NaiveDate::parse_from_str(raw, DATE_FORMAT)
            .map(Some)
            .map_err(|e| format!("{field} '{raw}' is not a valid YYYY-MM-DD date: {e}")),
    }
}

/// Enrolment roster import configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RosterConfig {
    /// Path to the enrolment roster CSV export
    pub import_csv: Option<PathBuf>,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Write JSON log files alongside console output
    #[serde(default = "default_local_enabled")]
    pub local_enabled: bool,

    /// Directory for local log files
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Rotation policy: daily, hourly, or never
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: default_local_enabled(),
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }
        Ok(())
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_timeout_seconds() -> u64 {
    20
}

fn default_local_enabled() -> bool {
    false
}

fn default_local_path() -> String {
    "./logs".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::secret_string;

    fn valid_config() -> RollcallConfig {
        RollcallConfig {
            application: ApplicationConfig::default(),
            api: ApiConfig {
                endpoint: "https://acme.au.deputy.com/api/v1/".to_string(),
                token: secret_string("token".to_string()),
                timeout_seconds: 20,
            },
            report: ReportConfig::default(),
            roster: RosterConfig::default(),
            logging: LoggingConfig::default(),
        }
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn test_bad_log_level_rejected() {
        let mut config = valid_config();
        config.application.log_level = "verbose".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_non_http_endpoint_rejected() {
        let mut config = valid_config();
        config.api.endpoint = "acme.au.deputy.com".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_token_rejected() {
        let mut config = valid_config();
        config.api.token = secret_string(String::new());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_inverted_date_window_rejected() {
        let mut config = valid_config();
        config.report.start_date = Some("2025-06-30".to_string());
        config.report.end_date = Some("2025-01-01".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unparseable_date_rejected() {
        let mut config = valid_config();
        config.report.start_date = Some("30/06/2025".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_nonpositive_obligation_rejected() {
        let mut config = valid_config();
        config.report.obligations.year2 = Some(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_window_parses_dates() {
        let mut config = valid_config();
        config.report.start_date = Some("2025-01-01".to_string());
        let window = config.report.window().unwrap();
        assert_eq!(
            window.start,
            Some(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap())
        );
        assert_eq!(window.end, None);
    }

    #[test]
    fn test_obligation_lookup() {
        let obligations = ObligationConfig {
            year1: Some(2),
            year2: None,
            year3: Some(6),
        };
        assert_eq!(obligations.for_year(YearLevel::Year1), Some(2));
        assert_eq!(obligations.for_year(YearLevel::Year2), None);
        assert_eq!(obligations.for_year(YearLevel::Year3), Some(6));
    }
}
