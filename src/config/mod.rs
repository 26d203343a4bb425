//! Configuration management for rollcall.
//!
//! TOML-based configuration loading, parsing, and validation with support
//! for environment variable substitution (`${VAR_NAME}`), `ROLLCALL_*`
//! environment overrides, default values, and validation on load.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use rollcall::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("rollcall.toml")?;
//! println!("API endpoint: {}", config.api.endpoint);
//! # Ok(())
//! # }
//! ```
//!
//! # Example Configuration
//!
//! ```toml
//! [api]
//! endpoint = "https://acme.au.deputy.com/api/v1/"
//! token = "${DEPUTY_ACCESS_TOKEN}"
//!
//! [report]
//! location_name = "Main Campus"
//! start_date = "2025-01-01"
//! end_date = "2025-06-30"
//!
//! [report.obligations]
//! year1 = 2
//! year2 = 4
//! year3 = 6
//!
//! [roster]
//! import_csv = "./roster.csv"
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

// Re-export commonly used types
pub use loader::load_config;
pub use schema::{
    ApiConfig, ApplicationConfig, LoggingConfig, ObligationConfig, ReportConfig, RollcallConfig,
    RosterConfig,
};
pub use secret::{secret_string, SecretString, SecretValue};
