// rollcall - Deputy roster compliance reporting
// Licensed under the MIT License

//! # rollcall - Deputy roster compliance reporting
//!
//! rollcall is a reporting and administration tool for organisations that
//! track bursary students' shift obligations through the
//! [Deputy](https://www.deputy.com/) rostering platform. It fetches
//! employees, training records, and rosters over Deputy's REST API,
//! tallies shifts per student, and produces a compliance report against
//! per-year-level obligations. It can also synchronise Deputy records
//! with the enrolment roster exported from student administration.
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Business logic (aggregation, year levels, reporting, sync)
//! - [`adapters`] - Deputy API transport, query building, pagination
//! - [`roster`] - Enrolment roster CSV ingestion
//! - [`domain`] - Core domain types and errors
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use rollcall::adapters::deputy::{Credentials, DeputyClient, HttpTransport};
//! use rollcall::config::load_config;
//! use rollcall::core::report::{ReportBuilder, ReportOptions};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("rollcall.toml")?;
//!     let credentials = Credentials::new(
//!         config.api.endpoint.clone(),
//!         config.api.token.clone(),
//!         Duration::from_secs(config.api.timeout_seconds),
//!     );
//!     let transport = HttpTransport::new(&credentials)?;
//!     let client = DeputyClient::new(Arc::new(transport));
//!
//!     let options = config.report.to_options()?;
//!     let report = ReportBuilder::new(&client).build(&options).await?;
//!     for row in &report.rows {
//!         println!("{} {} {}", row.name, row.percent_completed, row.issues);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! All fallible operations return [`domain::RollcallError`]; API failures
//! carry the failing path and a classification
//! ([`domain::errors::ApiError`]) covering timeouts, network faults,
//! unexpected redirects, and HTTP status errors.
//!
//! ## Logging
//!
//! rollcall logs through the `tracing` crate. Console output goes to
//! stderr so report data on stdout can be piped; an optional JSON file
//! layer is configured through `[logging]`.

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
pub mod roster;
