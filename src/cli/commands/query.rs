//! Raw API diagnostics: the `api` and `resource` commands
//!
//! Thin wrappers for poking at the vendor API from the shell. `api` issues
//! a single call to an arbitrary path; `resource` runs the paginated fetch
//! for one resource collection. Both print pretty JSON to stdout.

use crate::cli::commands::{build_client, exit_code_for};
use crate::config::load_config;
use crate::core::report::DateWindow;
use crate::adapters::deputy::{FetchRequest, Method};
use chrono::NaiveDate;
use clap::Args;
use serde_json::Value;
use tokio::sync::watch;

/// Arguments for the api command
#[derive(Args, Debug)]
pub struct ApiArgs {
    /// API path relative to the endpoint, e.g. `me` or `resource/Employee/1`
    pub path: String,

    /// HTTP method
    #[arg(long, default_value = "get")]
    pub method: String,

    /// JSON request body
    #[arg(long)]
    pub body: Option<String>,

    /// Request extended record metadata
    #[arg(long)]
    pub extended_meta: bool,
}

impl ApiArgs {
    /// Execute the api command
    pub async fn execute(
        &self,
        config_path: &str,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error: {e}");
                return Ok(2);
            }
        };

        let method = match self.method.to_lowercase().as_str() {
            "get" => Method::Get,
            "post" => Method::Post,
            "put" => Method::Put,
            "delete" => Method::Delete,
            other => {
                eprintln!("Error: unsupported method '{other}'. Use get, post, put or delete.");
                return Ok(2);
            }
        };

        let body: Option<Value> = match &self.body {
            None => None,
            Some(raw) => match serde_json::from_str(raw) {
                Ok(value) => Some(value),
                Err(e) => {
                    eprintln!("Error: request body is not valid JSON: {e}");
                    return Ok(2);
                }
            },
        };

        let client = build_client(&config, shutdown_signal)?;
        match client
            .api(&self.path, method, body.as_ref(), self.extended_meta)
            .await
        {
            Ok(response) => {
                println!("{}", serde_json::to_string_pretty(&response)?);
                Ok(0)
            }
            Err(e) => {
                tracing::error!(error = %e, path = %self.path, "API call failed");
                eprintln!("Error: {e}");
                Ok(exit_code_for(&e))
            }
        }
    }
}

/// Arguments for the resource command
#[derive(Args, Debug)]
pub struct ResourceArgs {
    /// Resource name, e.g. `Employee` or `Roster`
    pub name: String,

    /// Join these related objects (repeatable)
    #[arg(long)]
    pub join: Vec<String>,

    /// Only records dated on or after this day (YYYY-MM-DD)
    #[arg(long)]
    pub start_date: Option<String>,

    /// Only records dated on or before this day (YYYY-MM-DD)
    #[arg(long)]
    pub end_date: Option<String>,
}

impl ResourceArgs {
    /// Execute the resource command
    pub async fn execute(
        &self,
        config_path: &str,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error: {e}");
                return Ok(2);
            }
        };

        let window = match self.window() {
            Ok(window) => window,
            Err(e) => {
                eprintln!("Error: {e}");
                return Ok(2);
            }
        };

        let mut request = FetchRequest::new(&self.name);
        for join in &self.join {
            request = request.join(join.as_str());
        }
        request = window.apply(request);

        let client = build_client(&config, shutdown_signal)?;
        match client.fetch_all(&request).await {
            Ok(records) => {
                let values: Vec<_> = records.values().map(|r| r.as_json()).collect();
                println!("{}", serde_json::to_string_pretty(&values)?);
                eprintln!("{} records", records.len());
                Ok(0)
            }
            Err(e) => {
                tracing::error!(error = %e, resource = %self.name, "Resource fetch failed");
                eprintln!("Error: {e}");
                Ok(exit_code_for(&e))
            }
        }
    }

    fn window(&self) -> Result<DateWindow, String> {
        Ok(DateWindow {
            start: parse_date(self.start_date.as_deref())?,
            end: parse_date(self.end_date.as_deref())?,
        })
    }
}

fn parse_date(value: Option<&str>) -> Result<Option<NaiveDate>, String> {
    match value {
        None => Ok(None),
        Some(raw) => NaiveDate::parse_from_str(raw, crate::core::report::DATE_FORMAT)
            .map(Some)
            .map_err(|e| format!("'{raw}' is not a valid YYYY-MM-DD date: {e}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date(None).unwrap(), None);
        assert_eq!(
            parse_date(Some("2025-03-01")).unwrap(),
            NaiveDate::from_ymd_opt(2025, 3, 1)
        );
        assert!(parse_date(Some("01/03/2025")).is_err());
    }
}
