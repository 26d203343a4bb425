//! Sync command implementation
//!
//! Synchronises Deputy employee and training records with the enrolment
//! roster CSV: assigning year levels, archiving students who left, and
//! reinstating ones who returned.

use crate::cli::commands::{build_client, exit_code_for};
use crate::config::load_config;
use crate::core::sync::{archive_missing, assign_year_levels, reinstate_returning, SyncOutcome};
use crate::roster::load_roster;
use clap::{Args, Subcommand};
use std::path::PathBuf;
use tokio::sync::watch;

/// Arguments for the sync command
#[derive(Args, Debug)]
pub struct SyncArgs {
    /// Path to the roster CSV (overrides roster.import_csv from config)
    #[arg(long)]
    pub roster: Option<PathBuf>,

    #[command(subcommand)]
    pub operation: SyncOperation,
}

/// Sync operations
#[derive(Subcommand, Debug)]
pub enum SyncOperation {
    /// Create or correct year-level training records from the roster
    AssignYears,

    /// Deactivate students that no longer appear on the roster
    Archive {
        /// Archive every year-level holder regardless of roster membership
        #[arg(long)]
        all: bool,
    },

    /// Reactivate archived employees that are back on the roster
    Reinstate,
}

impl SyncArgs {
    /// Execute the sync command
    pub async fn execute(
        &self,
        config_path: &str,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        tracing::info!("Starting sync command");

        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load configuration");
                eprintln!("Error: {e}");
                return Ok(2);
            }
        };

        let roster_path = match self.roster.clone().or(config.roster.import_csv.clone()) {
            Some(path) => path,
            None => {
                eprintln!(
                    "Error: no roster CSV configured. Set roster.import_csv or pass --roster."
                );
                return Ok(2);
            }
        };
        let roster = match load_roster(&roster_path) {
            Ok(roster) => roster,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load roster");
                eprintln!("Error: {e}");
                return Ok(exit_code_for(&e));
            }
        };

        let client = build_client(&config, shutdown_signal)?;
        let result = match &self.operation {
            SyncOperation::AssignYears => assign_year_levels(&client, &roster).await,
            SyncOperation::Archive { all } => archive_missing(&client, &roster, *all).await,
            SyncOperation::Reinstate => reinstate_returning(&client, &roster).await,
        };

        match result {
            Ok(outcome) => {
                print_outcome(&outcome);
                Ok(0)
            }
            Err(e) => {
                tracing::error!(error = %e, "Sync failed");
                eprintln!("Error: {e}");
                Ok(exit_code_for(&e))
            }
        }
    }
}

fn print_outcome(outcome: &SyncOutcome) {
    for message in &outcome.messages {
        println!("{message}");
    }
    if !outcome.messages.is_empty() {
        println!();
    }
    for total in &outcome.counts {
        println!("{}: {}", total.title, total.total);
    }
}
