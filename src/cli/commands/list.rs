//! List command implementation
//!
//! Prints the bursary student list with year levels and emails.

use crate::cli::commands::{build_client, exit_code_for};
use crate::config::load_config;
use crate::core::report::ReportBuilder;
use clap::Args;
use tokio::sync::watch;

/// Arguments for the list command
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Emit CSV instead of a table
    #[arg(long)]
    pub csv: bool,
}

impl ListArgs {
    /// Execute the list command
    pub async fn execute(
        &self,
        config_path: &str,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        tracing::info!("Starting list command");

        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load configuration");
                eprintln!("Error: {e}");
                return Ok(2);
            }
        };

        let client = build_client(&config, shutdown_signal)?;
        let bursary = match ReportBuilder::new(&client).bursary_students().await {
            Ok(bursary) => bursary,
            Err(e) => {
                tracing::error!(error = %e, "Failed to fetch student list");
                eprintln!("Error: {e}");
                return Ok(exit_code_for(&e));
            }
        };

        if self.csv {
            let mut writer = csv::Writer::from_writer(std::io::stdout());
            writer.write_record(["Name", "Year", "Email"])?;
            for student in &bursary.students {
                writer.write_record([
                    student.name.as_str(),
                    student.year.title(),
                    student.email.as_str(),
                ])?;
            }
            writer.flush()?;
        } else {
            for student in &bursary.students {
                println!(
                    "{}  {}  <{}>",
                    student.name,
                    student.year.title(),
                    student.email
                );
            }
            println!();
            println!(
                "{} bursary students ({} active employees, {} without a year level)",
                bursary.students.len(),
                bursary.active_employees,
                bursary.without_year
            );
        }

        Ok(0)
    }
}
