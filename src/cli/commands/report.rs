//! Report command implementation
//!
//! Builds the roster compliance report and prints it as a table or CSV.
//! Report data goes to stdout; progress and diagnostics go to stderr via
//! tracing, so the output can be piped or redirected cleanly.

use crate::cli::commands::{build_client, exit_code_for};
use crate::config::load_config;
use crate::core::report::{ReportBuilder, StudentReport};
use clap::Args;
use tokio::sync::watch;

/// Arguments for the report command
#[derive(Args, Debug)]
pub struct ReportArgs {
    /// Emit CSV instead of a table
    #[arg(long)]
    pub csv: bool,

    /// Override the configured location filter
    #[arg(long)]
    pub location: Option<String>,

    /// Override the configured window start (YYYY-MM-DD)
    #[arg(long)]
    pub start_date: Option<String>,

    /// Override the configured window end (YYYY-MM-DD)
    #[arg(long)]
    pub end_date: Option<String>,
}

impl ReportArgs {
    /// Execute the report command
    pub async fn execute(
        &self,
        config_path: &str,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        tracing::info!("Starting report command");

        let mut config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load configuration");
                eprintln!("Error: {e}");
                return Ok(2);
            }
        };

        // Apply CLI overrides
        if let Some(location) = &self.location {
            config.report.location_name = Some(location.clone());
        }
        if let Some(start) = &self.start_date {
            config.report.start_date = Some(start.clone());
        }
        if let Some(end) = &self.end_date {
            config.report.end_date = Some(end.clone());
        }

        let options = match config.report.to_options() {
            Ok(options) => options,
            Err(e) => {
                eprintln!("Error: {e}");
                return Ok(2);
            }
        };

        let client = build_client(&config, shutdown_signal)?;
        let report = match ReportBuilder::new(&client).build(&options).await {
            Ok(report) => report,
            Err(e) => {
                tracing::error!(error = %e, "Report build failed");
                eprintln!("Error: {e}");
                return Ok(exit_code_for(&e));
            }
        };

        if self.csv {
            write_csv(&report)?;
        } else {
            print_table(&report);
        }

        Ok(0)
    }
}

const HEADER: [&str; 9] = [
    "Name",
    "Year",
    "Obligation",
    "Rostered",
    "Open",
    "Completed",
    "% Rostered",
    "% Completed",
    "Issues",
];

fn write_csv(report: &StudentReport) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_writer(std::io::stdout());
    writer.write_record(HEADER)?;
    for row in &report.rows {
        writer.write_record([
            row.name.as_str(),
            row.year.title(),
            &row.obligation.to_string(),
            &row.rostered.to_string(),
            &row.open.to_string(),
            &row.completed.to_string(),
            &row.percent_rostered,
            &row.percent_completed,
            &row.issues,
        ])?;
    }
    writer.flush()?;

    // summary goes to stderr so the CSV on stdout stays machine-readable
    for total in &report.summary.totals {
        eprintln!("{}: {}", total.title, total.total);
    }
    eprintln!("Bursary students: {}", report.summary.bursary_students);
    eprintln!(
        "Students with rosters: {}",
        report.summary.students_with_rosters
    );
    Ok(())
}

fn print_table(report: &StudentReport) {
    let name_width = report
        .rows
        .iter()
        .map(|r| r.name.len())
        .chain(std::iter::once("Name".len()))
        .max()
        .unwrap_or(4);

    println!(
        "{:<name_width$}  {:<6}  {:>10}  {:>8}  {:>4}  {:>9}  {:>10}  {:>11}  Issues",
        "Name", "Year", "Obligation", "Rostered", "Open", "Completed", "% Rostered", "% Completed",
    );
    for row in &report.rows {
        println!(
            "{:<name_width$}  {:<6}  {:>10}  {:>8}  {:>4}  {:>9}  {:>10}  {:>11}  {}",
            row.name,
            row.year.title(),
            row.obligation,
            row.rostered,
            row.open,
            row.completed,
            row.percent_rostered,
            row.percent_completed,
            row.issues,
        );
    }

    println!();
    println!("Summary:");
    for total in &report.summary.totals {
        println!("  {}: {}", total.title, total.total);
    }
    println!("  Bursary students: {}", report.summary.bursary_students);
    println!(
        "  Students with rosters: {}",
        report.summary.students_with_rosters
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_args_defaults() {
        let args = ReportArgs {
            csv: false,
            location: None,
            start_date: None,
            end_date: None,
        };

        assert!(!args.csv);
        assert!(args.location.is_none());
    }
}
