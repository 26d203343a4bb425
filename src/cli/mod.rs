//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for rollcall using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// rollcall - Deputy roster compliance reporting
#[derive(Parser, Debug)]
#[command(name = "rollcall")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "rollcall.toml", env = "ROLLCALL_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "ROLLCALL_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build the student roster compliance report
    Report(commands::report::ReportArgs),

    /// List bursary students and their year levels
    List(commands::list::ListArgs),

    /// Synchronise Deputy records with the enrolment roster
    Sync(commands::sync::SyncArgs),

    /// Call an arbitrary API path and print the JSON response
    Api(commands::query::ApiArgs),

    /// Fetch every record of a resource and print them as JSON
    Resource(commands::query::ResourceArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_report() {
        let cli = Cli::parse_from(["rollcall", "report"]);
        assert_eq!(cli.config, "rollcall.toml");
        assert!(matches!(cli.command, Commands::Report(_)));
    }

    #[test]
    fn test_cli_parse_with_config() {
        let cli = Cli::parse_from(["rollcall", "--config", "custom.toml", "list"]);
        assert_eq!(cli.config, "custom.toml");
        assert!(matches!(cli.command, Commands::List(_)));
    }

    #[test]
    fn test_cli_parse_with_log_level() {
        let cli = Cli::parse_from(["rollcall", "--log-level", "debug", "report"]);
        assert_eq!(cli.log_level, Some("debug".to_string()));
    }

    #[test]
    fn test_cli_parse_report_csv() {
        let cli = Cli::parse_from(["rollcall", "report", "--csv"]);
        let Commands::Report(args) = cli.command else {
            panic!("expected report command");
        };
        assert!(args.csv);
    }

    #[test]
    fn test_cli_parse_sync_archive_all() {
        let cli = Cli::parse_from(["rollcall", "sync", "archive", "--all"]);
        let Commands::Sync(args) = cli.command else {
            panic!("expected sync command");
        };
        assert!(matches!(
            args.operation,
            commands::sync::SyncOperation::Archive { all: true }
        ));
    }

    #[test]
    fn test_cli_parse_api() {
        let cli = Cli::parse_from(["rollcall", "api", "me"]);
        let Commands::Api(args) = cli.command else {
            panic!("expected api command");
        };
        assert_eq!(args.path, "me");
    }

    #[test]
    fn test_cli_parse_resource_with_window() {
        let cli = Cli::parse_from([
            "rollcall",
            "resource",
            "Roster",
            "--start-date",
            "2025-01-01",
        ]);
        let Commands::Resource(args) = cli.command else {
            panic!("expected resource command");
        };
        assert_eq!(args.name, "Roster");
        assert_eq!(args.start_date.as_deref(), Some("2025-01-01"));
    }

    #[test]
    fn test_cli_parse_validate_config() {
        let cli = Cli::parse_from(["rollcall", "validate-config"]);
        assert!(matches!(cli.command, Commands::ValidateConfig(_)));
    }

    #[test]
    fn test_cli_parse_init() {
        let cli = Cli::parse_from(["rollcall", "init"]);
        assert!(matches!(cli.command, Commands::Init(_)));
    }
}
