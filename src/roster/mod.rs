//! Enrolment roster ingestion
//!
//! The administration office exports the authoritative student roster as
//! CSV. Sync operations treat this file as the source of truth for who
//! should be active and at which year level.

use crate::domain::{Result, RollcallError, YearLevel};
use serde::Deserialize;
use std::path::Path;

/// One row of the enrolment roster export
#[derive(Debug, Clone, Deserialize)]
pub struct RosterRecord {
    #[serde(rename = "FirstName")]
    pub first_name: String,
    #[serde(rename = "LastName")]
    pub last_name: String,
    #[serde(rename = "StudentId")]
    pub student_id: String,
    #[serde(rename = "Email")]
    pub email: String,
    #[serde(rename = "Year")]
    pub year: String,
    #[serde(rename = "Mobile", default)]
    pub mobile: String,
}

impl RosterRecord {
    /// The record's year level, if the `Year` column names one
    pub fn year_level(&self) -> Option<YearLevel> {
        self.year.trim().parse().ok()
    }

    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Load the enrolment roster from a CSV export
///
/// # Errors
///
/// Fails when the file cannot be opened or a row does not match the
/// expected columns.
pub fn load_roster(path: &Path) -> Result<Vec<RosterRecord>> {
    let mut reader = csv::Reader::from_path(path).map_err(|e| {
        RollcallError::Roster(format!("Failed to open roster {}: {e}", path.display()))
    })?;

    let mut records = Vec::new();
    for row in reader.deserialize() {
        let record: RosterRecord = row.map_err(|e| {
            RollcallError::Roster(format!("Invalid roster row in {}: {e}", path.display()))
        })?;
        records.push(record);
    }

    tracing::info!(rows = records.len(), path = %path.display(), "Loaded enrolment roster");
    Ok(records)
}
