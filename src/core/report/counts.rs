//! Roster counting
//!
//! Tallies rostered/completed/open shifts per employee from the Roster
//! resource, within an inclusive date window and optionally narrowed to one
//! location.

use crate::adapters::deputy::{Comparison, DeputyClient, FetchRequest, Predicate};
use crate::core::aggregate::{Aggregator, CounterSpec};
use crate::domain::{RecordKey, ResourceSet, Result};
use chrono::NaiveDate;
use serde_json::Value;
use std::fmt;

/// Deputy's date format for search predicates
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Per-student roster tallies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RosterCounter {
    /// Every roster entry for the employee
    Rostered,
    /// Entries with a linked timesheet (id present and positive)
    Completed,
    /// Entries flagged open
    Open,
}

impl fmt::Display for RosterCounter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RosterCounter::Rostered => "rostered",
            RosterCounter::Completed => "completed",
            RosterCounter::Open => "open",
        };
        write!(f, "{name}")
    }
}

/// An inclusive date window for date-filtered resources
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateWindow {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateWindow {
    /// Add `Date ge start` / `Date le end` predicates for the configured
    /// bounds. An absent bound leaves that side of the window unbounded.
    pub fn apply(&self, mut request: FetchRequest) -> FetchRequest {
        if let Some(start) = self.start {
            request = request.filter(Predicate::new(
                "Date",
                Comparison::Ge,
                start.format(DATE_FORMAT).to_string(),
            ));
        }
        if let Some(end) = self.end {
            request = request.filter(Predicate::new(
                "Date",
                Comparison::Le,
                end.format(DATE_FORMAT).to_string(),
            ));
        }
        request
    }
}

/// Fetch roster entries in `window` and tally them per employee
///
/// Entries for employee 0 are excluded vendor-side. Rosters for every
/// location are fetched; the location filter (when given) is applied
/// client-side against the joined operational unit's company name.
pub async fn fetch_roster_counts(
    client: &DeputyClient,
    location: Option<&str>,
    window: DateWindow,
) -> Result<Aggregator<RecordKey, RosterCounter>> {
    let request = window.apply(
        FetchRequest::new("Roster")
            .join("OperationalUnitObject")
            .filter(Predicate::new("Employee", Comparison::Ne, 0)),
    );
    let rosters = client.fetch_all(&request).await?;
    tracing::info!(rosters = rosters.len(), "Fetched rosters (all locations)");
    count_rosters(&rosters, location)
}

/// Tally an already-fetched roster set
pub fn count_rosters(
    rosters: &ResourceSet,
    location: Option<&str>,
) -> Result<Aggregator<RecordKey, RosterCounter>> {
    let mut students = Aggregator::new();
    students.register(CounterSpec::new(RosterCounter::Rostered, "Rosters Rostered"));
    students.register(CounterSpec::new(RosterCounter::Completed, "Rosters Completed"));
    students.register(CounterSpec::new(RosterCounter::Open, "Rosters Open"));

    for (_, roster) in rosters.iter() {
        if let Some(location) = location {
            let company = roster.nested_str("OperationalUnitObject", "CompanyName", "Roster")?;
            if company != location {
                continue;
            }
        }
        let employee = RecordKey::Id(roster.int_field("Employee", "Roster")?);
        // a missing or null timesheet link means the shift was not completed
        let timesheet = roster
            .field("MatchedByTimesheet")
            .and_then(Value::as_i64)
            .unwrap_or(0);
        let open = roster.bool_field("Open", "Roster")?;

        students.count(employee.clone(), RosterCounter::Rostered, None)?;
        if timesheet > 0 {
            students.count(employee.clone(), RosterCounter::Completed, None)?;
        }
        if open {
            students.count(employee, RosterCounter::Open, None)?;
        }
    }
    Ok(students)
}
