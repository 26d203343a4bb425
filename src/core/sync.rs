//! Roster-driven record synchronisation
//!
//! Brings the vendor's employee and training records in line with the
//! enrolment roster: assigning year-level training records, archiving
//! employees who left, and reinstating ones who returned. Every mutation
//! is logged; a run's net effect is summarised in a [`SyncOutcome`].

use crate::adapters::deputy::{DeputyClient, Method};
use crate::core::aggregate::{Aggregator, CounterSpec, CounterTotal};
use crate::core::years::{StudentYears, YearDirectory};
use crate::domain::{RecordKey, Result, RollcallError, YearLevel};
use crate::roster::RosterRecord;
use serde_json::json;
use std::collections::HashSet;
use std::fmt;

/// Wire format for TrainingDate, local time with microseconds
const TRAINING_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

/// Tallies for one sync run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SyncCounter {
    /// Year-level record created for a student that had none
    Assigned,
    /// Wrong-year record replaced
    Reassigned,
    /// Year level already correct
    Unchanged,
    /// Roster row with no matching active employee
    MissingEmployee,
    /// Roster row without a recognised year level
    Skipped,
    /// Employee deactivated
    Archived,
    /// Employee reactivated
    Reinstated,
}

impl fmt::Display for SyncCounter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SyncCounter::Assigned => "assigned",
            SyncCounter::Reassigned => "reassigned",
            SyncCounter::Unchanged => "unchanged",
            SyncCounter::MissingEmployee => "missing_employee",
            SyncCounter::Skipped => "skipped",
            SyncCounter::Archived => "archived",
            SyncCounter::Reinstated => "reinstated",
        };
        f.write_str(name)
    }
}

/// What a sync run did, as human-readable messages plus counter totals
#[derive(Debug, Clone)]
pub struct SyncOutcome {
    pub messages: Vec<String>,
    pub counts: Vec<CounterTotal<SyncCounter>>,
}

struct SyncTally {
    counters: Aggregator<(), SyncCounter>,
    messages: Vec<String>,
}

impl SyncTally {
    fn new(specs: &[(SyncCounter, &str)]) -> Self {
        let mut counters = Aggregator::new();
        for (id, title) in specs {
            counters.register(CounterSpec::new(*id, *title));
        }
        Self {
            counters,
            messages: Vec::new(),
        }
    }

    fn bump(&mut self, id: SyncCounter) -> Result<()> {
        self.counters.count((), id, None)?;
        Ok(())
    }

    fn note(&mut self, message: String) {
        self.messages.push(message);
    }

    fn finish(self) -> SyncOutcome {
        SyncOutcome {
            messages: self.messages,
            counts: self.counters.totals(),
        }
    }
}

/// Create or correct year-level training records from the roster
///
/// For each roster row with a recognised year level, the matching active
/// employee (by email) gets exactly one year-level training record. A
/// record for the wrong year is deleted and replaced; a correct one is
/// left alone.
pub async fn assign_year_levels(
    client: &DeputyClient,
    roster: &[RosterRecord],
) -> Result<SyncOutcome> {
    let by_email = client.employees_by_email().await?;
    let directory = YearDirectory::load(client).await?;
    let years = StudentYears::load(client, &directory).await?;

    let mut tally = SyncTally::new(&[
        (SyncCounter::Assigned, "Year levels assigned"),
        (SyncCounter::Reassigned, "Year levels corrected"),
        (SyncCounter::Unchanged, "Already correct"),
        (SyncCounter::MissingEmployee, "Not found in Deputy"),
        (SyncCounter::Skipped, "Rows without a year level"),
    ]);

    for row in roster {
        let Some(year) = row.year_level() else {
            tally.bump(SyncCounter::Skipped)?;
            tally.note(format!(
                "Skipped {} ({}): no year level in roster",
                row.display_name(),
                row.year.trim()
            ));
            continue;
        };
        let Some(employee) = by_email.get(&RecordKey::from(row.email.as_str())) else {
            tally.bump(SyncCounter::MissingEmployee)?;
            tally.note(format!(
                "No active employee for {} <{}>",
                row.display_name(),
                row.email
            ));
            continue;
        };
        let employee_id = employee.int_field("Id", "Employee")?;

        match years.get(employee_id) {
            Some(assignment) if assignment.year == year => {
                tally.bump(SyncCounter::Unchanged)?;
            }
            Some(assignment) => {
                client
                    .api(
                        &format!("resource/TrainingRecord/{}", assignment.training_record_id),
                        Method::Delete,
                        None,
                        false,
                    )
                    .await?;
                create_training_record(client, &directory, employee_id, year).await?;
                tracing::info!(
                    student = %row.display_name(),
                    from = %assignment.year,
                    to = %year,
                    "Corrected year level"
                );
                tally.bump(SyncCounter::Reassigned)?;
                tally.note(format!(
                    "Moved {} from {} to {}",
                    row.display_name(),
                    assignment.year,
                    year
                ));
            }
            None => {
                create_training_record(client, &directory, employee_id, year).await?;
                tracing::info!(student = %row.display_name(), %year, "Assigned year level");
                tally.bump(SyncCounter::Assigned)?;
                tally.note(format!("Assigned {} to {}", row.display_name(), year));
            }
        }
    }

    Ok(tally.finish())
}

async fn create_training_record(
    client: &DeputyClient,
    directory: &YearDirectory,
    employee_id: i64,
    year: YearLevel,
) -> Result<()> {
    let module_id = directory.module_id(year).ok_or_else(|| {
        RollcallError::Configuration(format!("No training module found for {year}"))
    })?;
    let body = json!({
        "Employee": employee_id,
        "Module": module_id,
        "TrainingDate": chrono::Local::now().naive_local().format(TRAINING_DATE_FORMAT).to_string(),
        "Active": true,
    });
    client
        .api("resource/TrainingRecord", Method::Post, Some(&body), false)
        .await?;
    Ok(())
}

/// Deactivate students that no longer appear on the roster
///
/// Only employees holding a year-level training record are ever touched.
/// By default the ones still on the roster are kept; with `ignore_roster`
/// set every year-level holder is archived, which is the end-of-year
/// reset before a fresh intake.
pub async fn archive_missing(
    client: &DeputyClient,
    roster: &[RosterRecord],
    ignore_roster: bool,
) -> Result<SyncOutcome> {
    let by_email = client.employees_by_email().await?;
    let directory = YearDirectory::load(client).await?;
    let years = StudentYears::load(client, &directory).await?;
    let roster_emails: HashSet<&str> = roster.iter().map(|r| r.email.as_str()).collect();

    let mut tally = SyncTally::new(&[(SyncCounter::Archived, "Employees archived")]);

    for (key, employee) in by_email.iter() {
        let employee_id = employee.int_field("Id", "Employee")?;
        if !years.contains(employee_id) {
            continue;
        }
        let email = key.to_string();
        if !ignore_roster && roster_emails.contains(email.as_str()) {
            continue;
        }
        let name = employee.str_field("DisplayName", "Employee")?.to_string();
        client
            .api(
                &format!("resource/Employee/{employee_id}"),
                Method::Post,
                Some(&json!({"Active": false})),
                false,
            )
            .await?;
        tracing::info!(student = %name, email, "Archived employee off the roster");
        tally.bump(SyncCounter::Archived)?;
        tally.note(format!("Archived {name} <{email}>"));
    }

    Ok(tally.finish())
}

/// Reactivate previously archived students that are back on the roster
///
/// Only discarded employees holding a year-level training record are
/// reinstated; other archived staff sharing a roster email are left alone.
pub async fn reinstate_returning(
    client: &DeputyClient,
    roster: &[RosterRecord],
) -> Result<SyncOutcome> {
    let discarded = client.discarded_employees_by_email().await?;
    let directory = YearDirectory::load(client).await?;
    let years = StudentYears::load(client, &directory).await?;

    let mut tally = SyncTally::new(&[(SyncCounter::Reinstated, "Employees reinstated")]);

    for row in roster {
        let Some(employee) = discarded.get(&RecordKey::from(row.email.as_str())) else {
            continue;
        };
        let employee_id = employee.int_field("Id", "Employee")?;
        if !years.contains(employee_id) {
            continue;
        }
        client
            .api(
                &format!("resource/Employee/{employee_id}"),
                Method::Post,
                Some(&json!({"Active": true})),
                false,
            )
            .await?;
        tracing::info!(student = %row.display_name(), email = %row.email, "Reinstated employee");
        tally.bump(SyncCounter::Reinstated)?;
        tally.note(format!("Reinstated {} <{}>", row.display_name(), row.email));
    }

    Ok(tally.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::deputy::transport::Transport;
    use crate::domain::errors::ApiError;
    use async_trait::async_trait;
    use serde_json::Value;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    /// Serves canned QUERY pages and records every mutating call
    struct RecordingTransport {
        routes: HashMap<&'static str, Value>,
        calls: Mutex<Vec<(String, Method, Option<Value>)>>,
    }

    impl RecordingTransport {
        fn new(routes: HashMap<&'static str, Value>) -> Self {
            Self {
                routes,
                calls: Mutex::new(Vec::new()),
            }
        }

        fn mutations(&self) -> Vec<(String, Method, Option<Value>)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Transport for RecordingTransport {
        async fn call(
            &self,
            path: &str,
            method: Method,
            body: Option<&Value>,
            _extended_meta: bool,
        ) -> std::result::Result<Value, ApiError> {
            if let Some(page) = self.routes.get(path) {
                return Ok(page.clone());
            }
            self.calls
                .lock()
                .unwrap()
                .push((path.to_string(), method, body.cloned()));
            Ok(json!({}))
        }
    }

    fn routes() -> HashMap<&'static str, Value> {
        let mut routes = HashMap::new();
        routes.insert(
            "resource/Employee/QUERY",
            json!([
                {"Id": 1, "DisplayName": "Ada Able", "ContactObject": {"Email": "ada@example.edu"}},
                {"Id": 2, "DisplayName": "Ben Baker", "ContactObject": {"Email": "ben@example.edu"}},
            ]),
        );
        routes.insert(
            "resource/TrainingModule/QUERY",
            json!([
                {"Id": 4, "Title": "Year1"},
                {"Id": 6, "Title": "Year2"},
            ]),
        );
        routes.insert(
            "resource/TrainingRecord/QUERY",
            json!([
                {"Id": 100, "Employee": 1, "Module": 4},
            ]),
        );
        routes
    }

    fn roster_row(first: &str, last: &str, email: &str, year: &str) -> RosterRecord {
        RosterRecord {
            first_name: first.to_string(),
            last_name: last.to_string(),
            student_id: "S000".to_string(),
            email: email.to_string(),
            year: year.to_string(),
            mobile: String::new(),
        }
    }

    fn total(outcome: &SyncOutcome, id: SyncCounter) -> i64 {
        outcome
            .counts
            .iter()
            .find(|t| t.id == id)
            .map(|t| t.total)
            .unwrap_or(0)
    }

    #[tokio::test]
    async fn test_assign_creates_missing_record() {
        let transport = Arc::new(RecordingTransport::new(routes()));
        let client = DeputyClient::new(transport.clone());
        let roster = vec![roster_row("Ben", "Baker", "ben@example.edu", "Year2")];

        let outcome = assign_year_levels(&client, &roster).await.unwrap();

        assert_eq!(total(&outcome, SyncCounter::Assigned), 1);
        let mutations = transport.mutations();
        assert_eq!(mutations.len(), 1);
        let (path, method, body) = &mutations[0];
        assert_eq!(path, "resource/TrainingRecord");
        assert_eq!(*method, Method::Post);
        let body = body.as_ref().unwrap();
        assert_eq!(body["Employee"], json!(2));
        assert_eq!(body["Module"], json!(6));
        assert_eq!(body["Active"], json!(true));
        let stamp = body["TrainingDate"].as_str().unwrap();
        assert!(chrono::NaiveDateTime::parse_from_str(stamp, TRAINING_DATE_FORMAT).is_ok());
    }

    #[tokio::test]
    async fn test_assign_replaces_wrong_year() {
        let transport = Arc::new(RecordingTransport::new(routes()));
        let client = DeputyClient::new(transport.clone());
        let roster = vec![roster_row("Ada", "Able", "ada@example.edu", "Year2")];

        let outcome = assign_year_levels(&client, &roster).await.unwrap();

        assert_eq!(total(&outcome, SyncCounter::Reassigned), 1);
        let mutations = transport.mutations();
        assert_eq!(mutations.len(), 2);
        assert_eq!(mutations[0].0, "resource/TrainingRecord/100");
        assert_eq!(mutations[0].1, Method::Delete);
        assert_eq!(mutations[1].0, "resource/TrainingRecord");
        assert_eq!(mutations[1].2.as_ref().unwrap()["Module"], json!(6));
    }

    #[tokio::test]
    async fn test_assign_leaves_correct_year_alone() {
        let transport = Arc::new(RecordingTransport::new(routes()));
        let client = DeputyClient::new(transport.clone());
        let roster = vec![roster_row("Ada", "Able", "ada@example.edu", "Year1")];

        let outcome = assign_year_levels(&client, &roster).await.unwrap();

        assert_eq!(total(&outcome, SyncCounter::Unchanged), 1);
        assert!(transport.mutations().is_empty());
    }

    #[tokio::test]
    async fn test_assign_counts_unknown_rows() {
        let transport = Arc::new(RecordingTransport::new(routes()));
        let client = DeputyClient::new(transport.clone());
        let roster = vec![
            roster_row("Cal", "Cook", "cal@example.edu", "Year1"),
            roster_row("Dot", "Dale", "dot@example.edu", "Graduated"),
        ];

        let outcome = assign_year_levels(&client, &roster).await.unwrap();

        assert_eq!(total(&outcome, SyncCounter::MissingEmployee), 1);
        assert_eq!(total(&outcome, SyncCounter::Skipped), 1);
        assert!(transport.mutations().is_empty());
        assert_eq!(outcome.messages.len(), 2);
    }

    #[tokio::test]
    async fn test_archive_only_year_holders_by_default() {
        let transport = Arc::new(RecordingTransport::new(routes()));
        let client = DeputyClient::new(transport.clone());
        // neither employee is on the roster; only Ada holds a year level
        let outcome = archive_missing(&client, &[], false).await.unwrap();

        assert_eq!(total(&outcome, SyncCounter::Archived), 1);
        let mutations = transport.mutations();
        assert_eq!(mutations.len(), 1);
        assert_eq!(mutations[0].0, "resource/Employee/1");
        assert_eq!(mutations[0].2.as_ref().unwrap()["Active"], json!(false));
    }

    #[tokio::test]
    async fn test_archive_default_keeps_roster_members() {
        let transport = Arc::new(RecordingTransport::new(routes()));
        let client = DeputyClient::new(transport.clone());
        let roster = vec![roster_row("Ada", "Able", "ada@example.edu", "Year1")];

        let outcome = archive_missing(&client, &roster, false).await.unwrap();

        // Ada holds a year level but is still enrolled; Ben holds none
        assert_eq!(total(&outcome, SyncCounter::Archived), 0);
        assert!(transport.mutations().is_empty());
    }

    #[tokio::test]
    async fn test_archive_all_ignores_roster_membership() {
        let transport = Arc::new(RecordingTransport::new(routes()));
        let client = DeputyClient::new(transport.clone());
        let roster = vec![roster_row("Ada", "Able", "ada@example.edu", "Year1")];

        let outcome = archive_missing(&client, &roster, true).await.unwrap();

        // end-of-year reset: Ada is archived even though she is on the
        // roster; Ben holds no year level and is never touched
        assert_eq!(total(&outcome, SyncCounter::Archived), 1);
        let mutations = transport.mutations();
        assert_eq!(mutations.len(), 1);
        assert_eq!(mutations[0].0, "resource/Employee/1");
        assert_eq!(mutations[0].2.as_ref().unwrap()["Active"], json!(false));
    }

    #[tokio::test]
    async fn test_reinstate_matches_roster_emails() {
        let transport = Arc::new(RecordingTransport::new(routes()));
        let client = DeputyClient::new(transport.clone());
        let roster = vec![
            roster_row("Ada", "Able", "ada@example.edu", "Year1"),
            roster_row("Eve", "Egan", "eve@example.edu", "Year2"),
        ];

        // the canned Employee page serves both active and discarded queries,
        // so both employees look discarded here; only roster emails match
        let outcome = reinstate_returning(&client, &roster).await.unwrap();

        assert_eq!(total(&outcome, SyncCounter::Reinstated), 1);
        let mutations = transport.mutations();
        assert_eq!(mutations[0].0, "resource/Employee/1");
        assert_eq!(mutations[0].2.as_ref().unwrap()["Active"], json!(true));
    }

    #[tokio::test]
    async fn test_reinstate_requires_year_record() {
        let transport = Arc::new(RecordingTransport::new(routes()));
        let client = DeputyClient::new(transport.clone());
        let roster = vec![roster_row("Ben", "Baker", "ben@example.edu", "Year2")];

        // Ben is on the roster but holds no year-level training record
        let outcome = reinstate_returning(&client, &roster).await.unwrap();

        assert_eq!(total(&outcome, SyncCounter::Reinstated), 0);
        assert!(transport.mutations().is_empty());
    }
}
