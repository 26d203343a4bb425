//! Compliance report assembly
//!
//! [`ReportBuilder`] composes the resource fetches (employees, training
//! modules and records, rosters) with the [`Aggregator`] to produce one
//! [`ReportRow`] per bursary student plus summary totals. A builder is
//! stateless between runs; every `build` starts from fresh fetches.

use crate::adapters::deputy::DeputyClient;
use crate::config::ObligationConfig;
use crate::core::aggregate::{Aggregator, CounterSpec, CounterTotal};
use crate::core::report::counts::{fetch_roster_counts, DateWindow, RosterCounter};
use crate::core::report::row::{ReportRow, ShiftCounts};
use crate::core::years::{StudentYears, YearDirectory};
use crate::domain::{RecordKey, RollcallError, Result, Student, YearLevel};
use std::fmt;

/// Summary counters for the whole report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SummaryCounter {
    /// Students in one year level
    Year(YearLevel),
    Rostered,
    Completed,
    Open,
}

impl fmt::Display for SummaryCounter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SummaryCounter::Year(year) => write!(f, "{year}"),
            SummaryCounter::Rostered => write!(f, "rostered"),
            SummaryCounter::Completed => write!(f, "completed"),
            SummaryCounter::Open => write!(f, "open"),
        }
    }
}

/// Report parameters, taken from configuration and CLI flags
#[derive(Debug, Clone, Default)]
pub struct ReportOptions {
    /// Shift obligations per year level
    pub obligations: ObligationConfig,
    /// Only count rosters at this location (company name) when set
    pub location: Option<String>,
    /// Inclusive date window for roster entries
    pub window: DateWindow,
}

/// The bursary student list plus the fetch statistics around it
#[derive(Debug, Clone)]
pub struct BursaryList {
    /// Bursary students in the employee list's sort order (by last name)
    pub students: Vec<Student>,
    /// Active employees fetched
    pub active_employees: usize,
    /// Active employees without a year-level training record
    pub without_year: usize,
}

/// Whole-report summary figures
#[derive(Debug, Clone)]
pub struct ReportSummary {
    pub bursary_students: usize,
    pub students_with_rosters: usize,
    pub totals: Vec<CounterTotal<SummaryCounter>>,
}

/// A finished compliance report
#[derive(Debug, Clone)]
pub struct StudentReport {
    /// One row per bursary student, in student-list sort order
    pub rows: Vec<ReportRow>,
    pub summary: ReportSummary,
}

/// Builds the per-student compliance report
pub struct ReportBuilder<'a> {
    client: &'a DeputyClient,
}

impl<'a> ReportBuilder<'a> {
    pub fn new(client: &'a DeputyClient) -> Self {
        Self { client }
    }

    /// The bursary student list: active employees (with contact info) that
    /// hold a year-level training record, in the employee sort order
    pub async fn bursary_students(&self) -> Result<BursaryList> {
        let employees = self.client.active_employees(&["ContactObject"]).await?;
        let directory = YearDirectory::load(self.client).await?;
        let years = StudentYears::load(self.client, &directory).await?;

        let mut students = Vec::new();
        let mut without_year = 0;
        for (key, employee) in employees.iter() {
            let employee_id = match key {
                RecordKey::Id(id) => *id,
                RecordKey::Text(_) => continue,
            };
            let Some(assignment) = years.get(employee_id) else {
                without_year += 1;
                continue;
            };
            let name = employee.str_field("DisplayName", "Employee")?.to_string();
            let email = employee
                .nested_str("ContactObject", "Email", "Employee")?
                .to_string();
            students.push(Student {
                id: key.clone(),
                name,
                year: assignment.year,
                email,
            });
        }

        tracing::info!(
            active = employees.len(),
            bursary = students.len(),
            without_year,
            "Resolved bursary student list"
        );
        Ok(BursaryList {
            students,
            active_employees: employees.len(),
            without_year,
        })
    }

    /// Produce the full compliance report
    ///
    /// # Errors
    ///
    /// Fails with [`RollcallError::MissingObligation`], naming the
    /// offending student, if any student's year level has no configured
    /// obligation. Any fetch failure aborts the whole report.
    pub async fn build(&self, options: &ReportOptions) -> Result<StudentReport> {
        let bursary = self.bursary_students().await?;
        let roster_counts = fetch_roster_counts(
            self.client,
            options.location.as_deref(),
            options.window,
        )
        .await?;

        let mut summary: Aggregator<(), SummaryCounter> = Aggregator::new();
        for year in YearLevel::ALL {
            summary.register(CounterSpec::new(
                SummaryCounter::Year(year),
                format!("Students in {}", year.title()),
            ));
        }
        summary.register(CounterSpec::new(SummaryCounter::Rostered, "Rostered"));
        summary.register(CounterSpec::new(SummaryCounter::Completed, "Completed Rosters"));
        summary.register(CounterSpec::new(SummaryCounter::Open, "Open Rosters"));

        let mut rows = Vec::with_capacity(bursary.students.len());
        for student in &bursary.students {
            let counts = ShiftCounts {
                rostered: roster_counts
                    .value(&student.id, RosterCounter::Rostered)
                    .unwrap_or(0),
                completed: roster_counts
                    .value(&student.id, RosterCounter::Completed)
                    .unwrap_or(0),
                open: roster_counts
                    .value(&student.id, RosterCounter::Open)
                    .unwrap_or(0),
            };
            summary.count((), SummaryCounter::Rostered, Some(counts.rostered))?;
            summary.count((), SummaryCounter::Completed, Some(counts.completed))?;
            summary.count((), SummaryCounter::Open, Some(counts.open))?;
            summary.count((), SummaryCounter::Year(student.year), None)?;

            let obligation = options.obligations.for_year(student.year).ok_or_else(|| {
                RollcallError::MissingObligation {
                    student: student.name.clone(),
                    year: student.year.to_string(),
                }
            })?;

            rows.push(ReportRow::new(
                student.name.clone(),
                student.year,
                obligation,
                counts,
            ));
        }

        Ok(StudentReport {
            rows,
            summary: ReportSummary {
                bursary_students: bursary.students.len(),
                students_with_rosters: roster_counts.len(),
                totals: summary.totals(),
            },
        })
    }
}
