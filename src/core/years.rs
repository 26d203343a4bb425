//! Year-level discovery
//!
//! The college stores each student's year level as a TrainingRecord whose
//! module is one of the year-level TrainingModules. The modules are
//! discovered by title: anything starting with `Year` that parses as a
//! known level. A module titled exactly `"Year 3"` (with a space) is a
//! known historical data error and is never treated as a year level.

use crate::adapters::deputy::{DeputyClient, FetchRequest};
use crate::domain::errors::RecordError;
use crate::domain::{ResourceSet, Result, YearLevel};
use std::collections::HashMap;

/// The vendor-side TrainingModule ids that encode year levels
#[derive(Debug, Clone, Default)]
pub struct YearDirectory {
    modules: Vec<(YearLevel, i64)>,
}

impl YearDirectory {
    /// Fetch the TrainingModule resource and discover the year modules
    pub async fn load(client: &DeputyClient) -> Result<Self> {
        let modules = client.fetch_all(&FetchRequest::new("TrainingModule")).await?;
        let directory = Self::from_resource_set(&modules)?;
        tracing::info!(years = directory.len(), "Discovered year-level modules");
        Ok(directory)
    }

    /// Discover year modules from an already-fetched resource set
    pub fn from_resource_set(modules: &ResourceSet) -> std::result::Result<Self, RecordError> {
        let mut discovered = Vec::new();
        for (_, module) in modules.iter() {
            let title = module.str_field("Title", "TrainingModule")?;
            if title == "Year 3" {
                // ignore historical error
                continue;
            }
            if !title.starts_with("Year") {
                continue;
            }
            match title.parse::<YearLevel>() {
                Ok(year) => {
                    let id = module.int_field("Id", "TrainingModule")?;
                    discovered.push((year, id));
                }
                Err(_) => {
                    tracing::warn!(title, "Ignoring unrecognized year-like training module");
                }
            }
        }
        Ok(Self {
            modules: discovered,
        })
    }

    /// The module id encoding `year`, if one was discovered
    pub fn module_id(&self, year: YearLevel) -> Option<i64> {
        self.modules
            .iter()
            .find(|(y, _)| *y == year)
            .map(|(_, id)| *id)
    }

    /// The year level encoded by `module_id`, if any
    pub fn year_for_module(&self, module_id: i64) -> Option<YearLevel> {
        self.modules
            .iter()
            .find(|(_, id)| *id == module_id)
            .map(|(y, _)| *y)
    }

    /// Number of year levels discovered
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    /// Whether no year modules were discovered
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

/// One student's year assignment: the level plus the TrainingRecord that
/// carries it (needed when the sync layer replaces an outdated level)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearAssignment {
    pub year: YearLevel,
    pub training_record_id: i64,
}

/// Year assignments by employee id
///
/// Assumes one year-level record per student; a later record for the same
/// employee overwrites the earlier one.
#[derive(Debug, Clone, Default)]
pub struct StudentYears {
    assignments: HashMap<i64, YearAssignment>,
}

impl StudentYears {
    /// Fetch TrainingRecord and keep the records whose module is a
    /// discovered year level
    pub async fn load(client: &DeputyClient, directory: &YearDirectory) -> Result<Self> {
        let records = client.fetch_all(&FetchRequest::new("TrainingRecord")).await?;
        let mut assignments = HashMap::new();
        for (_, record) in records.iter() {
            let module = record.int_field("Module", "TrainingRecord")?;
            if let Some(year) = directory.year_for_module(module) {
                let employee = record.int_field("Employee", "TrainingRecord")?;
                let training_record_id = record.int_field("Id", "TrainingRecord")?;
                assignments.insert(
                    employee,
                    YearAssignment {
                        year,
                        training_record_id,
                    },
                );
            }
        }
        tracing::info!(
            total = records.len(),
            with_year = assignments.len(),
            "Fetched training records"
        );
        Ok(Self { assignments })
    }

    /// The assignment for one employee
    pub fn get(&self, employee_id: i64) -> Option<&YearAssignment> {
        self.assignments.get(&employee_id)
    }

    /// Whether the employee has a year-level record
    pub fn contains(&self, employee_id: i64) -> bool {
        self.assignments.contains_key(&employee_id)
    }

    /// Number of students with a year assignment
    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    /// Whether no student has a year assignment
    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }
}
