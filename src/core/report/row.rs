//! Compliance report rows

use crate::domain::YearLevel;

/// One student's roster tallies for the report window
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShiftCounts {
    pub rostered: i64,
    pub completed: i64,
    pub open: i64,
}

/// One row of the compliance report
///
/// Percentages are integer percent against the year level's configured
/// obligation. Issue text carries `"Incomplete roster. "` when rostered
/// shifts fall short of the obligation and `"Outstanding Shifts."` when
/// completed shifts do; the two conditions are evaluated independently and
/// concatenated.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRow {
    pub name: String,
    pub year: YearLevel,
    pub obligation: i64,
    pub rostered: i64,
    pub open: i64,
    pub completed: i64,
    pub percent_rostered: String,
    pub percent_completed: String,
    pub issues: String,
}

impl ReportRow {
    /// Compute a row from a student's counts and obligation
    pub fn new(name: impl Into<String>, year: YearLevel, obligation: i64, counts: ShiftCounts) -> Self {
        let mut issues = String::new();
        if counts.rostered < obligation {
            issues.push_str("Incomplete roster. ");
        }
        if counts.completed < obligation {
            issues.push_str("Outstanding Shifts.");
        }
        Self {
            name: name.into(),
            year,
            obligation,
            rostered: counts.rostered,
            open: counts.open,
            completed: counts.completed,
            percent_rostered: percent(counts.rostered, obligation),
            percent_completed: percent(counts.completed, obligation),
            issues,
        }
    }
}

/// Integer percent of `part` against `obligation`, rendered as `"{n}%"`
fn percent(part: i64, obligation: i64) -> String {
    format!("{:.0}%", (part as f64 / obligation as f64) * 100.0)
}
