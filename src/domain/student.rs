//! Student domain types
//!
//! Year levels are a closed set: the college runs a three-year program and
//! the vendor-side training modules that encode them are discovered by name.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::record::RecordKey;

/// A student's year level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum YearLevel {
    Year1,
    Year2,
    Year3,
}

impl YearLevel {
    /// All year levels in program order
    pub const ALL: [YearLevel; 3] = [YearLevel::Year1, YearLevel::Year2, YearLevel::Year3];

    /// The vendor-side label, e.g. `Year2`
    pub fn as_str(&self) -> &'static str {
        match self {
            YearLevel::Year1 => "Year1",
            YearLevel::Year2 => "Year2",
            YearLevel::Year3 => "Year3",
        }
    }

    /// Human-readable form, e.g. `Year 2`
    pub fn title(&self) -> &'static str {
        match self {
            YearLevel::Year1 => "Year 1",
            YearLevel::Year2 => "Year 2",
            YearLevel::Year3 => "Year 3",
        }
    }
}

impl fmt::Display for YearLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for YearLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Year1" => Ok(YearLevel::Year1),
            "Year2" => Ok(YearLevel::Year2),
            "Year3" => Ok(YearLevel::Year3),
            other => Err(format!("Unknown year level: {other}")),
        }
    }
}

/// A bursary student: an active employee with an assigned year level
#[derive(Debug, Clone, PartialEq)]
pub struct Student {
    /// Vendor employee id
    pub id: RecordKey,
    /// Display name as stored by the vendor
    pub name: String,
    /// Assigned year level
    pub year: YearLevel,
    /// Contact email address
    pub email: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_year_level_round_trip() {
        for year in YearLevel::ALL {
            assert_eq!(year.as_str().parse::<YearLevel>().unwrap(), year);
        }
    }

    #[test]
    fn test_year_level_rejects_spaced_label() {
        // "Year 3" (with a space) is a historical data error, never a level
        assert!("Year 3".parse::<YearLevel>().is_err());
    }

    #[test]
    fn test_year_level_display() {
        assert_eq!(YearLevel::Year2.to_string(), "Year2");
        assert_eq!(YearLevel::Year2.title(), "Year 2");
    }
}
