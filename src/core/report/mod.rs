//! Compliance reporting: roster tallies, report rows, report assembly

pub mod builder;
pub mod counts;
pub mod row;

pub use builder::{
    BursaryList, ReportBuilder, ReportOptions, ReportSummary, StudentReport, SummaryCounter,
};
pub use counts::{fetch_roster_counts, DateWindow, RosterCounter, DATE_FORMAT};
pub use row::{ReportRow, ShiftCounts};
