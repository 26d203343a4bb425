//! Core engine: counter aggregation, year-level resolution, reporting,
//! and record synchronisation

pub mod aggregate;
pub mod report;
pub mod sync;
pub mod years;

pub use aggregate::{Aggregator, CounterId, CounterSpec, CounterTotal};
pub use report::{ReportBuilder, ReportOptions, StudentReport};
pub use years::{StudentYears, YearAssignment, YearDirectory};
