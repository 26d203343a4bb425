//! Domain models and types for Rollcall.
//!
//! The domain layer provides:
//! - **Error types** ([`RollcallError`], [`ApiError`], [`AggregateError`], [`RecordError`])
//! - **Result type alias** ([`Result`])
//! - **Typed vendor records** ([`ResourceRecord`], [`ResourceSet`], [`RecordKey`])
//! - **Student types** ([`Student`], [`YearLevel`])
//!
//! Vendor records arrive as JSON objects with dynamic keys; the accessors on
//! [`ResourceRecord`] check shape at the boundary so downstream report logic
//! never has to defend against missing fields:
//!
//! ```
//! use rollcall::domain::{RecordKey, ResourceRecord};
//!
//! # fn example() -> Result<(), rollcall::domain::RecordError> {
//! let raw = serde_json::json!({"Id": 7, "DisplayName": "Jo Citizen"});
//! let record = ResourceRecord::new(raw.as_object().unwrap().clone());
//!
//! let key = record.key_value("Id", "Employee")?;
//! assert_eq!(key, RecordKey::Id(7));
//! # Ok(())
//! # }
//! ```

pub mod errors;
pub mod record;
pub mod result;
pub mod student;

pub use errors::{AggregateError, ApiError, RecordError, RollcallError};
pub use record::{RecordKey, ResourceRecord, ResourceSet};
pub use result::Result;
pub use student::{Student, YearLevel};
