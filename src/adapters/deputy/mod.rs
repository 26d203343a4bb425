//! Deputy API adapter
//!
//! Everything that talks to the vendor lives here: the transport (one
//! request/response exchange), the QUERY body model, and the paginated
//! resource client with its employee-view conveniences.

pub mod client;
pub mod employees;
pub mod query;
pub mod transport;

pub use client::{DeputyClient, FetchRequest, PAGE_SIZE};
pub use query::{Comparison, Predicate, ResourceQuery, Sort, SortDirection};
pub use transport::{Credentials, HttpTransport, Method, Transport};
