//! Deputy resource client
//!
//! [`DeputyClient`] retrieves unbounded result sets from the vendor's
//! windowed `/QUERY` endpoint. Deputy caps every page at 500 records; the
//! client keeps requesting the next window until a short page signals
//! exhaustion, merging pages into one insertion-ordered [`ResourceSet`].

use crate::adapters::deputy::query::{Predicate, ResourceQuery};
use crate::adapters::deputy::transport::{Method, Transport};
use crate::domain::errors::ApiError;
use crate::domain::{ResourceRecord, ResourceSet, Result};
use serde_json::Value;
use std::sync::Arc;

/// Window size, hardcoded in Deputy's API. Not configurable.
pub const PAGE_SIZE: usize = 500;

/// Description of one full-collection fetch
///
/// # Example
///
/// ```
/// use rollcall::adapters::deputy::{Comparison, FetchRequest, Predicate};
///
/// let request = FetchRequest::new("Employee")
///     .sort_by("LastName")
///     .join("ContactObject")
///     .filter(Predicate::new("Active", Comparison::Eq, true));
/// assert_eq!(request.resource(), "Employee");
/// ```
#[derive(Debug, Clone)]
pub struct FetchRequest {
    resource: String,
    key_field: String,
    sort_field: String,
    joins: Vec<String>,
    predicates: Vec<Predicate>,
}

impl FetchRequest {
    /// Fetch all records of `resource`, keyed and sorted by `Id`
    pub fn new(resource: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            key_field: "Id".to_string(),
            sort_field: "Id".to_string(),
            joins: Vec::new(),
            predicates: Vec::new(),
        }
    }

    /// Key the result set by a different field
    pub fn key_field(mut self, field: impl Into<String>) -> Self {
        self.key_field = field.into();
        self
    }

    /// Sort (ascending, vendor-side) by a different field
    pub fn sort_by(mut self, field: impl Into<String>) -> Self {
        self.sort_field = field.into();
        self
    }

    /// Embed a related object inline in each returned record
    pub fn join(mut self, related: impl Into<String>) -> Self {
        self.joins.push(related.into());
        self
    }

    /// Narrow the selection with an additional search predicate
    pub fn filter(mut self, predicate: Predicate) -> Self {
        self.predicates.push(predicate);
        self
    }

    /// The resource collection name
    pub fn resource(&self) -> &str {
        &self.resource
    }
}

/// High-level vendor API client
///
/// Owns a [`Transport`] and exposes the paginated fetch plus a raw
/// passthrough for ad-hoc diagnostic calls. All calls are sequential; a
/// page is never requested before the previous one completes.
pub struct DeputyClient {
    transport: Arc<dyn Transport>,
}

impl DeputyClient {
    /// Create a client over the given transport
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Raw API passthrough: one call, decoded JSON back
    ///
    /// # Errors
    ///
    /// Propagates the transport's [`ApiError`] taxonomy unchanged.
    pub async fn api(
        &self,
        path: &str,
        method: Method,
        body: Option<&Value>,
        extended_meta: bool,
    ) -> Result<Value> {
        Ok(self.transport.call(path, method, body, extended_meta).await?)
    }

    /// Fetch every record of a resource collection
    ///
    /// Issues windowed `POST resource/{Name}/QUERY` calls with the baseline
    /// select-all predicate on the key field plus the request's filters,
    /// merging pages keyed by the key field. A page strictly shorter than
    /// [`PAGE_SIZE`] (including empty) terminates the loop; a page of
    /// exactly [`PAGE_SIZE`] always continues. When the total happens to be
    /// an exact multiple of the window, that rule issues one extra
    /// empty-result request; that extra request is part of the wire
    /// contract and is kept.
    ///
    /// # Errors
    ///
    /// Any transport failure or malformed record aborts the whole fetch;
    /// partial results are discarded.
    pub async fn fetch_all(&self, request: &FetchRequest) -> Result<ResourceSet> {
        let path = format!("resource/{}/QUERY", request.resource);
        let joins: Vec<&str> = request.joins.iter().map(String::as_str).collect();

        let mut result = ResourceSet::new();
        let mut start = 0;
        loop {
            let mut query = ResourceQuery::new(&request.key_field, &request.sort_field);
            for predicate in &request.predicates {
                query.push_predicate(predicate.clone());
            }
            query.set_joins(&joins);
            query.set_start(start);

            tracing::debug!(
                resource = %request.resource,
                start,
                "Fetching resource window"
            );

            let body = serde_json::to_value(&query)?;
            let response = self
                .transport
                .call(&path, Method::Post, Some(&body), false)
                .await?;

            let page = match response {
                Value::Array(records) => records,
                _ => {
                    return Err(ApiError::ResponseParse {
                        path,
                        message: "expected a list of records".to_string(),
                    }
                    .into())
                }
            };
            let page_len = page.len();

            for record in page {
                let fields = match record {
                    Value::Object(fields) => fields,
                    _ => {
                        return Err(ApiError::ResponseParse {
                            path,
                            message: "expected each record to be an object".to_string(),
                        }
                        .into())
                    }
                };
                let record = ResourceRecord::new(fields);
                let key = record.key_value(&request.key_field, &request.resource)?;
                result.insert(key, record);
            }

            if page_len == PAGE_SIZE {
                start += PAGE_SIZE;
            } else {
                break;
            }
        }

        tracing::info!(
            resource = %request.resource,
            count = result.len(),
            "Fetched resource"
        );
        Ok(result)
    }
}
