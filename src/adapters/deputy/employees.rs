//! Employee fetch conveniences
//!
//! Fixed-semantics wrappers over [`DeputyClient::fetch_all`] for the
//! employee views the reporting and sync layers work with.

use crate::adapters::deputy::client::{DeputyClient, FetchRequest};
use crate::adapters::deputy::query::{Comparison, Predicate};
use crate::domain::{ResourceSet, Result};

impl DeputyClient {
    /// Active employees, keyed by `Id`, vendor-sorted by `LastName`
    pub async fn active_employees(&self, joins: &[&str]) -> Result<ResourceSet> {
        let mut request = FetchRequest::new("Employee")
            .sort_by("LastName")
            .filter(Predicate::new("Active", Comparison::Eq, true));
        for join in joins {
            request = request.join(*join);
        }
        self.fetch_all(&request).await
    }

    /// Discarded (deactivated) employees, keyed by `Id`, sorted by `LastName`
    pub async fn discarded_employees(&self, joins: &[&str]) -> Result<ResourceSet> {
        let mut request = FetchRequest::new("Employee")
            .sort_by("LastName")
            .filter(Predicate::new("Active", Comparison::Eq, false));
        for join in joins {
            request = request.join(*join);
        }
        self.fetch_all(&request).await
    }

    /// Active employees re-keyed by contact email address
    ///
    /// Duplicate emails overwrite earlier entries (last wins, in the source
    /// set's insertion order). A record without a contact email aborts the
    /// whole fetch.
    pub async fn employees_by_email(&self) -> Result<ResourceSet> {
        let employees = self.active_employees(&["ContactObject"]).await?;
        let mut by_email = ResourceSet::new();
        for (_, employee) in employees.iter() {
            let email = employee.nested_str("ContactObject", "Email", "Employee")?;
            by_email.insert(email.into(), employee.clone());
        }
        Ok(by_email)
    }

    /// Discarded employees re-keyed by contact email address
    ///
    /// Unlike [`Self::employees_by_email`], a record with no contact email
    /// is skipped with a warning instead of aborting: discarded employees
    /// routinely have their contact object stripped, and one unusable
    /// record should not block reinstatement of the rest. The asymmetry
    /// with the active-employee view is deliberate.
    pub async fn discarded_employees_by_email(&self) -> Result<ResourceSet> {
        let employees = self.discarded_employees(&["ContactObject"]).await?;
        let mut by_email = ResourceSet::new();
        for (id, employee) in employees.iter() {
            match employee.nested_str("ContactObject", "Email", "Employee") {
                Ok(email) => {
                    by_email.insert(email.into(), employee.clone());
                }
                Err(_) => {
                    let name = employee
                        .str_field("DisplayName", "Employee")
                        .unwrap_or("<unknown>");
                    tracing::warn!(
                        id = %id,
                        name,
                        "Skipping discarded employee without a contact email"
                    );
                }
            }
        }
        Ok(by_email)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::deputy::transport::{Method, Transport};
    use crate::domain::errors::ApiError;
    use crate::domain::{RecordKey, RollcallError};
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::sync::Arc;

    struct CannedTransport(Value);

    #[async_trait]
    impl Transport for CannedTransport {
        async fn call(
            &self,
            _path: &str,
            _method: Method,
            body: Option<&Value>,
            _extended_meta: bool,
        ) -> std::result::Result<Value, ApiError> {
            // assert the fixed predicate semantics on the way through
            let search = body.unwrap().get("search").unwrap();
            assert!(search.get("f1").is_some());
            Ok(self.0.clone())
        }
    }

    fn client(page: Value) -> DeputyClient {
        DeputyClient::new(Arc::new(CannedTransport(page)))
    }

    #[tokio::test]
    async fn test_employees_by_email_rekeys_last_wins() {
        let client = client(json!([
            {"Id": 1, "DisplayName": "A One", "ContactObject": {"Email": "a@example.edu"}},
            {"Id": 2, "DisplayName": "B Two", "ContactObject": {"Email": "b@example.edu"}},
            {"Id": 3, "DisplayName": "A Again", "ContactObject": {"Email": "a@example.edu"}},
        ]));

        let by_email = client.employees_by_email().await.unwrap();
        assert_eq!(by_email.len(), 2);
        let record = by_email.get(&RecordKey::from("a@example.edu")).unwrap();
        assert_eq!(record.field("Id"), Some(&json!(3)));
    }

    #[tokio::test]
    async fn test_employees_by_email_missing_contact_is_fatal() {
        let client = client(json!([
            {"Id": 1, "DisplayName": "No Contact"},
        ]));

        let err = client.employees_by_email().await.unwrap_err();
        assert!(matches!(err, RollcallError::Record(_)));
    }

    #[tokio::test]
    async fn test_discarded_by_email_skips_missing_contact() {
        let client = client(json!([
            {"Id": 1, "DisplayName": "No Contact"},
            {"Id": 2, "DisplayName": "Has Contact", "ContactObject": {"Email": "c@example.edu"}},
        ]));

        let by_email = client.discarded_employees_by_email().await.unwrap();
        assert_eq!(by_email.len(), 1);
        assert!(by_email.contains_key(&RecordKey::from("c@example.edu")));
    }
}
